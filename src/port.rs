//! The 8 bit port the LCD bus lives on
//!
//! RS, EN and D4~D7 share one port with other signals (an indicator LED, the
//! analog input, ...). The LCD may only change the bits it owns, so every
//! write is a read-modify-write on an explicit copy of the port value.

use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, PinState};

use crate::utils::{BitOps, BitState};

/// An 8 bit output port
pub trait BusPort {
    /// Current output value of the port
    fn read(&self) -> u8;

    /// Replace the output value of the port
    fn write(&mut self, bits: u8);

    /// Replace only the bits selected by `mask`, keep all others
    fn modify(&mut self, mask: u8, bits: u8) {
        let next = (self.read() & !mask) | (bits & mask);
        self.write(next);
    }
}

/// A plain owned port value, with no hardware behind it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortState(u8);

impl PortState {
    /// Start from a known port value
    pub fn new(bits: u8) -> Self {
        Self(bits)
    }
}

impl BusPort for PortState {
    fn read(&self) -> u8 {
        self.0
    }

    fn write(&mut self, bits: u8) {
        self.0 = bits;
    }
}

/// Where the LCD lines sit inside the port
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusLayout {
    rs_bit: u8,
    en_bit: u8,
    // position of D4, D5~D7 follow it
    data_offset: u8,
}

impl Default for BusLayout {
    // RS on bit 2, EN on bit 3, D4~D7 on the high nibble
    fn default() -> Self {
        Self::new(2, 3, 4)
    }
}

impl BusLayout {
    /// Panics if a line is outside the port, or two lines share a bit
    pub fn new(rs_bit: u8, en_bit: u8, data_offset: u8) -> Self {
        assert!(rs_bit <= 7 && en_bit <= 7, "bit offset larger than 7");
        assert!(data_offset <= 4, "data lines don't fit in port");

        let layout = Self {
            rs_bit,
            en_bit,
            data_offset,
        };

        assert!(
            rs_bit != en_bit && layout.data_mask() & ((1 << rs_bit) | (1 << en_bit)) == 0,
            "LCD lines overlap"
        );

        layout
    }

    #[allow(missing_docs)]
    pub fn rs_bit(&self) -> u8 {
        self.rs_bit
    }

    #[allow(missing_docs)]
    pub fn en_bit(&self) -> u8 {
        self.en_bit
    }

    /// Bits of D4~D7
    pub fn data_mask(&self) -> u8 {
        0b1111 << self.data_offset
    }

    /// Bits the LCD is allowed to change
    pub fn owned_mask(&self) -> u8 {
        self.data_mask() | (1 << self.rs_bit) | (1 << self.en_bit)
    }

    /// Place a nibble on the data lines
    pub fn nibble_bits(&self, nibble: u8) -> u8 {
        (nibble & 0b1111) << self.data_offset
    }

    /// Read back the nibble currently on the data lines
    pub fn nibble_of(&self, bits: u8) -> u8 {
        (bits & self.data_mask()) >> self.data_offset
    }
}

/// A [`BusPort`] made of single GPIO pins
///
/// The port value is kept in a shadow [`PortState`], and on every write only
/// the LCD pins whose level changed are driven. Bits the LCD doesn't own are
/// kept in the shadow and never reach a pin.
pub struct PinPort<ControlPin, DBPin>
where
    ControlPin: OutputPin<Error = Infallible>,
    DBPin: OutputPin<Error = Infallible>,
{
    shadow: PortState,
    layout: BusLayout,
    rs_pin: ControlPin,
    en_pin: ControlPin,
    db_pins: [DBPin; 4],
}

impl<ControlPin, DBPin> PinPort<ControlPin, DBPin>
where
    ControlPin: OutputPin<Error = Infallible>,
    DBPin: OutputPin<Error = Infallible>,
{
    /// All LCD pins are driven low, to match the initial shadow value
    pub fn new(
        layout: BusLayout,
        rs: ControlPin,
        en: ControlPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        let mut port = Self {
            shadow: PortState::default(),
            layout,
            rs_pin: rs,
            en_pin: en,
            db_pins: [db4, db5, db6, db7],
        };

        drive(&mut port.rs_pin, PinState::Low);
        drive(&mut port.en_pin, PinState::Low);
        port.db_pins
            .iter_mut()
            .for_each(|pin| drive(pin, PinState::Low));

        port
    }

    /// Give the pins back
    pub fn release(self) -> (ControlPin, ControlPin, [DBPin; 4]) {
        (self.rs_pin, self.en_pin, self.db_pins)
    }
}

impl<ControlPin, DBPin> BusPort for PinPort<ControlPin, DBPin>
where
    ControlPin: OutputPin<Error = Infallible>,
    DBPin: OutputPin<Error = Infallible>,
{
    fn read(&self) -> u8 {
        self.shadow.read()
    }

    fn write(&mut self, bits: u8) {
        let changed = (self.shadow.read() ^ bits) & self.layout.owned_mask();
        self.shadow.write(bits);

        if changed == 0 {
            return;
        }

        let level = |pos: u8| PinState::from(bits.check_bit(pos) == BitState::Set);

        let rs_bit = self.layout.rs_bit();
        if changed.check_bit(rs_bit) == BitState::Set {
            drive(&mut self.rs_pin, level(rs_bit));
        }

        // data lines go before EN, so a rising EN always latches settled data
        let d4_bit = self.layout.data_mask().trailing_zeros() as u8;
        self.db_pins
            .iter_mut()
            .enumerate()
            .map(|(index, pin)| (d4_bit + index as u8, pin))
            .filter(|(pos, _)| changed.check_bit(*pos) == BitState::Set)
            .for_each(|(pos, pin)| drive(pin, level(pos)));

        let en_bit = self.layout.en_bit();
        if changed.check_bit(en_bit) == BitState::Set {
            drive(&mut self.en_pin, level(en_bit));
        }
    }
}

/// Set an infallible pin to `state`
pub(crate) fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, state: PinState) {
    match pin.set_state(state) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}
