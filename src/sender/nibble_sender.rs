use embedded_hal::delay::DelayNs;

use crate::{
    command::{Bits, Command, RegisterSelection},
    port::{BusLayout, BusPort},
    utils::BitOps,
};

use super::SendCommand;

/// Default time EN stays in each level of a strobe
pub const DEFAULT_PULSE_HOLD_US: u32 = 1;

/// Sender for the 4 pin (D4~D7) parallel interface
///
/// The RW line is expected to be tied to ground, nothing is ever read back.
pub struct NibbleSender<Port: BusPort> {
    port: Port,
    layout: BusLayout,
    pulse_hold_us: u32,
}

#[allow(missing_docs)]
impl<Port: BusPort> NibbleSender<Port> {
    pub fn new(port: Port, layout: BusLayout) -> Self {
        Self {
            port,
            layout,
            pulse_hold_us: DEFAULT_PULSE_HOLD_US,
        }
    }

    /// Set how long EN is held high, and then low, on every strobe
    pub fn set_pulse_hold_us(mut self, hold_us: u32) -> Self {
        self.pulse_hold_us = hold_us;
        self
    }

    pub fn get_pulse_hold_us(&self) -> u32 {
        self.pulse_hold_us
    }

    pub fn get_layout(&self) -> BusLayout {
        self.layout
    }

    pub fn port(&self) -> &Port {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut Port {
        &mut self.port
    }

    fn set_register_selection(&mut self, rs: RegisterSelection) {
        let mut bits = 0u8;
        bits.put_bit(self.layout.rs_bit(), rs == RegisterSelection::Data);

        self.port.modify(1 << self.layout.rs_bit(), bits);
    }

    fn push_nibble(&mut self, nibble: u8) {
        let layout = self.layout;
        self.port
            .modify(layout.data_mask(), layout.nibble_bits(nibble));
    }

    fn set_en(&mut self, high: bool) {
        let mut bits = 0u8;
        bits.put_bit(self.layout.en_bit(), high);

        self.port.modify(1 << self.layout.en_bit(), bits);
    }

    // data is latched on the falling edge, both levels need a minimum width
    fn pulse_en(&mut self, delayer: &mut impl DelayNs) {
        self.set_en(true);
        delayer.delay_us(self.pulse_hold_us);
        self.set_en(false);
        delayer.delay_us(self.pulse_hold_us);
    }

    fn write_nibble(&mut self, nibble: u8, delayer: &mut impl DelayNs) {
        self.push_nibble(nibble);
        self.pulse_en(delayer);
    }
}

impl<Port, Delayer> SendCommand<Delayer> for NibbleSender<Port>
where
    Port: BusPort,
    Delayer: DelayNs,
{
    fn send(&mut self, command: Command, delayer: &mut Delayer) {
        self.set_en(false);
        self.set_register_selection(command.get_register_selection());

        match command.get_data() {
            Bits::Bit4(raw_bits) => {
                self.write_nibble(raw_bits, delayer);
            }
            // bus is only 4 bit wide, high nibble goes first
            Bits::Bit8(raw_bits) => {
                self.write_nibble(raw_bits >> 4, delayer);
                self.write_nibble(raw_bits & 0b1111, delayer);
            }
        }
    }
}
