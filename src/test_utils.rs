//! Host side doubles for the bus, the delay and the pins

use core::convert::Infallible;
use std::{string::String, vec::Vec};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, OutputPin, PinState},
};

use crate::{
    adc::Converter,
    command::RegisterSelection,
    port::{BusLayout, BusPort, PortState},
    utils::{BitOps, BitState},
};

/// A [`PortState`] which remembers every value written to it
#[derive(Default)]
pub struct RecordingPort {
    state: PortState,
    history: Vec<u8>,
}

impl RecordingPort {
    pub fn new(initial: u8) -> Self {
        Self {
            state: PortState::new(initial),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[u8] {
        &self.history
    }
}

impl BusPort for RecordingPort {
    fn read(&self) -> u8 {
        self.state.read()
    }

    fn write(&mut self, bits: u8) {
        self.state.write(bits);
        self.history.push(bits);
    }
}

/// Adds up every requested delay instead of waiting
#[derive(Default)]
pub struct CountingDelay {
    total_ns: u64,
}

impl CountingDelay {
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// One nibble latched by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strobe {
    pub rs: RegisterSelection,
    pub nibble: u8,
}

/// Every nibble the controller latched, in bus order.
///
/// The controller takes the data lines on the falling edge of EN, so that is
/// where the port value is sampled.
pub fn strobes(port: &RecordingPort, layout: BusLayout) -> Vec<Strobe> {
    let en_high = |bits: u8| bits.check_bit(layout.en_bit()) == BitState::Set;

    port.history()
        .windows(2)
        .filter(|pair| en_high(pair[0]) && !en_high(pair[1]))
        .map(|pair| Strobe {
            rs: match pair[0].check_bit(layout.rs_bit()) {
                BitState::Set => RegisterSelection::Data,
                BitState::Clear => RegisterSelection::Command,
            },
            nibble: layout.nibble_of(pair[0]),
        })
        .collect()
}

/// Join nibble pairs into bytes, for a bus already in 4 bit mode
pub fn bytes(strobes: &[Strobe]) -> Vec<(RegisterSelection, u8)> {
    assert!(strobes.len() % 2 == 0, "dangling nibble on the bus");

    strobes
        .chunks(2)
        .map(|pair| {
            assert_eq!(pair[0].rs, pair[1].rs, "RS changed inside a byte");
            (pair[0].rs, (pair[0].nibble << 4) | pair[1].nibble)
        })
        .collect()
}

/// Data bytes of a byte stream as text, commands are skipped
pub fn text(bytes: &[(RegisterSelection, u8)]) -> String {
    bytes
        .iter()
        .filter(|(rs, _)| *rs == RegisterSelection::Data)
        .map(|(_, byte)| char::from(*byte))
        .collect()
}

/// An output pin that only remembers its level
pub struct MockPin {
    state: PinState,
    writes: usize,
}

impl Default for MockPin {
    fn default() -> Self {
        Self {
            state: PinState::Low,
            writes: 0,
        }
    }
}

impl MockPin {
    pub fn state(&self) -> PinState {
        self.state
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = PinState::Low;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state = PinState::High;
        self.writes += 1;
        Ok(())
    }
}

/// Finishes a conversion after a fixed number of polls,
/// or never when `ready_after` is `None`
pub struct ScriptedAdc {
    pub raw: u16,
    pub ready_after: Option<usize>,
    pub poll_limit: usize,
    pub started: usize,
    pub polls: usize,
}

impl ScriptedAdc {
    pub fn new(raw: u16) -> Self {
        Self {
            raw,
            ready_after: Some(0),
            poll_limit: 10_000,
            started: 0,
            polls: 0,
        }
    }
}

impl Converter for ScriptedAdc {
    fn start_conversion(&mut self) {
        self.started += 1;
        self.polls = 0;
    }

    fn is_conversion_ready(&mut self) -> bool {
        self.polls += 1;
        assert!(self.polls <= self.poll_limit, "still waiting for conversion");
        matches!(self.ready_after, Some(after) if self.polls > after)
    }

    fn read_sample(&mut self) -> u16 {
        self.raw
    }
}

#[test]
fn strobes_sample_on_falling_edge() {
    let mut port = RecordingPort::new(0);
    let layout = BusLayout::default();
    let mut en = 0u8;
    en.set_bit(layout.en_bit());

    port.write(layout.nibble_bits(0x3));
    port.write(layout.nibble_bits(0x3) | en);
    port.write(layout.nibble_bits(0x3));
    // data moving while EN is low latches nothing
    port.write(layout.nibble_bits(0x2));

    assert_eq!(
        strobes(&port, layout),
        [Strobe {
            rs: RegisterSelection::Command,
            nibble: 0x3
        }]
    );
}
