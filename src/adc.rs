//! The analog input seam

/// Largest value of a 10 bit conversion
pub const ADC_MAX: u16 = 1023;

/// A single channel ADC, polled for completion
///
/// Implement this on top of a HAL ADC, or on a register block directly.
pub trait Converter {
    /// Kick off one conversion on the configured channel
    fn start_conversion(&mut self);

    /// Whether the conversion started last has finished
    fn is_conversion_ready(&mut self) -> bool;

    /// Result of the last finished conversion
    fn read_sample(&mut self) -> u16;

    /// Start a conversion and spin until it's done
    ///
    /// There is no timeout, a converter which never finishes blocks forever.
    fn convert_blocking(&mut self) -> Sample {
        self.start_conversion();
        while !self.is_conversion_ready() {
            core::hint::spin_loop();
        }
        Sample::new(self.read_sample())
    }
}

/// A conversion result, always within `0..=ADC_MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sample(u16);

impl Sample {
    /// Values above [`ADC_MAX`] saturate
    pub fn new(raw: u16) -> Self {
        Self(raw.min(ADC_MAX))
    }

    #[allow(missing_docs)]
    pub fn get(&self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedAdc;

    #[test]
    fn waits_until_conversion_is_ready() {
        let mut adc = ScriptedAdc::new(512);
        adc.ready_after = Some(7);

        assert_eq!(adc.convert_blocking(), Sample::new(512));
        assert_eq!(adc.started, 1);
        assert_eq!(adc.polls, 8);
    }

    #[test]
    fn ready_conversion_is_polled_once() {
        let mut adc = ScriptedAdc::new(3);
        assert_eq!(adc.convert_blocking().get(), 3);
        assert_eq!(adc.polls, 1);
    }

    #[test]
    #[should_panic(expected = "still waiting for conversion")]
    fn stuck_conversion_never_returns() {
        let mut adc = ScriptedAdc::new(0);
        adc.ready_after = None;
        adc.convert_blocking();
    }

    #[test]
    fn out_of_range_raw_value_saturates() {
        assert_eq!(Sample::new(4095).get(), ADC_MAX);
        assert_eq!(Sample::new(ADC_MAX).get(), ADC_MAX);
    }
}
