//! The control loop: sample, convert, switch the outputs, report on the LCD

use core::convert::Infallible;

use embedded_hal::{
    delay::DelayNs,
    digital::{OutputPin, PinState},
};

use crate::{
    adc::{Converter, Sample, ADC_MAX},
    error::DisplayError,
    lcd::Lcd,
    port::drive,
    sender::SendCommand,
};

/// Conversion constants of the sensor channel
///
/// Both numbers come from the board as built, they are not derived from
/// anything. Override them when the divider or the sensor changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// engineering value of a full scale (1023) sample
    pub full_scale: f32,
    /// values below this switch the lights on
    pub threshold: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            full_scale: 99.30,
            threshold: 45.0,
        }
    }
}

impl Calibration {
    /// `sample * full_scale / 1023`, never outside `0..=full_scale`
    pub fn to_engineering(&self, sample: Sample) -> f32 {
        // ratio first, so a full scale sample maps to exactly full_scale
        f32::from(sample.get()) / f32::from(ADC_MAX) * self.full_scale
    }
}

/// Truncate a non-negative value into its integer part and first decimal
pub fn split_tenths(value: f32) -> (u16, u8) {
    let whole = value as u16;
    let tenths = ((value - f32::from(whole)) * 10.0) as u8;
    (whole, tenths.min(9))
}

/// What the outputs are switched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    /// it's dark: indicator off, relay on
    On,
    /// it's bright: indicator on, relay off
    Off,
}

impl LightState {
    /// No hysteresis, `threshold` itself counts as bright
    pub fn from_value(value: f32, threshold: f32) -> Self {
        if value < threshold {
            LightState::On
        } else {
            LightState::Off
        }
    }

    /// Level of the indicator output
    pub fn indicator(&self) -> PinState {
        match self {
            LightState::On => PinState::Low,
            LightState::Off => PinState::High,
        }
    }

    /// Level of the relay output
    pub fn relay(&self) -> PinState {
        match self {
            LightState::On => PinState::High,
            LightState::Off => PinState::Low,
        }
    }

    /// Status text shown on the LCD
    pub fn label(&self) -> &'static str {
        match self {
            LightState::On => "LIGHTS ON",
            LightState::Off => "LIGHTS OFF",
        }
    }
}

/// Everything one pass of the loop measured and decided
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub sample: Sample,
    pub value: f32,
    pub whole: u16,
    pub tenths: u8,
    pub lights: LightState,
}

/// Where and what the loop prints, and how it converts
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    calibration: Calibration,
    status_pos: (u8, u8),
    show_reading: bool,
    reading_pos: (u8, u8),
    unit_pos: (u8, u8),
    unit: &'static str,
    hold_ms: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            status_pos: (0, 3),
            show_reading: false,
            reading_pos: (1, 3),
            unit_pos: (1, 7),
            unit: "V",
            hold_ms: 0,
        }
    }
}

#[allow(missing_docs)]
impl SamplerConfig {
    pub fn get_calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn set_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// (row, column) of the "LIGHTS ON" / "LIGHTS OFF" text
    pub fn get_status_pos(&self) -> (u8, u8) {
        self.status_pos
    }

    pub fn set_status_pos(mut self, pos: (u8, u8)) -> Self {
        self.status_pos = pos;
        self
    }

    /// Whether the converted value is printed too
    pub fn get_show_reading(&self) -> bool {
        self.show_reading
    }

    pub fn set_show_reading(mut self, show: bool) -> Self {
        self.show_reading = show;
        self
    }

    pub fn get_reading_pos(&self) -> (u8, u8) {
        self.reading_pos
    }

    pub fn set_reading_pos(mut self, pos: (u8, u8)) -> Self {
        self.reading_pos = pos;
        self
    }

    pub fn get_unit_pos(&self) -> (u8, u8) {
        self.unit_pos
    }

    pub fn set_unit_pos(mut self, pos: (u8, u8)) -> Self {
        self.unit_pos = pos;
        self
    }

    pub fn get_unit(&self) -> &'static str {
        self.unit
    }

    pub fn set_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    /// Pause at the end of every pass, 0 to loop flat out
    pub fn get_hold_ms(&self) -> u32 {
        self.hold_ms
    }

    pub fn set_hold_ms(mut self, hold_ms: u32) -> Self {
        self.hold_ms = hold_ms;
        self
    }
}

/// Owns the ADC, the two outputs and the LCD, and runs them in lock step
pub struct SamplingLoop<'a, 'b, Sender, Delayer, Adc, Indicator, Relay>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
    Adc: Converter,
    Indicator: OutputPin<Error = Infallible>,
    Relay: OutputPin<Error = Infallible>,
{
    lcd: Lcd<'a, 'b, Sender, Delayer>,
    adc: Adc,
    indicator: Indicator,
    relay: Relay,
    config: SamplerConfig,
}

impl<'a, 'b, Sender, Delayer, Adc, Indicator, Relay>
    SamplingLoop<'a, 'b, Sender, Delayer, Adc, Indicator, Relay>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
    Adc: Converter,
    Indicator: OutputPin<Error = Infallible>,
    Relay: OutputPin<Error = Infallible>,
{
    /// Every configured position is checked against the display here,
    /// so a pass can't fail on a position later.
    pub fn new(
        lcd: Lcd<'a, 'b, Sender, Delayer>,
        adc: Adc,
        indicator: Indicator,
        relay: Relay,
        config: SamplerConfig,
    ) -> Result<Self, DisplayError> {
        let display = lcd.get_config();

        let (row, col) = config.get_status_pos();
        display.check_position(row, col)?;

        if config.get_show_reading() {
            let (row, col) = config.get_reading_pos();
            display.check_position(row, col)?;
            let (row, col) = config.get_unit_pos();
            display.check_position(row, col)?;
        }

        Ok(Self {
            lcd,
            adc,
            indicator,
            relay,
            config,
        })
    }

    /// One pass: sample, convert, clear, switch, print
    ///
    /// Blocks for as long as the ADC takes, there is no timeout.
    pub fn step(&mut self) -> Result<Reading, DisplayError> {
        let sample = self.adc.convert_blocking();

        let calibration = self.config.get_calibration();
        let value = calibration.to_engineering(sample);
        let (whole, tenths) = split_tenths(value);
        let lights = LightState::from_value(value, calibration.threshold);

        self.lcd.clear();

        drive(&mut self.indicator, lights.indicator());
        drive(&mut self.relay, lights.relay());

        let (row, col) = self.config.get_status_pos();
        self.lcd.set_cursor(row, col)?;
        self.lcd.print(lights.label());

        if self.config.get_show_reading() {
            let (row, col) = self.config.get_reading_pos();
            self.lcd.set_cursor(row, col)?;
            self.lcd.print_number(u32::from(whole))?;
            self.lcd.print(".");
            self.lcd.print_number(u32::from(tenths))?;

            let (row, col) = self.config.get_unit_pos();
            self.lcd.set_cursor(row, col)?;
            self.lcd.print(self.config.get_unit());
        }

        if self.config.get_hold_ms() > 0 {
            self.lcd.delay_ms(self.config.get_hold_ms());
        }

        Ok(Reading {
            sample,
            value,
            whole,
            tenths,
            lights,
        })
    }

    /// Run [`step`](Self::step) forever, handing every result to `observer`
    pub fn run(&mut self, mut observer: impl FnMut(&Result<Reading, DisplayError>)) -> ! {
        loop {
            let result = self.step();
            observer(&result);
        }
    }

    #[allow(missing_docs)]
    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    #[allow(missing_docs)]
    pub fn relay(&self) -> &Relay {
        &self.relay
    }

    #[allow(missing_docs)]
    pub fn adc(&self) -> &Adc {
        &self.adc
    }

    #[allow(missing_docs)]
    pub fn get_config(&self) -> &SamplerConfig {
        &self.config
    }
}
