//! Light switch on a STM32F411RET6
//!
//! A light dependent resistor is sampled on PA0. When it gets dark the relay
//! is switched on and the indicator LED off, when it's bright the other way
//! around, and the LCD1602 tells which one it is.

//! Wiring diagram
//!
//! LCD1602 <-> STM32F411RET6
//!     Vss <-> GND
//!     Vdd <-> 5V
//!      V0 <-> potentiometer <-> 5V (to adjust the display contrast)
//!      RS <-> PA2
//!      RW <-> GND (the driver never reads from LCD)
//!      EN <-> PA3 (and optionally connect to a 4.7 kOhm Pulldown resistor, to stable voltage level when STM32 reset)
//!      D4 <-> PA4
//!      D5 <-> PA5
//!      D6 <-> PA6
//!      D7 <-> PA7
//!       A <-> 5V
//!       K <-> GND
//!
//! Others
//!     LDR divider output <-> PA0
//!          Indicator LED <-> PA1
//!          Relay driver  <-> PB1

#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{
    adc::{
        config::{AdcConfig, Resolution, SampleTime, Sequence},
        Adc,
    },
    pac,
    prelude::*,
};

use lcd1602_light_switch::{
    adc::Converter,
    lcd::{Config, Lcd},
    port::{BusLayout, PinPort},
    sampling::{LightState, SamplerConfig, SamplingLoop},
    sender::NibbleSender,
};

/// ADC1, one regular conversion of the channel configured at startup
struct OneShot {
    adc: Adc<pac::ADC1>,
}

impl Converter for OneShot {
    fn start_conversion(&mut self) {
        self.adc.start_conversion();
    }

    fn is_conversion_ready(&mut self) -> bool {
        // SAFETY: read only access to the status register, EOC is cleared by reading DR
        unsafe { (*pac::ADC1::ptr()).sr.read().eoc().bit_is_set() }
    }

    fn read_sample(&mut self) -> u16 {
        self.adc.current_sample()
    }
}

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    // the independent watchdog is off after reset, and we never start it

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(8.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();

    // Push-pull mode for a fast interaction
    let rs_pin = gpioa.pa2.into_push_pull_output().erase();
    let en_pin = gpioa.pa3.into_push_pull_output().erase();
    let db4_pin = gpioa.pa4.into_push_pull_output().erase();
    let db5_pin = gpioa.pa5.into_push_pull_output().erase();
    let db6_pin = gpioa.pa6.into_push_pull_output().erase();
    let db7_pin = gpioa.pa7.into_push_pull_output().erase();

    let indicator = gpioa.pa1.into_push_pull_output().erase();
    let relay = gpiob.pb1.into_push_pull_output().erase();

    // Vref is Vdda, long sample time for the high impedance divider
    let ldr_pin = gpioa.pa0.into_analog();
    let mut adc = Adc::adc1(
        dp.ADC1,
        true,
        AdcConfig::default().resolution(Resolution::Ten),
    );
    adc.configure_channel(&ldr_pin, Sequence::One, SampleTime::Cycles_480);
    let converter = OneShot { adc };

    // bit layout of the port shadow: RS 2, EN 3, D4~D7 4~7
    let layout = BusLayout::default();
    let port = PinPort::new(
        layout, rs_pin, en_pin, db4_pin, db5_pin, db6_pin, db7_pin,
    );
    let mut sender = NibbleSender::new(port, layout);

    let lcd = Lcd::new(&mut sender, &mut delayer, Config::default());

    rprintln!("LCD ready, sampling PA0");

    let mut sampler = SamplingLoop::new(
        lcd,
        converter,
        indicator,
        relay,
        SamplerConfig::default(),
    )
    .expect("status text doesn't fit the display");

    let mut last_state: Option<LightState> = None;

    sampler.run(|result| match result {
        Ok(reading) => {
            if last_state != Some(reading.lights) {
                rprintln!(
                    "sample {} = {}.{}: {}",
                    reading.sample.get(),
                    reading.whole,
                    reading.tenths,
                    reading.lights.label()
                );
                last_state = Some(reading.lights);
            }
        }
        Err(e) => rprintln!("display error: {}", e),
    })
}
