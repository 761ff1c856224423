/*!
# LCD1602 Light Switch

A LCD1602 driver for the 4 pin parallel interface, and a light switch built on it:
an analog light sensor is sampled in a loop, an indicator and a relay are switched
against a threshold, and the result is shown on the LCD.

Basic Usage:

1. Initialize a "sender" <br/>
    Put the LCD lines on a [`port::BusPort`], a [`port::PinPort`] made of GPIO pins,
    and wrap it in a [`sender::NibbleSender`].
    You can use any driver implemented [`sender::SendCommand`] instead.
<br/>
<br/>
2. Use [`lcd::Lcd::new()`] to create a [`lcd::Lcd`], and initialize LCD1602 hardware
<br/>
<br/>
3. Implement [`adc::Converter`] for the ADC, then hand the LCD, the ADC and two output pins
    to [`sampling::SamplingLoop::new()`], and [`sampling::SamplingLoop::run()`] it.
*/

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod adc;
pub mod command;
pub mod error;
pub mod lcd;
pub mod port;
pub mod sampling;
pub mod sender;
pub mod utils;

#[cfg(test)]
mod test_utils;
