//! Common tools

use heapless::Vec;

use crate::error::DisplayError;

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Debug, PartialEq)]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

/// Simple bit ops
pub trait BitOps {
    #[allow(missing_docs)]
    fn set_bit(&mut self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn clear_bit(&mut self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn check_bit(&self, pos: u8) -> BitState;
    /// Set bit `pos` to 1 when `high` is true, otherwise to 0
    fn put_bit(&mut self, pos: u8, high: bool) -> Self;
}

impl BitOps for u8 {
    fn set_bit(&mut self, pos: u8) -> Self {
        assert!(pos <= 7, "bit offset larger than 7");
        *self |= 1u8 << pos;
        *self
    }

    fn clear_bit(&mut self, pos: u8) -> Self {
        assert!(pos <= 7, "bit offset larger than 7");
        *self &= !(1u8 << pos);
        *self
    }

    fn check_bit(&self, pos: u8) -> BitState {
        assert!(pos <= 7, "bit offset larger than 7");

        match (*self >> pos) & 1 == 1 {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }

    fn put_bit(&mut self, pos: u8, high: bool) -> Self {
        match high {
            true => self.set_bit(pos),
            false => self.clear_bit(pos),
        }
    }
}

/// Max count of decimal digits [`decimal_digits`] can produce
pub const MAX_DIGITS: usize = 5;

/// Largest value [`decimal_digits`] accepts
pub const MAX_NUMBER: u32 = 99_999;

/// Render `value` into ASCII decimal digits, most significant digit first.
///
/// Digits are produced from the least significant one backwards by repeated
/// division, then flipped. Zero renders as a single `'0'`, and there is never
/// a leading zero.
///
/// Values above [`MAX_NUMBER`] don't fit the buffer and return
/// [`DisplayError::NumberTooLarge`].
pub fn decimal_digits(value: u32) -> Result<Vec<u8, MAX_DIGITS>, DisplayError> {
    if value > MAX_NUMBER {
        return Err(DisplayError::NumberTooLarge(value));
    }

    let mut digits = Vec::new();
    let mut rest = value;

    loop {
        // cannot overflow, MAX_NUMBER has exactly MAX_DIGITS digits
        digits
            .push(b'0' + (rest % 10) as u8)
            .map_err(|_| DisplayError::NumberTooLarge(value))?;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }

    digits.reverse();
    Ok(digits)
}
