use embedded_hal::delay::DelayNs;

use crate::{
    command::{Bits, Command, CommandSet, RegisterSelection},
    error::DisplayError,
    sender::SendCommand,
    utils::decimal_digits,
};

mod init;

pub use init::{Config, Timing};

/// DDRAM address of the first cell of each line
pub const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// A LCD1602 driven through a [`SendCommand`] sender
///
/// The driver keeps no copy of the display content. Every method is a plain
/// write on the bus followed by the settle time the controller needs.
pub struct Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    config: Config,
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Write one byte to the instruction or the data register,
    /// then wait the settle time
    pub fn write(&mut self, value: u8, rs: RegisterSelection) {
        self.send(Command::new(rs, Bits::Bit8(value)));
    }

    /// Write every byte of `text` as data, stop at the first NUL
    ///
    /// Nothing wraps at the end of a line, overflowing bytes land in the
    /// invisible part of the DDRAM.
    pub fn print(&mut self, text: &str) {
        self.print_bytes(text.as_bytes());
    }

    /// Move the cursor to `col` of `row`
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        self.config.check_position(row, col)?;

        self.send(CommandSet::SetDDRAM(ROW_OFFSETS[row as usize] + col).into());
        self.delayer.delay_us(self.config.get_timing().settle_us);

        Ok(())
    }

    /// Print the decimal form of `value`, up to [`MAX_NUMBER`](crate::utils::MAX_NUMBER)
    pub fn print_number(&mut self, value: u32) -> Result<(), DisplayError> {
        let digits = decimal_digits(value)?;
        self.print_bytes(&digits);
        Ok(())
    }

    /// Clear the whole display and return cursor to home
    pub fn clear(&mut self) {
        self.send(CommandSet::ClearDisplay.into());
        self.delayer.delay_us(self.config.get_timing().clear_us);
    }

    #[allow(missing_docs)]
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Block for `ms` milliseconds, with the delayer the LCD owns
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }

    /// Block for `us` microseconds, with the delayer the LCD owns
    pub fn delay_us(&mut self, us: u32) {
        self.delayer.delay_us(us);
    }

    fn print_bytes(&mut self, bytes: &[u8]) {
        bytes
            .iter()
            .take_while(|&&byte| byte != 0)
            .for_each(|&byte| self.send(CommandSet::WriteDataToRAM(byte).into()));
    }

    fn send(&mut self, command: Command) {
        self.sender.send(command, self.delayer);
        self.delayer.delay_us(self.config.get_timing().settle_us);
    }
}
