//! Built-in sender
//! If you want to put the LCD on another kind of bus, you will need to implement [`SendCommand`] trait

use embedded_hal::delay::DelayNs;

use crate::command::Command;

mod nibble_sender;

pub use nibble_sender::NibbleSender;

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
///
/// Writes are fire and forget, there is no busy flag readback and no error path.
pub trait SendCommand<Delayer: DelayNs> {
    /// Put a [`Command`] on the bus, using `delayer` for the bus timing
    fn send(&mut self, command: Command, delayer: &mut Delayer);

    /// Wait specific duration, and send command
    fn delay_and_send(&mut self, command: Command, delayer: &mut Delayer, delay_us: u32) {
        delayer.delay_us(delay_us);
        self.send(command, delayer);
    }
}
