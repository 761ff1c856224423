//! Instructions of the HD44780 / ST7066U controller, and their raw encoding

use crate::utils::BitOps;

/// Instructions the driver issues
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandSet {
    ClearDisplay,
    EntryModeSet(MoveDirection, ShiftType),
    DisplayOnOff {
        display: State,
        cursor: State,
        cursor_blink: State,
    },
    // this is not a command from datasheet,
    // it's the upper half of a Function Set, sent as a single nibble
    // while the controller is still in its power up (8 bit) framing
    HalfFunctionSet(DataWidth),
    FunctionSet(DataWidth, LineMode, Font),
    SetDDRAM(u8),
    WriteDataToRAM(u8),
}

/// Cursor move direction after a write
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum MoveDirection {
    RightToLeft,
    #[default]
    LeftToRight,
}

/// Whether the display window follows the cursor
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ShiftType {
    #[default]
    CursorOnly,
    CursorAndDisplay,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum State {
    Off,
    #[default]
    On,
}

/// Width of the bus the controller expects
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DataWidth {
    #[default]
    Bit4,
    Bit8,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LineMode {
    OneLine,
    #[default]
    TwoLine,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Font {
    #[default]
    Font5x8,
    Font5x11,
}

/// Which register a write goes to, selected by the RS line
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegisterSelection {
    /// RS low, instruction register
    Command,
    /// RS high, data register
    Data,
}

/// Payload of a write
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bits {
    /// a single nibble, only valid before the controller commits to 4 bit mode
    Bit4(u8),
    /// a full byte, sent as two nibbles
    Bit8(u8),
}

/// A raw write, ready to be put on the bus
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Command {
    rs: RegisterSelection,
    data: Bits,
}

#[allow(missing_docs)]
impl Command {
    /// Panics if a [`Bits::Bit4`] payload is wider than 4 bits
    pub fn new(rs: RegisterSelection, data: Bits) -> Self {
        if let Bits::Bit4(nibble) = data {
            assert!(nibble < 2u8.pow(4), "data is greater than 4 bits");
        }

        Self { rs, data }
    }

    pub fn get_register_selection(&self) -> RegisterSelection {
        self.rs
    }

    pub fn get_data(&self) -> Bits {
        self.data
    }
}

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        match command {
            CommandSet::ClearDisplay => {
                let raw_bits: u8 = 0b0000_0001;
                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::EntryModeSet(dir, st) => {
                let mut raw_bits: u8 = 0b0000_0100;

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(1),
                    MoveDirection::LeftToRight => raw_bits.set_bit(1),
                };

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(0),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(0),
                };

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => {
                let mut raw_bits = 0b0000_1000;

                raw_bits.put_bit(2, display == State::On);
                raw_bits.put_bit(1, cursor == State::On);
                raw_bits.put_bit(0, cursor_blink == State::On);

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::HalfFunctionSet(width) => {
                let mut raw_bits = 0b0010;
                raw_bits.put_bit(0, width == DataWidth::Bit8);

                Self::new(RegisterSelection::Command, Bits::Bit4(raw_bits))
            }

            CommandSet::FunctionSet(width, line, font) => {
                let mut raw_bits = 0b0010_0000;

                match width {
                    DataWidth::Bit4 => raw_bits.clear_bit(4),
                    DataWidth::Bit8 => raw_bits.set_bit(4),
                };

                match line {
                    LineMode::OneLine => raw_bits.clear_bit(3),
                    LineMode::TwoLine => raw_bits.set_bit(3),
                };

                match font {
                    Font::Font5x8 => raw_bits.clear_bit(2),
                    Font::Font5x11 => raw_bits.set_bit(2),
                };

                Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
            }

            CommandSet::SetDDRAM(addr) => {
                assert!(addr < 2u8.pow(7), "DDRAM address out of range");

                Self::new(RegisterSelection::Command, Bits::Bit8(0b1000_0000 | addr))
            }

            CommandSet::WriteDataToRAM(data) => {
                Self::new(RegisterSelection::Data, Bits::Bit8(data))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(command: CommandSet) -> Bits {
        Command::from(command).get_data()
    }

    #[test]
    fn init_commands_encode_like_datasheet() {
        assert_eq!(
            raw(CommandSet::HalfFunctionSet(DataWidth::Bit8)),
            Bits::Bit4(0b0011)
        );
        assert_eq!(
            raw(CommandSet::HalfFunctionSet(DataWidth::Bit4)),
            Bits::Bit4(0b0010)
        );
        assert_eq!(
            raw(CommandSet::FunctionSet(
                DataWidth::Bit4,
                LineMode::TwoLine,
                Font::Font5x8
            )),
            Bits::Bit8(0x28)
        );
        assert_eq!(
            raw(CommandSet::DisplayOnOff {
                display: State::On,
                cursor: State::Off,
                cursor_blink: State::Off,
            }),
            Bits::Bit8(0x0C)
        );
        assert_eq!(raw(CommandSet::ClearDisplay), Bits::Bit8(0x01));
        assert_eq!(
            raw(CommandSet::EntryModeSet(
                MoveDirection::LeftToRight,
                ShiftType::CursorOnly
            )),
            Bits::Bit8(0x06)
        );
    }

    #[test]
    fn ddram_address_sets_high_bit() {
        assert_eq!(raw(CommandSet::SetDDRAM(0x43)), Bits::Bit8(0xC3));
    }

    #[test]
    #[should_panic(expected = "DDRAM address out of range")]
    fn ddram_address_must_fit_7_bits() {
        let _ = Command::from(CommandSet::SetDDRAM(0x80));
    }

    #[test]
    fn only_data_writes_select_data_register() {
        assert_eq!(
            Command::from(CommandSet::WriteDataToRAM(b'A')).get_register_selection(),
            RegisterSelection::Data
        );
        assert_eq!(
            Command::from(CommandSet::ClearDisplay).get_register_selection(),
            RegisterSelection::Command
        );
    }
}
