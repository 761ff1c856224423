use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, DataWidth, Font, LineMode, MoveDirection, ShiftType, State},
    error::DisplayError,
    lcd::Lcd,
    sender::SendCommand,
};

/// Every wait the controller asks for, in microseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// after Vcc rises, before the first reset nibble (datasheet: > 15 ms)
    pub power_on_us: u32,
    /// after the first reset nibble (datasheet: > 4.1 ms)
    pub first_reset_us: u32,
    /// after each later reset nibble (datasheet: > 100 us)
    pub reset_us: u32,
    /// after every ordinary instruction or data write (datasheet: > 37 us)
    pub settle_us: u32,
    /// after clear display (datasheet: > 1.52 ms)
    pub clear_us: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            power_on_us: 15_000,
            first_reset_us: 5_000,
            reset_us: 100,
            settle_us: 100,
            clear_us: 2_000,
        }
    }
}

/// Max cells of a line in DDRAM
const LINE_CAPACITY: u8 = 40;

/// [`Config`] is the init config of a [`Lcd`]
#[derive(Debug, Clone, Copy)]
pub struct Config {
    line_mode: LineMode,
    font: Font,
    columns: u8,
    display: State,
    cursor: State,
    cursor_blink: State,
    direction: MoveDirection,
    shift_type: ShiftType,
    timing: Timing,
}

impl Default for Config {
    /// 16x2, display on, no cursor, left to right
    fn default() -> Self {
        Self {
            line_mode: LineMode::TwoLine,
            font: Font::Font5x8,
            columns: 16,
            display: State::On,
            cursor: State::Off,
            cursor_blink: State::Off,
            direction: MoveDirection::LeftToRight,
            shift_type: ShiftType::CursorOnly,
            timing: Timing::default(),
        }
    }
}

#[allow(missing_docs)]
impl Config {
    pub fn get_line_mode(&self) -> LineMode {
        self.line_mode
    }

    pub fn set_line_mode(mut self, line: LineMode) -> Self {
        self.line_mode = line;
        self
    }

    pub fn get_rows(&self) -> u8 {
        match self.line_mode {
            LineMode::OneLine => 1,
            LineMode::TwoLine => 2,
        }
    }

    pub fn get_font(&self) -> Font {
        self.font
    }

    pub fn set_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Visible character cells per line
    pub fn get_columns(&self) -> u8 {
        self.columns
    }

    pub fn set_columns(mut self, columns: u8) -> Self {
        assert!(
            (1..=LINE_CAPACITY).contains(&columns),
            "a line holds 1 to 40 characters"
        );
        self.columns = columns;
        self
    }

    pub fn get_display_state(&self) -> State {
        self.display
    }

    pub fn set_display_state(mut self, display: State) -> Self {
        self.display = display;
        self
    }

    pub fn get_cursor_state(&self) -> State {
        self.cursor
    }

    pub fn set_cursor_state(mut self, cursor: State) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn get_cursor_blink(&self) -> State {
        self.cursor_blink
    }

    pub fn set_cursor_blink(mut self, blink: State) -> Self {
        self.cursor_blink = blink;
        self
    }

    pub fn get_direction(&self) -> MoveDirection {
        self.direction
    }

    pub fn set_direction(mut self, dir: MoveDirection) -> Self {
        self.direction = dir;
        self
    }

    pub fn get_shift_type(&self) -> ShiftType {
        self.shift_type
    }

    pub fn set_shift_type(mut self, shift: ShiftType) -> Self {
        self.shift_type = shift;
        self
    }

    pub fn get_timing(&self) -> Timing {
        self.timing
    }

    pub fn set_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Check a (row, column) pair lands on a visible cell
    pub fn check_position(&self, row: u8, col: u8) -> Result<(), DisplayError> {
        let rows = self.get_rows();
        if row >= rows {
            return Err(DisplayError::RowOutOfRange { row, rows });
        }

        if col >= self.columns {
            return Err(DisplayError::ColumnOutOfRange {
                col,
                columns: self.columns,
            });
        }

        Ok(())
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and init LCD hardware
    ///
    /// No busy flag is read, every step simply waits its worst case time.
    pub fn new(sender: &'a mut Sender, delayer: &'b mut Delayer, config: Config) -> Self {
        let timing = config.get_timing();

        // in initialization process, we'd better use "raw command", to strictly follow datasheet

        // controller may power up in any width, three 8 bit function sets force it to 8 bit,
        // these are single nibbles, the low half of the bus is not connected
        sender.delay_and_send(
            CommandSet::HalfFunctionSet(DataWidth::Bit8).into(),
            delayer,
            timing.power_on_us,
        );
        sender.delay_and_send(
            CommandSet::HalfFunctionSet(DataWidth::Bit8).into(),
            delayer,
            timing.first_reset_us,
        );
        sender.delay_and_send(
            CommandSet::HalfFunctionSet(DataWidth::Bit8).into(),
            delayer,
            timing.reset_us,
        );

        // then switch to 4 bit, from here on every byte is sent as 2 nibbles
        sender.delay_and_send(
            CommandSet::HalfFunctionSet(DataWidth::Bit4).into(),
            delayer,
            timing.reset_us,
        );
        delayer.delay_us(timing.reset_us);

        let mut lcd = Self {
            sender,
            delayer,
            config,
        };

        lcd.send(
            CommandSet::FunctionSet(DataWidth::Bit4, config.get_line_mode(), config.get_font())
                .into(),
        );

        lcd.send(
            CommandSet::DisplayOnOff {
                display: config.get_display_state(),
                cursor: config.get_cursor_state(),
                cursor_blink: config.get_cursor_blink(),
            }
            .into(),
        );

        lcd.clear();

        lcd.send(
            CommandSet::EntryModeSet(config.get_direction(), config.get_shift_type()).into(),
        );

        // (0, 0) exists in every line mode
        lcd.send(CommandSet::SetDDRAM(0).into());
        lcd.delay_us(timing.settle_us);

        lcd
    }
}
