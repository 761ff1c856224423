//! Errors reported by the display side

use core::fmt;

/// An argument the LCD can't represent.
///
/// These are checked before anything is put on the bus, so when one is
/// returned the display content is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Row is past the last line of the current line mode
    RowOutOfRange {
        /// requested row
        row: u8,
        /// line count of the display
        rows: u8,
    },
    /// Column is past the visible width of the display
    ColumnOutOfRange {
        /// requested column
        col: u8,
        /// visible character cells per line
        columns: u8,
    },
    /// Number has more digits than the render buffer holds
    NumberTooLarge(u32),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::RowOutOfRange { row, rows } => {
                write!(f, "row {row} out of range, display has {rows} line(s)")
            }
            DisplayError::ColumnOutOfRange { col, columns } => {
                write!(f, "column {col} out of range, display is {columns} wide")
            }
            DisplayError::NumberTooLarge(value) => {
                write!(f, "{value} has too many digits to render")
            }
        }
    }
}

impl core::error::Error for DisplayError {}
