//! Error types for streamsheet-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and usage errors raised while describing or streaming a workbook
///
/// None of these are transient: each one points at a caller mistake and is
/// terminal for the writer that raised it.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Two sheets were registered under the same name
    #[error("duplicate sheet name '{0}'")]
    DuplicateSheetName(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// A cell or column default referenced a style that was never registered
    #[error("trying to make use of a style that has not been added")]
    StyleNotAdded,

    /// A style referenced a number format that is neither built-in nor registered
    #[error("number format {0} has not been added")]
    UnknownNumberFormat(u32),

    /// A row's cell count differs from the first row written to the sheet
    #[error("invalid number of cells in row for sheet '{sheet}': expected {expected}, got {actual}")]
    WrongRowWidth {
        sheet: String,
        expected: usize,
        actual: usize,
    },

    /// `next_sheet` was called while positioned on the last sheet
    #[error("already on last sheet")]
    AlreadyOnLastSheet,

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Column range with min > max or outside the sheet's column limits
    #[error("Invalid column range {min}..={max}")]
    InvalidColumnRange { min: u16, max: u16 },

    /// Column width that is not a positive finite number
    #[error("Invalid column width: {0}")]
    InvalidColumnWidth(f64),

    /// `build` was called before any sheet was added
    #[error("a workbook needs at least one sheet")]
    NoSheets,

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Row holds more cells than a sheet has columns
    #[error("Column count {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(usize, usize),

    /// NaN or infinite floating point value
    #[error("Cannot store non-finite number {0}")]
    InvalidNumber(f64),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),
}
