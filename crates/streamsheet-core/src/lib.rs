//! # streamsheet-core
//!
//! Core data structures for the streamsheet streaming spreadsheet writer.
//!
//! This crate provides the types shared by the writer and the reader:
//! - [`StreamStyle`] and [`StyleRegistry`] - Cell formatting and its index space
//! - [`NumberFormatTable`] - Custom number format codes
//! - [`StreamCell`] and [`CellValue`] - What a row is made of
//! - [`WorkbookDraft`] - Sheets, styles and settings frozen at build time
//!
//! ## Example
//!
//! ```rust
//! use streamsheet_core::{StreamStyle, WorkbookDraft, DEFAULT_STRING};
//!
//! let mut draft = WorkbookDraft::new();
//! let five_decimals = draft.add_number_format("0.00000");
//! draft
//!     .add_styles(&[DEFAULT_STRING.clone(), StreamStyle::with_number_format(five_decimals)])
//!     .unwrap();
//! draft.add_sheet("Prices", &[DEFAULT_STRING.clone()]).unwrap();
//! assert_eq!(five_decimals, 164);
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod sheet;
pub mod style;
pub mod workbook;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange, CellType, CellValue, DateSystem, StreamCell};
pub use column::{coalesce_columns, ColumnInfo, ColumnWidthRange, DEFAULT_COLUMN_WIDTH};
pub use error::{Error, Result};
pub use sheet::SheetLayout;
pub use workbook::{StringEncoding, WorkbookDraft, WorkbookSettings};

// Re-export all style types for convenience
pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, NumberFormatEntry, NumberFormatTable, PatternType,
    StreamStyle, StyleRegistry, Underline, VerticalAlignment, BOLD_INTEGER, BOLD_STRING,
    DEFAULT_BOOLEAN, DEFAULT_DATE, DEFAULT_DATETIME, DEFAULT_DECIMAL, DEFAULT_INTEGER,
    DEFAULT_STRING, ITALIC_INTEGER, ITALIC_STRING, UNDERLINED_INTEGER, UNDERLINED_STRING,
};

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name, in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;
