//! # streamsheet
//!
//! Write large XLSX workbooks row by row without holding them in memory.
//!
//! A workbook is described once (styles, sheets, column widths and number
//! formats) and then streamed: every row goes straight into the zip entry of
//! the current sheet.
//!
//! ## Features
//!
//! - Deduplicated cell styles with fonts, fills, borders and alignment
//! - Custom number formats, including dates and times
//! - Shared or inline strings, 1900 or 1904 date system
//! - Column widths and per-column default styles
//! - A validation reader for checking what was written
//!
//! ## Example
//!
//! ```rust
//! use streamsheet::prelude::*;
//! use std::io::Cursor;
//!
//! let mut builder = StreamFileBuilder::new(Cursor::new(Vec::<u8>::new()));
//! builder.add_style_list(&StreamStyle::defaults())?;
//! builder.add_sheet("Inventory", &[BOLD_STRING.clone(), DEFAULT_INTEGER.clone()])?;
//! builder.set_column_width(0, 1, 1, 24.0)?;
//!
//! let mut file = builder.build()?;
//! file.write_row(&[StreamCell::styled_string("Item", &BOLD_STRING), StreamCell::string("Count")])?;
//! file.write_row(&[StreamCell::string("bolts"), StreamCell::integer(1200)])?;
//! let summary = file.close()?;
//!
//! assert_eq!(summary.sheet("Inventory").map(|s| s.rows), Some(2));
//! # Ok::<(), streamsheet::XlsxError>(())
//! ```

pub mod prelude;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// Re-export core types
pub use streamsheet_core::{
    coalesce_columns,
    Alignment,
    BorderEdge,
    BorderLineStyle,
    BorderStyle,
    // Cell types
    CellAddress,
    CellRange,
    CellType,
    CellValue,
    // Columns
    ColumnInfo,
    ColumnWidthRange,
    Color,
    DateSystem,
    // Error types
    Error,
    FillStyle,
    FontStyle,
    HorizontalAlignment,
    NumberFormat,
    NumberFormatEntry,
    NumberFormatTable,
    PatternType,
    Result,
    SheetLayout,
    StreamCell,
    // Style types
    StreamStyle,
    StringEncoding,
    StyleRegistry,
    Underline,
    VerticalAlignment,
    WorkbookDraft,
    WorkbookSettings,

    // Baseline styles
    BOLD_INTEGER,
    BOLD_STRING,
    DEFAULT_BOOLEAN,
    DEFAULT_COLUMN_WIDTH,
    DEFAULT_DATE,
    DEFAULT_DATETIME,
    DEFAULT_DECIMAL,
    DEFAULT_INTEGER,
    DEFAULT_STRING,
    ITALIC_INTEGER,
    ITALIC_STRING,
    // Constants
    MAX_COLS,
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
    UNDERLINED_INTEGER,
    UNDERLINED_STRING,
};

// Re-export I/O types
pub use streamsheet_xlsx::{
    decode_excel_escapes, ReadCell, ReadSheet, ReadWorkbook, SheetSummary, StreamFile,
    StreamFileBuilder, WorkbookSummary, XlsxError, XlsxReader, XlsxResult,
};

/// Value formatting used by the validation reader
pub mod format {
    pub use streamsheet_xlsx::reader::{format_number, format_raw};
}

/// Start a workbook streamed to a new `.xlsx` file at `path`
///
/// ```no_run
/// let mut builder = streamsheet::create("report.xlsx")?;
/// builder.add_style_list(&streamsheet::StreamStyle::defaults())?;
/// builder.add_sheet("Sheet1", &[])?;
/// builder.build()?.close()?;
/// # Ok::<(), streamsheet::XlsxError>(())
/// ```
pub fn create<P: AsRef<Path>>(path: P) -> XlsxResult<StreamFileBuilder<BufWriter<File>>> {
    let path = path.as_ref();
    check_extension(path)?;
    StreamFileBuilder::create(path)
}

/// Read a finished `.xlsx` file back
pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<ReadWorkbook> {
    let path = path.as_ref();
    check_extension(path)?;
    XlsxReader::read_file(path)
}

fn check_extension(path: &Path) -> XlsxResult<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => Ok(()),
        _ => Err(XlsxError::InvalidFormat(format!(
            "Unsupported file format: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_extension() {
        assert!(check_extension(Path::new("out.xlsx")).is_ok());
        assert!(check_extension(Path::new("OUT.XLSX")).is_ok());
        assert!(matches!(
            check_extension(Path::new("out.csv")),
            Err(XlsxError::InvalidFormat(_))
        ));
        assert!(check_extension(Path::new("out")).is_err());
    }
}
