//! Worksheet header, trailer and the per-sheet extent accumulator

use std::fmt::Write as _;

use streamsheet_core::{
    CellAddress, CellRange, Error, Result, SheetLayout, DEFAULT_COLUMN_WIDTH,
    MAX_COLS, MAX_ROWS,
};

use super::SheetSummary;

/// Everything up to and including `<sheetData>`
///
/// `<cols>` must precede `<sheetData>`, and both its inputs are frozen at
/// build, so it is written here rather than at finalization.
pub(crate) fn sheet_header(layout: &SheetLayout) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetFormatPr defaultRowHeight="15"/>"#,
    );

    let columns = layout.columns();
    if !columns.is_empty() {
        xml.push_str("<cols>");
        for col in &columns {
            let _ = write!(
                xml,
                "<col min=\"{}\" max=\"{}\" width=\"{}\"",
                col.min,
                col.max,
                col.width.unwrap_or(DEFAULT_COLUMN_WIDTH)
            );
            if col.width.is_some() {
                xml.push_str(" customWidth=\"1\"");
            }
            if let Some(style) = col.style {
                let _ = write!(xml, " style=\"{}\"", style);
            }
            xml.push_str("/>");
        }
        xml.push_str("</cols>");
    }

    xml.push_str("<sheetData>");
    xml
}

/// Everything after the last row
pub(crate) const SHEET_TRAILER: &str = r#"</sheetData><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#;

/// Forward-only record of what has been written to the open sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SheetExtent {
    rows: u32,
    /// Fixed by the first row
    width: Option<usize>,
}

impl SheetExtent {
    /// Check a row of `width` cells can be appended to the sheet named `sheet`
    pub fn check_row(&self, sheet: &str, width: usize) -> Result<()> {
        if let Some(expected) = self.width {
            if width != expected {
                return Err(Error::WrongRowWidth {
                    sheet: sheet.to_string(),
                    expected,
                    actual: width,
                });
            }
        }
        if width > MAX_COLS as usize {
            return Err(Error::ColumnOutOfBounds(width, MAX_COLS as usize));
        }
        if self.rows >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(self.rows + 1, MAX_ROWS));
        }
        Ok(())
    }

    /// 0-based index of the next row
    pub fn next_row(&self) -> u32 {
        self.rows
    }

    /// Record a row that was written
    pub fn record_row(&mut self, width: usize) {
        self.width.get_or_insert(width);
        self.rows += 1;
    }

    /// Rows written so far
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Cells per row, zero before the first row
    pub fn width(&self) -> usize {
        self.width.unwrap_or(0)
    }

    /// Range covered by the written cells, `A1` for an empty sheet
    pub fn dimension(&self) -> String {
        if self.rows == 0 || self.width() == 0 {
            return "A1".to_string();
        }
        // Width is bounded by MAX_COLS in check_row
        let last_col = (self.width() - 1) as u16;
        CellRange::new(CellAddress::new(0, 0), CellAddress::new(self.rows - 1, last_col))
            .to_a1_string()
    }

    pub fn summarize(&self, name: &str) -> SheetSummary {
        SheetSummary {
            name: name.to_string(),
            rows: self.rows,
            columns: self.width(),
            dimension: self.dimension(),
        }
    }
}
