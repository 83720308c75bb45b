//! Streaming XLSX writer
//!
//! [`StreamFile`] is created by
//! [`StreamFileBuilder::build`](crate::StreamFileBuilder::build). It keeps
//! exactly one zip entry open, the current sheet, and appends each row to it
//! as soon as the row is written. Nothing about a finished row is kept apart
//! from its strings when the workbook uses a shared-string table.

pub(crate) mod cell;
pub(crate) mod package;
pub(crate) mod shared_strings;
pub(crate) mod sheet;

use std::io::{Seek, Write};

use zip::ZipWriter;

use crate::error::{XlsxError, XlsxResult};
use cell::{encode_row, validate_value, EncodeContext};
use package::{part_options, sheet_part_name, write_static_parts, SHARED_STRINGS_PART};
use shared_strings::SharedStringTable;
use sheet::{sheet_header, SheetExtent, SHEET_TRAILER};
use streamsheet_core::{CellValue, Error, StreamCell, StringEncoding, WorkbookDraft};

/// What was written to one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    /// Sheet name
    pub name: String,
    /// Rows written
    pub rows: u32,
    /// Cells per row, zero for an empty sheet
    pub columns: usize,
    /// Range covered by the written cells, e.g. `A1:D2`; `A1` when empty
    pub dimension: String,
}

/// What was written to the whole workbook, returned by [`StreamFile::close`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookSummary {
    /// One entry per sheet, in sheet order
    pub sheets: Vec<SheetSummary>,
    /// Distinct strings in the shared-string table
    pub shared_strings: usize,
}

impl WorkbookSummary {
    /// Look up a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&SheetSummary> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Rows written across all sheets
    pub fn total_rows(&self) -> u64 {
        self.sheets.iter().map(|s| u64::from(s.rows)).sum()
    }
}

/// A workbook being streamed, one sheet at a time
///
/// Rows go to the current sheet; [`next_sheet`](Self::next_sheet) moves the
/// cursor forward and there is no way back. [`close`](Self::close) must be
/// called to produce a valid file.
pub struct StreamFile<W: Write + Seek> {
    draft: WorkbookDraft,
    zip: ZipWriter<W>,
    current: usize,
    extent: SheetExtent,
    summaries: Vec<SheetSummary>,
    shared: SharedStringTable,
    // Reused across rows
    row_buf: String,
    style_buf: Vec<u32>,
}

impl<W: Write + Seek> std::fmt::Debug for StreamFile<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamFile")
            .field("sheets", &self.draft.sheet_count())
            .field("current", &self.current)
            .field("extent", &self.extent)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Seek> StreamFile<W> {
    /// Write the static parts and open the first sheet
    pub(crate) fn start(draft: WorkbookDraft, writer: W) -> XlsxResult<Self> {
        draft.validate()?;

        let mut zip = ZipWriter::new(writer);
        write_static_parts(&mut zip, &draft)?;
        log::debug!(
            "streaming workbook: {} sheet(s), {} style(s), {} custom number format(s)",
            draft.sheet_count(),
            draft.styles().len(),
            draft.formats().len()
        );

        let mut file = Self {
            draft,
            zip,
            current: 0,
            extent: SheetExtent::default(),
            summaries: Vec::new(),
            shared: SharedStringTable::new(),
            row_buf: String::with_capacity(1024),
            style_buf: Vec::new(),
        };
        file.open_sheet(0)?;
        Ok(file)
    }

    /// Index of the sheet rows are written to
    pub fn current_sheet(&self) -> usize {
        self.current
    }

    /// Name of the sheet rows are written to
    pub fn current_sheet_name(&self) -> &str {
        self.draft
            .sheet(self.current)
            .map_or("", |layout| layout.name())
    }

    /// Number of sheets in the workbook
    pub fn sheet_count(&self) -> usize {
        self.draft.sheet_count()
    }

    /// Rows written to the current sheet so far
    pub fn rows_written(&self) -> u32 {
        self.extent.rows()
    }

    /// Append a row to the current sheet.
    ///
    /// The first row of a sheet fixes its width; later rows of a different
    /// width fail with [`Error::WrongRowWidth`]. Every cell's style must be
    /// registered. A failed row writes nothing.
    pub fn write_row(&mut self, row: &[StreamCell<'_>]) -> XlsxResult<()> {
        self.extent
            .check_row(self.current_sheet_name(), row.len())?;

        self.style_buf.clear();
        for cell in row {
            validate_value(&cell.value)?;
            let index = self.draft.styles().require(cell.effective_style())?;
            self.style_buf.push(index);
        }

        let row_index = self.extent.next_row();
        self.row_buf.clear();
        let mut ctx = EncodeContext {
            shared: &mut self.shared,
            encoding: self.draft.settings().string_encoding,
            date_system: self.draft.settings().date_system,
        };
        encode_row(&mut self.row_buf, row_index, row, &self.style_buf, &mut ctx);

        self.zip.write_all(self.row_buf.as_bytes())?;
        self.extent.record_row(row.len());
        log::trace!(
            "sheet {}: wrote row {} ({} cells)",
            self.current,
            row_index + 1,
            row.len()
        );
        Ok(())
    }

    /// Append several rows in order, stopping at the first error
    pub fn write_all<'c, I, R>(&mut self, rows: I) -> XlsxResult<()>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[StreamCell<'c>]>,
    {
        for row in rows {
            self.write_row(row.as_ref())?;
        }
        Ok(())
    }

    /// Append a row of plain strings with the baseline string style
    pub fn write_strings<S: AsRef<str>>(&mut self, row: &[S]) -> XlsxResult<()> {
        let cells: Vec<StreamCell<'_>> = row
            .iter()
            .map(|s| StreamCell::from(CellValue::String(s.as_ref().to_string())))
            .collect();
        self.write_row(&cells)
    }

    /// Finish the current sheet and move to the next one
    pub fn next_sheet(&mut self) -> XlsxResult<()> {
        if self.current + 1 >= self.draft.sheet_count() {
            return Err(Error::AlreadyOnLastSheet.into());
        }
        self.finish_sheet()?;
        self.current += 1;
        self.open_sheet(self.current)
    }

    /// Finish every sheet, write the shared strings and the zip directory
    pub fn close(self) -> XlsxResult<WorkbookSummary> {
        self.close_into_inner().map(|(summary, _)| summary)
    }

    /// Like [`close`](Self::close), also handing back the underlying writer
    pub fn close_into_inner(mut self) -> XlsxResult<(WorkbookSummary, W)> {
        self.finish_sheet()?;

        // Sheets the cursor never reached still need a valid part
        for index in self.current + 1..self.draft.sheet_count() {
            self.current = index;
            self.open_sheet(index)?;
            self.finish_sheet()?;
        }

        let uses_shared = self.draft.settings().string_encoding == StringEncoding::SharedStrings;
        if uses_shared {
            self.zip.start_file(SHARED_STRINGS_PART, part_options())?;
            self.shared.write_xml(&mut self.zip)?;
        }

        let summary = WorkbookSummary {
            sheets: std::mem::take(&mut self.summaries),
            shared_strings: self.shared.unique_count(),
        };
        let writer = self.zip.finish()?;
        log::debug!(
            "closed workbook: {} sheet(s), {} row(s), {} shared string(s)",
            summary.sheets.len(),
            summary.total_rows(),
            summary.shared_strings
        );
        Ok((summary, writer))
    }

    fn open_sheet(&mut self, index: usize) -> XlsxResult<()> {
        let layout = self
            .draft
            .sheet(index)
            .ok_or_else(|| XlsxError::InvalidFormat(format!("sheet {} not found", index)))?;

        self.zip.start_file(sheet_part_name(index), part_options())?;
        self.zip.write_all(sheet_header(layout).as_bytes())?;
        self.extent = SheetExtent::default();
        log::debug!("opened sheet {} '{}'", index, layout.name());
        Ok(())
    }

    fn finish_sheet(&mut self) -> XlsxResult<()> {
        self.zip.write_all(SHEET_TRAILER.as_bytes())?;
        let summary = self.extent.summarize(self.current_sheet_name());
        log::debug!(
            "finished sheet {} '{}': {} row(s), extent {}",
            self.current,
            summary.name,
            summary.rows,
            summary.dimension
        );
        self.summaries.push(summary);
        Ok(())
    }
}
