//! Build-time configuration of a streamed workbook

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use crate::error::XlsxResult;
use crate::writer::StreamFile;
use streamsheet_core::{DateSystem, StreamStyle, StringEncoding, WorkbookDraft};

/// Collects sheets, styles and number formats, then starts streaming.
///
/// Everything a cell can refer to has to be declared here: once
/// [`build`](Self::build) has been called the builder is gone, so late
/// configuration is a compile error rather than a runtime one.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use streamsheet_xlsx::StreamFileBuilder;
/// use streamsheet_core::{StreamCell, StreamStyle, BOLD_STRING, DEFAULT_STRING};
///
/// let mut builder = StreamFileBuilder::new(Cursor::new(Vec::<u8>::new()));
/// builder.add_style_list(&StreamStyle::defaults())?;
/// builder.add_sheet("People", &[BOLD_STRING.clone(), DEFAULT_STRING.clone()])?;
///
/// let mut file = builder.build()?;
/// file.write_row(&[StreamCell::styled_string("Name", &BOLD_STRING), StreamCell::string("Age")])?;
/// file.write_row(&[StreamCell::string("Ada"), StreamCell::integer(36)])?;
/// let summary = file.close()?;
/// assert_eq!(summary.sheets[0].rows, 2);
/// # Ok::<(), streamsheet_xlsx::XlsxError>(())
/// ```
///
/// The builder cannot be used after `build`:
///
/// ```compile_fail
/// use std::io::Cursor;
/// use streamsheet_xlsx::StreamFileBuilder;
///
/// let mut builder = StreamFileBuilder::new(Cursor::new(Vec::<u8>::new()));
/// builder.add_sheet("Sheet1", &[]).unwrap();
/// let file = builder.build().unwrap();
/// builder.add_sheet("Sheet2", &[]).unwrap();
/// ```
///
/// and cannot be built twice:
///
/// ```compile_fail
/// use std::io::Cursor;
/// use streamsheet_xlsx::StreamFileBuilder;
///
/// let mut builder = StreamFileBuilder::new(Cursor::new(Vec::<u8>::new()));
/// builder.add_sheet("Sheet1", &[]).unwrap();
/// let first = builder.build().unwrap();
/// let second = builder.build().unwrap();
/// ```
pub struct StreamFileBuilder<W: Write + Seek> {
    writer: W,
    draft: WorkbookDraft,
}

impl StreamFileBuilder<BufWriter<File>> {
    /// Create a builder that writes to a new file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Seek> StreamFileBuilder<W> {
    /// Create a builder that writes to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            draft: WorkbookDraft::new(),
        }
    }

    /// Register styles cells and columns may use.
    ///
    /// Number formats the styles reference must be built in or already added
    /// with [`add_number_format`](Self::add_number_format).
    pub fn add_style_list(&mut self, styles: &[StreamStyle]) -> XlsxResult<()> {
        Ok(self.draft.add_styles(styles)?)
    }

    /// Add a sheet; `column_styles[i]` is the default style of column `i + 1`
    pub fn add_sheet(&mut self, name: &str, column_styles: &[StreamStyle]) -> XlsxResult<usize> {
        Ok(self.draft.add_sheet(name, column_styles)?)
    }

    /// Register a custom number format code and return its ID
    pub fn add_number_format(&mut self, code: &str) -> u32 {
        self.draft.add_number_format(code)
    }

    /// Set the width of the 1-based columns `min..=max` of an added sheet
    pub fn set_column_width(
        &mut self,
        sheet: usize,
        min: u16,
        max: u16,
        width: f64,
    ) -> XlsxResult<()> {
        Ok(self.draft.set_column_width(sheet, min, max, width)?)
    }

    /// Choose how string cells are stored
    pub fn string_encoding(&mut self, encoding: StringEncoding) -> &mut Self {
        self.draft.settings_mut().string_encoding = encoding;
        self
    }

    /// Choose the epoch date cells count from
    pub fn date_system(&mut self, system: DateSystem) -> &mut Self {
        self.draft.settings_mut().date_system = system;
        self
    }

    /// Write the static parts and return the writer, positioned on the first
    /// sheet
    pub fn build(self) -> XlsxResult<StreamFile<W>> {
        StreamFile::start(self.draft, self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XlsxError;
    use std::io::Cursor;
    use streamsheet_core::{Error, DEFAULT_STRING};

    fn builder() -> StreamFileBuilder<Cursor<Vec<u8>>> {
        StreamFileBuilder::new(Cursor::new(Vec::new()))
    }

    #[test]
    fn test_build_without_sheets() {
        let err = builder().build().unwrap_err();
        assert_eq!(err.as_core(), Some(&Error::NoSheets));
    }

    #[test]
    fn test_style_needs_number_format_first() {
        let mut b = builder();
        let err = b
            .add_style_list(&[StreamStyle::with_number_format(164)])
            .unwrap_err();
        assert_eq!(err.as_core(), Some(&Error::UnknownNumberFormat(164)));

        let id = b.add_number_format("0.000");
        assert_eq!(id, 164);
        b.add_style_list(&[StreamStyle::with_number_format(id)]).unwrap();
    }

    #[test]
    fn test_configuration_errors_are_core_errors() {
        let mut b = builder();
        assert!(matches!(
            b.add_sheet("Sheet1", &[DEFAULT_STRING.clone()]),
            Err(XlsxError::Core(Error::StyleNotAdded))
        ));
        assert!(matches!(
            b.set_column_width(0, 1, 1, 10.0),
            Err(XlsxError::Core(Error::SheetOutOfBounds(0, 0)))
        ));
    }

    #[test]
    fn test_settings_chain() {
        let mut b = builder();
        b.string_encoding(StringEncoding::InlineStrings)
            .date_system(DateSystem::Excel1904);
        assert!(b.draft.settings().date_system.is_1904());
        assert_eq!(
            b.draft.settings().string_encoding,
            StringEncoding::InlineStrings
        );
    }
}
