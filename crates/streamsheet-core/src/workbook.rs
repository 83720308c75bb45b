//! Workbook configuration collected before streaming starts

use crate::cell::DateSystem;
use crate::column::ColumnWidthRange;
use crate::error::{Error, Result};
use crate::sheet::SheetLayout;
use crate::style::{NumberFormatTable, StreamStyle, StyleRegistry};
use crate::MAX_SHEET_NAME_LEN;

/// How string cells are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StringEncoding {
    /// `t="s"` with a de-duplicated `sharedStrings.xml` written on close
    #[default]
    SharedStrings,
    /// `t="inlineStr"`, no shared-string part
    InlineStrings,
}

/// Workbook-level settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkbookSettings {
    /// Storage for string cells
    pub string_encoding: StringEncoding,
    /// Epoch for date cells
    pub date_system: DateSystem,
}

/// Everything a streaming writer needs, collected by the builder
///
/// The builder owns a draft while it is configured and moves it into the
/// writer on build, after which nothing can register styles, formats or
/// sheets any more.
#[derive(Debug, Clone, Default)]
pub struct WorkbookDraft {
    sheets: Vec<SheetLayout>,
    styles: StyleRegistry,
    formats: NumberFormatTable,
    settings: WorkbookSettings,
}

impl WorkbookDraft {
    /// Create an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a batch of styles; see [`StyleRegistry::register_all`]
    pub fn add_styles(&mut self, styles: &[StreamStyle]) -> Result<()> {
        self.styles.register_all(styles, &self.formats)
    }

    /// Register a custom number format and return its ID
    pub fn add_number_format(&mut self, code: &str) -> u32 {
        self.formats.register(code)
    }

    /// Append a sheet and return its index
    pub fn add_sheet(&mut self, name: &str, column_styles: &[StreamStyle]) -> Result<usize> {
        self.validate_sheet_name(name)?;

        let column_styles = column_styles
            .iter()
            .map(|style| self.styles.require(style))
            .collect::<Result<Vec<_>>>()?;

        let index = self.sheets.len();
        self.sheets.push(SheetLayout::new(name, column_styles));
        Ok(index)
    }

    /// Apply `width` to the 1-based columns `min..=max` of a sheet
    pub fn set_column_width(&mut self, sheet: usize, min: u16, max: u16, width: f64) -> Result<()> {
        let count = self.sheets.len();
        let layout = self
            .sheets
            .get_mut(sheet)
            .ok_or(Error::SheetOutOfBounds(sheet, count))?;
        layout.push_width(ColumnWidthRange::new(min, max, width)?);
        Ok(())
    }

    /// Mutable workbook settings
    pub fn settings_mut(&mut self) -> &mut WorkbookSettings {
        &mut self.settings
    }

    /// Check the draft can be streamed
    pub fn validate(&self) -> Result<()> {
        if self.sheets.is_empty() {
            return Err(Error::NoSheets);
        }
        Ok(())
    }

    /// Sheets in output order
    pub fn sheets(&self) -> &[SheetLayout] {
        &self.sheets
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: usize) -> Option<&SheetLayout> {
        self.sheets.get(index)
    }

    /// Number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// The style registry
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// The number format table
    pub fn formats(&self) -> &NumberFormatTable {
        &self.formats
    }

    /// Workbook settings
    pub fn settings(&self) -> &WorkbookSettings {
        &self.settings
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        // Spreadsheet applications compare sheet names case-insensitively
        let name_lower = name.to_lowercase();
        if self
            .sheets
            .iter()
            .any(|s| s.name().to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}
