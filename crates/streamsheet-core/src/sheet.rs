//! Sheet descriptions frozen at build time

use crate::column::{coalesce_columns, ColumnInfo, ColumnWidthRange};

/// One sheet of a streamed workbook
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    name: String,
    column_styles: Vec<u32>,
    widths: Vec<ColumnWidthRange>,
}

impl SheetLayout {
    /// Create a sheet with per-column default style indices
    pub fn new<S: Into<String>>(name: S, column_styles: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            column_styles,
            widths: Vec::new(),
        }
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default style index of each column, column A first
    pub fn column_styles(&self) -> &[u32] {
        &self.column_styles
    }

    /// Width ranges in registration order
    pub fn widths(&self) -> &[ColumnWidthRange] {
        &self.widths
    }

    /// Attach a width range
    pub fn push_width(&mut self, range: ColumnWidthRange) {
        self.widths.push(range);
    }

    /// Width of the 1-based column `col`, from the first range containing it
    pub fn width_of(&self, col: u16) -> Option<f64> {
        ColumnWidthRange::find(&self.widths, col).map(|r| r.width)
    }

    /// `<col>` runs for this sheet
    pub fn columns(&self) -> Vec<ColumnInfo> {
        coalesce_columns(&self.widths, &self.column_styles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_lookup() {
        let mut sheet = SheetLayout::new("Sheet1", vec![0]);
        sheet.push_width(ColumnWidthRange::new(1, 1, 20.0).unwrap());
        sheet.push_width(ColumnWidthRange::new(2, 4, 30.23).unwrap());

        assert_eq!(sheet.width_of(1), Some(20.0));
        for col in 2..=4 {
            assert_eq!(sheet.width_of(col), Some(30.23));
        }
        assert_eq!(sheet.width_of(5), None);
        assert_eq!(sheet.columns().len(), 2);
    }
}
