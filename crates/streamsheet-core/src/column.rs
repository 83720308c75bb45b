//! Column widths and `<col>` metadata

use crate::error::{Error, Result};
use crate::MAX_COLS;

/// Width applied when a column has a default style but no explicit width
pub const DEFAULT_COLUMN_WIDTH: f64 = 9.140625;

/// A width applied to the 1-based columns `min..=max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidthRange {
    /// First column (1-based)
    pub min: u16,
    /// Last column (1-based, inclusive)
    pub max: u16,
    /// Width in characters
    pub width: f64,
}

impl ColumnWidthRange {
    /// Create a validated range
    pub fn new(min: u16, max: u16, width: f64) -> Result<Self> {
        if min == 0 || min > max || max > MAX_COLS {
            return Err(Error::InvalidColumnRange { min, max });
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidColumnWidth(width));
        }
        Ok(Self { min, max, width })
    }

    /// Whether the 1-based column `col` falls in this range
    pub fn contains(&self, col: u16) -> bool {
        (self.min..=self.max).contains(&col)
    }

    /// First range containing `col`, in registration order
    pub fn find(ranges: &[ColumnWidthRange], col: u16) -> Option<&ColumnWidthRange> {
        ranges.iter().find(|r| r.contains(col))
    }
}

/// One `<col>` element: a registered width range, or a run of unsized
/// columns sharing a default style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnInfo {
    /// First column (1-based)
    pub min: u16,
    /// Last column (1-based, inclusive)
    pub max: u16,
    /// Explicit width, if the entry comes from a width range
    pub width: Option<f64>,
    /// Default style index for empty cells in the entry
    pub style: Option<u32>,
}

/// Turn width ranges and per-column default styles into `<col>` entries.
///
/// `column_styles[i]` is the default style of column `i + 1`. Every width
/// range keeps its registered bounds, except where an earlier range already
/// claimed a column; those columns are cut out. A width entry carries a
/// style only when all of its columns share one. Columns outside every range
/// are grouped into runs of equal style. Entries come back ordered by `min`.
pub fn coalesce_columns(ranges: &[ColumnWidthRange], column_styles: &[u32]) -> Vec<ColumnInfo> {
    let mut entries = Vec::with_capacity(ranges.len());

    for (i, range) in ranges.iter().enumerate() {
        let earlier = &ranges[..i];
        let mut start = None;
        for col in range.min..=range.max {
            let claimed = earlier.iter().any(|r| r.contains(col));
            match (claimed, start) {
                (false, None) => start = Some(col),
                (true, Some(min)) => {
                    entries.push(width_entry(min, col - 1, range.width, column_styles));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(min) = start {
            entries.push(width_entry(min, range.max, range.width, column_styles));
        }
    }

    let styled = column_styles.len().min(MAX_COLS as usize) as u16;
    let mut runs: Vec<ColumnInfo> = Vec::new();
    for col in 1..=styled {
        if ColumnWidthRange::find(ranges, col).is_some() {
            continue;
        }
        let style = column_styles.get(col as usize - 1).copied();
        match runs.last_mut() {
            Some(run) if run.max + 1 == col && run.style == style => run.max = col,
            _ => runs.push(ColumnInfo {
                min: col,
                max: col,
                width: None,
                style,
            }),
        }
    }

    entries.extend(runs);
    entries.sort_by_key(|e| e.min);
    entries
}

fn width_entry(min: u16, max: u16, width: f64, column_styles: &[u32]) -> ColumnInfo {
    let mut styles = (min..=max).map(|col| column_styles.get(col as usize - 1).copied());
    let first = styles.next().flatten();
    let style = first.filter(|s| styles.all(|other| other == Some(*s)));
    ColumnInfo {
        min,
        max,
        width: Some(width),
        style,
    }
}
