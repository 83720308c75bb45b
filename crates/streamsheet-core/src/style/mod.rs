//! Cell styling types
//!
//! This module contains the style descriptors a streamed workbook can use:
//! - [`StreamStyle`] - Complete cell style, referenced by index from every cell
//! - [`FontStyle`] - Font settings
//! - [`FillStyle`] - Background fill
//! - [`BorderStyle`] - Cell borders
//! - [`Alignment`] - Text alignment
//! - [`Color`] - Color representation
//!
//! Styles are registered once on the builder through [`StyleRegistry`];
//! custom number format codes live in [`NumberFormatTable`].

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod number_format;
mod registry;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle};
pub use color::Color;
pub use fill::{FillStyle, PatternType};
pub use font::{FontStyle, Underline};
pub use number_format::{
    builtin_format_code, builtin_format_id, is_date_format_code, NumberFormat, NumberFormatEntry,
    NumberFormatTable, CUSTOM_NUM_FMT_START,
};
pub use registry::StyleRegistry;

use once_cell::sync::Lazy;

/// Complete cell style
///
/// Two styles with equal fields are the same style: the registry hands out
/// one index for both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StreamStyle {
    /// Font settings
    pub font: FontStyle,
    /// Fill/background settings
    pub fill: FillStyle,
    /// Border settings
    pub border: BorderStyle,
    /// Text alignment
    pub alignment: Alignment,
    /// Number format ID, built-in or from [`NumberFormatTable::register`]
    pub num_fmt_id: u32,
}

impl StreamStyle {
    /// Create a style from all of its parts
    pub fn new(
        num_fmt_id: u32,
        font: FontStyle,
        fill: FillStyle,
        alignment: Alignment,
        border: BorderStyle,
    ) -> Self {
        Self {
            font,
            fill,
            border,
            alignment,
            num_fmt_id,
        }
    }

    /// Plain style with the given number format
    pub fn with_number_format(num_fmt_id: u32) -> Self {
        Self {
            num_fmt_id,
            ..Self::default()
        }
    }

    /// Set the font
    pub fn font(mut self, font: FontStyle) -> Self {
        self.font = font;
        self
    }

    /// Set the fill
    pub fn fill(mut self, fill: FillStyle) -> Self {
        self.fill = fill;
        self
    }

    /// Set fill color (solid fill)
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::Solid { color };
        self
    }

    /// Set the border
    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    /// Set the alignment
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the number format ID
    pub fn num_fmt(mut self, num_fmt_id: u32) -> Self {
        self.num_fmt_id = num_fmt_id;
        self
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set single underline
    pub fn underlined(mut self, underlined: bool) -> Self {
        self.font.underline = if underlined {
            Underline::Single
        } else {
            Underline::None
        };
        self
    }

    /// All baseline styles, in a stable order
    ///
    /// Registering this list makes every unstyled cell writable.
    pub fn defaults() -> Vec<StreamStyle> {
        vec![
            DEFAULT_STRING.clone(),
            BOLD_STRING.clone(),
            ITALIC_STRING.clone(),
            UNDERLINED_STRING.clone(),
            DEFAULT_INTEGER.clone(),
            BOLD_INTEGER.clone(),
            ITALIC_INTEGER.clone(),
            UNDERLINED_INTEGER.clone(),
            DEFAULT_DECIMAL.clone(),
            DEFAULT_DATE.clone(),
            DEFAULT_DATETIME.clone(),
            DEFAULT_BOOLEAN.clone(),
        ]
    }
}

/// Plain text, General format
pub static DEFAULT_STRING: Lazy<StreamStyle> =
    Lazy::new(|| StreamStyle::with_number_format(NumberFormat::GENERAL));
/// Bold text
pub static BOLD_STRING: Lazy<StreamStyle> = Lazy::new(|| DEFAULT_STRING.clone().bold(true));
/// Italic text
pub static ITALIC_STRING: Lazy<StreamStyle> = Lazy::new(|| DEFAULT_STRING.clone().italic(true));
/// Underlined text
pub static UNDERLINED_STRING: Lazy<StreamStyle> =
    Lazy::new(|| DEFAULT_STRING.clone().underlined(true));

/// Whole numbers, format `0`
pub static DEFAULT_INTEGER: Lazy<StreamStyle> =
    Lazy::new(|| StreamStyle::with_number_format(NumberFormat::INTEGER));
/// Bold whole numbers
pub static BOLD_INTEGER: Lazy<StreamStyle> = Lazy::new(|| DEFAULT_INTEGER.clone().bold(true));
/// Italic whole numbers
pub static ITALIC_INTEGER: Lazy<StreamStyle> = Lazy::new(|| DEFAULT_INTEGER.clone().italic(true));
/// Underlined whole numbers
pub static UNDERLINED_INTEGER: Lazy<StreamStyle> =
    Lazy::new(|| DEFAULT_INTEGER.clone().underlined(true));

/// Decimals, format `0.00`
pub static DEFAULT_DECIMAL: Lazy<StreamStyle> =
    Lazy::new(|| StreamStyle::with_number_format(NumberFormat::DECIMAL));

/// Dates, format `mm-dd-yy`
pub static DEFAULT_DATE: Lazy<StreamStyle> =
    Lazy::new(|| StreamStyle::with_number_format(NumberFormat::DATE_SHORT));
/// Date and time, format `m/d/yy h:mm`
pub static DEFAULT_DATETIME: Lazy<StreamStyle> =
    Lazy::new(|| StreamStyle::with_number_format(NumberFormat::DATETIME));

/// Booleans; General, so it shares its index with [`DEFAULT_STRING`]
pub static DEFAULT_BOOLEAN: Lazy<StreamStyle> =
    Lazy::new(|| StreamStyle::with_number_format(NumberFormat::GENERAL));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baselines_differ_where_expected() {
        assert_eq!(*DEFAULT_STRING, StreamStyle::default());
        assert_eq!(*DEFAULT_BOOLEAN, *DEFAULT_STRING);
        assert_ne!(*BOLD_STRING, *DEFAULT_STRING);
        assert_ne!(*BOLD_INTEGER, *BOLD_STRING);
        assert_eq!(UNDERLINED_INTEGER.font.underline, Underline::Single);
        assert_eq!(DEFAULT_DATE.num_fmt_id, 14);
    }

    #[test]
    fn test_defaults_list() {
        let defaults = StreamStyle::defaults();
        assert_eq!(defaults.len(), 12);
        assert_eq!(defaults[0], *DEFAULT_STRING);
        assert!(defaults.contains(&DEFAULT_DATETIME));
    }
}
