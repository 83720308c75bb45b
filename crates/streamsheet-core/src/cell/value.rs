//! Cell values and streamed cells

use crate::style::{
    StreamStyle, DEFAULT_BOOLEAN, DEFAULT_DATE, DEFAULT_DECIMAL, DEFAULT_INTEGER, DEFAULT_STRING,
};
use chrono::NaiveDateTime;
use std::fmt;

/// Cell type marker as written in the `t` attribute of `<c>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// `b`
    Boolean,
    /// `n`
    Number,
    /// `e`
    Error,
    /// `s`, index into the shared-string table
    SharedString,
    /// `str`, a formula string result
    String,
    /// `inlineStr`
    InlineString,
    /// `d`, ISO 8601 date
    Date,
}

impl CellType {
    /// The `t` attribute value
    pub fn marker(self) -> &'static str {
        match self {
            CellType::Boolean => "b",
            CellType::Number => "n",
            CellType::Error => "e",
            CellType::SharedString => "s",
            CellType::String => "str",
            CellType::InlineString => "inlineStr",
            CellType::Date => "d",
        }
    }

    /// Parse a `t` attribute value; a missing attribute means [`CellType::Number`]
    pub fn from_marker(marker: &str) -> Option<Self> {
        let t = match marker {
            "b" => CellType::Boolean,
            "n" => CellType::Number,
            "e" => CellType::Error,
            "s" => CellType::SharedString,
            "str" => CellType::String,
            "inlineStr" => CellType::InlineString,
            "d" => CellType::Date,
            _ => return None,
        };
        Some(t)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// The value carried by a [`StreamCell`]
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text, shared or inline depending on the workbook's string encoding
    String(String),
    /// Whole number
    Integer(i64),
    /// Floating point number; must be finite
    Float(f64),
    /// TRUE/FALSE
    Boolean(bool),
    /// Text always written inline in the cell
    InlineString(String),
    /// Date-time, written as a serial number
    Date(NaiveDateTime),
    /// Error literal such as `#N/A`
    Error(String),
    /// Raw text with an explicit type marker, passed through unchanged
    Typed {
        /// Marker written as `t`
        cell_type: CellType,
        /// Cell content
        text: String,
    },
}

impl CellValue {
    /// Baseline style used when a cell does not name one
    pub fn baseline_style(&self) -> &'static StreamStyle {
        match self {
            CellValue::String(_)
            | CellValue::InlineString(_)
            | CellValue::Error(_)
            | CellValue::Typed { .. } => &*DEFAULT_STRING,
            CellValue::Integer(_) => &*DEFAULT_INTEGER,
            CellValue::Float(_) => &*DEFAULT_DECIMAL,
            CellValue::Boolean(_) => &*DEFAULT_BOOLEAN,
            CellValue::Date(_) => &*DEFAULT_DATE,
        }
    }

    /// Get the type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::String(_) => "string",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Boolean(_) => "boolean",
            CellValue::InlineString(_) => "inline string",
            CellValue::Date(_) => "date",
            CellValue::Error(_) => "error",
            CellValue::Typed { .. } => "typed",
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Integer(n.into())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::Date(dt)
    }
}

/// A cell ready to be streamed: a value and an optional style
///
/// The style is borrowed; it must have been registered on the builder or
/// the row write fails.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamCell<'a> {
    /// The value
    pub value: CellValue,
    /// Explicit style; `None` uses [`CellValue::baseline_style`]
    pub style: Option<&'a StreamStyle>,
}

impl<'a> StreamCell<'a> {
    /// Cell with an explicit style
    pub fn new(value: impl Into<CellValue>, style: &'a StreamStyle) -> Self {
        Self {
            value: value.into(),
            style: Some(style),
        }
    }

    /// Text cell with the baseline string style
    pub fn string(text: impl Into<String>) -> Self {
        CellValue::String(text.into()).into()
    }

    /// Text cell with a style
    pub fn styled_string(text: impl Into<String>, style: &'a StreamStyle) -> Self {
        Self::new(CellValue::String(text.into()), style)
    }

    /// Integer cell with the baseline integer style
    pub fn integer(n: i64) -> Self {
        CellValue::Integer(n).into()
    }

    /// Integer cell with a style
    pub fn styled_integer(n: i64, style: &'a StreamStyle) -> Self {
        Self::new(CellValue::Integer(n), style)
    }

    /// Float cell with the baseline decimal style
    pub fn float(n: f64) -> Self {
        CellValue::Float(n).into()
    }

    /// Boolean cell
    pub fn boolean(b: bool) -> Self {
        CellValue::Boolean(b).into()
    }

    /// Inline string cell
    pub fn inline(text: impl Into<String>) -> Self {
        CellValue::InlineString(text.into()).into()
    }

    /// Date cell with the baseline date style
    pub fn date(dt: NaiveDateTime) -> Self {
        CellValue::Date(dt).into()
    }

    /// Error literal cell
    pub fn error(text: impl Into<String>) -> Self {
        CellValue::Error(text.into()).into()
    }

    /// Raw cell with an explicit type marker
    pub fn typed(text: impl Into<String>, cell_type: CellType, style: &'a StreamStyle) -> Self {
        Self::new(
            CellValue::Typed {
                cell_type,
                text: text.into(),
            },
            style,
        )
    }

    /// Replace the style
    pub fn with_style(mut self, style: &'a StreamStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// The style this cell is written with
    pub fn effective_style(&self) -> &'a StreamStyle {
        match self.style {
            Some(style) => style,
            None => self.value.baseline_style(),
        }
    }
}

impl From<CellValue> for StreamCell<'_> {
    fn from(value: CellValue) -> Self {
        Self { value, style: None }
    }
}
