//! Fonts, one `<font>` entry each in `styles.xml`

use super::Color;

/// Font of a cell
///
/// The default is the workbook font every reader expects at font index 0:
/// 11pt Calibri with the automatic color.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub name: String,
    /// Size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub color: Color,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            color: Color::Auto,
        }
    }
}

impl FontStyle {
    /// Plain font of the given size and family
    pub fn sized<S: Into<String>>(size: f64, name: S) -> Self {
        Self {
            name: name.into(),
            size,
            ..Self::default()
        }
    }
}

// `f64` is not `Hash`; sizes hash by bit pattern
impl std::hash::Hash for FontStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strikethrough.hash(state);
        self.color.hash(state);
    }
}

impl Eq for FontStyle {}

/// `<u val="...">` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sized() {
        let font = FontStyle::sized(12.0, "Courier");
        assert_eq!((font.name.as_str(), font.size), ("Courier", 12.0));
        assert!(!font.bold && font.color.is_auto());
        assert_ne!(font, FontStyle::sized(12.5, "Courier"));
    }
}
