//! Cell alignment, written as the `<alignment>` child of a `cellXfs` entry

/// How text sits inside its cell
///
/// The default writes no `<alignment>` element at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    /// Indent level, 0 to 250
    pub indent: u8,
    /// `textRotation`: -90 to 90 degrees, or 255 for stacked text
    pub rotation: i16,
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizontal(mut self, horizontal: HorizontalAlignment) -> Self {
        self.horizontal = horizontal;
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap_text = wrap;
        self
    }

    /// Whether this alignment adds nothing to the xf entry
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// `horizontal` attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// Text left, numbers right
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
}

/// `vertical` attribute values; cells sit at the bottom unless told otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    Top,
    Center,
    #[default]
    Bottom,
    Justify,
    Distributed,
}
