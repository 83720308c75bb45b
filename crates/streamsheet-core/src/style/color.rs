//! Colors as they appear in `<color>`, `<fgColor>` and `<bgColor>` elements

/// A style color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// `auto="1"`, or no color element at all
    #[default]
    Auto,
    /// Opaque `rgb`, written with an `FF` alpha
    Rgb { r: u8, g: u8, b: u8 },
    /// `rgb` with an explicit alpha byte
    Argb { a: u8, r: u8, g: u8, b: u8 },
    /// `theme` index with a `tint`, stored as a percentage
    Theme { index: u8, tint: i8 },
    /// `indexed` legacy palette entry
    Indexed(u8),
}

impl Color {
    pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
    /// Fill of "good" cells
    pub const LIGHT_GREEN: Color = Color::Rgb {
        r: 198,
        g: 239,
        b: 206,
    };
    /// Fill of "bad" cells
    pub const LIGHT_RED: Color = Color::Rgb {
        r: 255,
        g: 199,
        b: 206,
    };

    /// Parse a 6-digit RGB or 8-digit ARGB hex value, with or without `#`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            6 => Some(Color::Rgb {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
            }),
            8 => Some(Color::Argb {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// The `rgb` attribute value, for explicit colors only
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Rgb { r, g, b } => Some(format!("FF{:02X}{:02X}{:02X}", r, g, b)),
            Color::Argb { a, r, g, b } => Some(format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b)),
            _ => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }
}
