//! Fill/background style types

use super::Color;

/// Fill style for cell background
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FillStyle {
    /// No fill (transparent)
    #[default]
    None,

    /// Solid color fill
    Solid { color: Color },

    /// Pattern fill
    Pattern {
        pattern: PatternType,
        foreground: Color,
        background: Color,
    },
}

impl FillStyle {
    /// Create a solid fill with the given color
    pub fn solid(color: Color) -> Self {
        FillStyle::Solid { color }
    }

    /// Check if this is a "no fill"
    pub fn is_none(&self) -> bool {
        matches!(self, FillStyle::None)
    }
}

/// Pattern fill types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternType {
    /// No pattern
    #[default]
    None,
    /// Solid (100% foreground)
    Solid,
    /// 50% gray
    MediumGray,
    /// 75% gray
    DarkGray,
    /// 25% gray
    LightGray,
    /// Horizontal stripe
    DarkHorizontal,
    /// Vertical stripe
    DarkVertical,
    /// Diagonal stripe (down)
    DarkDown,
    /// Diagonal stripe (up)
    DarkUp,
    /// Grid
    DarkGrid,
    /// Trellis
    DarkTrellis,
    /// Thin horizontal stripe
    LightHorizontal,
    /// Thin vertical stripe
    LightVertical,
    /// Thin diagonal stripe (down)
    LightDown,
    /// Thin diagonal stripe (up)
    LightUp,
    /// Thin grid
    LightGrid,
    /// Thin trellis
    LightTrellis,
    /// 12.5% gray
    Gray125,
    /// 6.25% gray
    Gray0625,
}
