//! Cell borders, one `<border>` entry each in `styles.xml`

use super::Color;

/// The four edges of a cell; a missing edge is written as an empty element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

impl BorderStyle {
    /// The same line on every edge
    pub fn all(style: BorderLineStyle, color: Color) -> Self {
        let edge = Some(BorderEdge { style, color });
        Self {
            left: edge.clone(),
            right: edge.clone(),
            top: edge.clone(),
            bottom: edge,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges().iter().all(|e| e.is_none())
    }

    /// Edges in `styles.xml` order: left, right, top, bottom
    pub fn edges(&self) -> [&Option<BorderEdge>; 4] {
        [&self.left, &self.right, &self.top, &self.bottom]
    }
}

/// One drawn edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

/// `style` attribute values of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_edges() {
        let boxed = BorderStyle::all(BorderLineStyle::Thin, Color::BLACK);
        assert!(!boxed.is_empty());
        assert!(boxed.edges().iter().all(|e| e.as_ref().map(|e| e.style) == Some(BorderLineStyle::Thin)));
        assert!(BorderStyle::default().is_empty());
    }
}
