//! Style registry for deduplication

use super::{NumberFormatTable, StreamStyle};
use crate::error::{Error, Result};
use ahash::AHashMap;

/// Registry assigning every distinct style a stable index
///
/// The index is the style's position in the workbook's `cellXfs` table and
/// is written on every cell as `s="<index>"`. Index 0 always holds the plain
/// default style, but it only counts as *added* once the caller registers a
/// descriptor equal to it.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    /// All unique styles (index 0 is default)
    styles: Vec<StreamStyle>,
    /// Fast lookup for deduplication
    index_map: AHashMap<StreamStyle, u32>,
    default_added: bool,
}

impl StyleRegistry {
    /// Create a new registry with the default style at index 0
    pub fn new() -> Self {
        let mut registry = Self {
            styles: Vec::with_capacity(16),
            index_map: AHashMap::with_capacity(16),
            default_added: false,
        };

        let default = StreamStyle::default();
        registry.index_map.insert(default.clone(), 0);
        registry.styles.push(default);

        registry
    }

    /// Register a batch of styles.
    ///
    /// Every number-format ID is checked against `formats` first; on an
    /// unknown ID nothing is registered. New descriptors get the next index in
    /// submission order, equal descriptors keep the index they already have.
    pub fn register_all(&mut self, styles: &[StreamStyle], formats: &NumberFormatTable) -> Result<()> {
        if let Some(style) = styles.iter().find(|s| !formats.contains(s.num_fmt_id)) {
            return Err(Error::UnknownNumberFormat(style.num_fmt_id));
        }

        for style in styles {
            self.insert(style);
        }
        Ok(())
    }

    fn insert(&mut self, style: &StreamStyle) -> u32 {
        if let Some(&idx) = self.index_map.get(style) {
            if idx == 0 {
                self.default_added = true;
            }
            return idx;
        }

        let idx = self.styles.len() as u32;
        self.index_map.insert(style.clone(), idx);
        self.styles.push(style.clone());
        idx
    }

    /// Index of a style the caller has registered
    pub fn index_of(&self, style: &StreamStyle) -> Option<u32> {
        match self.index_map.get(style) {
            Some(0) if !self.default_added => None,
            other => other.copied(),
        }
    }

    /// Index of a registered style, or [`Error::StyleNotAdded`]
    pub fn require(&self, style: &StreamStyle) -> Result<u32> {
        self.index_of(style).ok_or(Error::StyleNotAdded)
    }

    /// Get a style by index
    pub fn get(&self, index: u32) -> Option<&StreamStyle> {
        self.styles.get(index as usize)
    }

    /// Number of entries, including the default at index 0
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if only the default style is present
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Iterate over all styles with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &StreamStyle)> {
        self.styles.iter().enumerate().map(|(i, s)| (i as u32, s))
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
