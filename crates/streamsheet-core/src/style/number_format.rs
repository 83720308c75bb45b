//! Number format IDs and the custom number-format table

use ahash::AHashMap;

/// First ID handed out to custom format codes; everything below is reserved
/// for built-in formats.
pub const CUSTOM_NUM_FMT_START: u32 = 164;

/// Built-in number format IDs
pub struct NumberFormat;

impl NumberFormat {
    /// 0 - General
    pub const GENERAL: u32 = 0;
    /// 1 - 0
    pub const INTEGER: u32 = 1;
    /// 2 - 0.00
    pub const DECIMAL: u32 = 2;
    /// 3 - #,##0
    pub const THOUSANDS: u32 = 3;
    /// 4 - #,##0.00
    pub const THOUSANDS_DECIMAL: u32 = 4;
    /// 9 - 0%
    pub const PERCENT: u32 = 9;
    /// 10 - 0.00%
    pub const PERCENT_DECIMAL: u32 = 10;
    /// 11 - 0.00E+00
    pub const SCIENTIFIC: u32 = 11;
    /// 14 - mm-dd-yy
    pub const DATE_SHORT: u32 = 14;
    /// 15 - d-mmm-yy
    pub const DATE_MEDIUM: u32 = 15;
    /// 20 - h:mm
    pub const TIME_24H: u32 = 20;
    /// 21 - h:mm:ss
    pub const TIME_24H_SEC: u32 = 21;
    /// 22 - m/d/yy h:mm
    pub const DATETIME: u32 = 22;
    /// 49 - @
    pub const TEXT: u32 = 49;
}

/// Format code of a built-in number format, `None` for IDs outside the
/// reserved table.
pub fn builtin_format_code(id: u32) -> Option<&'static str> {
    let code = match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}

/// Reverse lookup of [`builtin_format_code`]
pub fn builtin_format_id(code: &str) -> Option<u32> {
    (0..CUSTOM_NUM_FMT_START).find(|&id| builtin_format_code(id) == Some(code))
}

/// Whether a format code renders numbers as a date and/or time.
///
/// Quoted literals, `[...]` sections and backslash escapes are ignored, so
/// `"0.00 \"days\""` is numeric while `[h]:mm:ss` is a time.
pub fn is_date_format_code(code: &str) -> bool {
    if code.eq_ignore_ascii_case("General") {
        return false;
    }
    // Only the positive section decides.
    let section = code.split(';').next().unwrap_or(code);

    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escaped = false;
    for c in section.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '\\' => escaped = true,
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            _ if in_brackets => {}
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }
    false
}

/// A custom number format registered on a workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormatEntry {
    /// Numeric ID referenced from styles (>= [`CUSTOM_NUM_FMT_START`])
    pub id: u32,
    /// Format code, e.g. `0.00000` or `dd/mm/yy`
    pub code: String,
}

/// Maps custom format codes to stable numeric IDs.
///
/// Identical codes always resolve to the same ID; new codes get the next ID
/// at or above [`CUSTOM_NUM_FMT_START`].
#[derive(Debug, Clone)]
pub struct NumberFormatTable {
    entries: Vec<NumberFormatEntry>,
    by_code: AHashMap<String, u32>,
    next_id: u32,
}

impl NumberFormatTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_code: AHashMap::new(),
            next_id: CUSTOM_NUM_FMT_START,
        }
    }

    /// Register a format code and return its ID.
    ///
    /// Codes matching a built-in format return the built-in ID and allocate
    /// nothing.
    pub fn register(&mut self, code: &str) -> u32 {
        if let Some(id) = builtin_format_id(code) {
            return id;
        }
        if let Some(&id) = self.by_code.get(code) {
            return id;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.by_code.insert(code.to_string(), id);
        self.entries.push(NumberFormatEntry {
            id,
            code: code.to_string(),
        });
        id
    }

    /// Whether `id` is a built-in format or was registered on this table
    pub fn contains(&self, id: u32) -> bool {
        builtin_format_code(id).is_some() || self.custom_code(id).is_some()
    }

    /// Format code for any known ID, built-in or custom
    pub fn code_for(&self, id: u32) -> Option<&str> {
        builtin_format_code(id).or_else(|| self.custom_code(id))
    }

    fn custom_code(&self, id: u32) -> Option<&str> {
        if id < CUSTOM_NUM_FMT_START {
            return None;
        }
        // IDs are allocated densely from the floor.
        self.entries
            .get((id - CUSTOM_NUM_FMT_START) as usize)
            .map(|e| e.code.as_str())
    }

    /// Custom formats in registration order
    pub fn custom_formats(&self) -> &[NumberFormatEntry] {
        &self.entries
    }

    /// Number of custom formats
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no custom format has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NumberFormatTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_custom_ids_start_at_floor() {
        let mut table = NumberFormatTable::new();
        assert_eq!(table.register("0.00000"), 164);
        assert_eq!(table.register("dd/mm/yy"), 165);
        assert_eq!(table.register("0.00000"), 164);
        assert_eq!(table.len(), 2);
        assert_eq!(table.code_for(165), Some("dd/mm/yy"));
    }

    #[test]
    fn test_builtin_codes_are_not_reallocated() {
        let mut table = NumberFormatTable::new();
        assert_eq!(table.register("General"), 0);
        assert_eq!(table.register("mm-dd-yy"), 14);
        assert!(table.is_empty());
        assert!(table.contains(14));
        assert!(!table.contains(164));
        assert!(!table.contains(5));
    }

    #[test]
    fn test_date_detection() {
        assert!(is_date_format_code("mm-dd-yy"));
        assert!(is_date_format_code("[h]:mm:ss"));
        assert!(is_date_format_code("dd/mm/yy"));
        assert!(!is_date_format_code("General"));
        assert!(!is_date_format_code("0.00000"));
        assert!(!is_date_format_code("#,##0.00;[Red](#,##0.00)"));
        assert!(!is_date_format_code("0 \"days\""));
    }

    proptest! {
        #[test]
        fn prop_distinct_codes_get_distinct_stable_ids(codes in prop::collection::vec("[a-z#0.]{1,8}", 1..20)) {
            let mut table = NumberFormatTable::new();
            let first: Vec<u32> = codes.iter().map(|c| table.register(c)).collect();
            let second: Vec<u32> = codes.iter().map(|c| table.register(c)).collect();
            prop_assert_eq!(&first, &second);

            for (i, a) in codes.iter().enumerate() {
                for (j, b) in codes.iter().enumerate() {
                    prop_assert_eq!(a == b, first[i] == first[j]);
                }
                if builtin_format_id(a).is_none() {
                    prop_assert!(first[i] >= CUSTOM_NUM_FMT_START);
                }
            }
        }
    }
}
