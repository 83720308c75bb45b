//! Shared-string table, written once on close

use std::io::{self, Write};

use ahash::AHashMap;

use crate::escape::{escape_text, needs_preserve};

/// De-duplicated strings referenced by `t="s"` cells
#[derive(Debug, Default)]
pub(crate) struct SharedStringTable {
    strings: Vec<String>,
    index: AHashMap<String, u32>,
    /// Total references, including repeats
    count: u64,
}

impl SharedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `s`, adding it on first use
    pub fn intern(&mut self, s: &str) -> u32 {
        self.count += 1;
        if let Some(&idx) = self.index.get(s) {
            return idx;
        }
        let idx = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), idx);
        idx
    }

    /// Number of distinct strings
    pub fn unique_count(&self) -> usize {
        self.strings.len()
    }

    /// Stream `xl/sharedStrings.xml` into `out`, one `<si>` at a time
    pub fn write_xml<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(
            out,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            self.count,
            self.strings.len()
        )?;

        let mut item = String::new();
        for s in &self.strings {
            item.clear();
            item.push_str(if needs_preserve(s) {
                r#"<si><t xml:space="preserve">"#
            } else {
                "<si><t>"
            });
            escape_text(s, &mut item);
            item.push_str("</t></si>");
            out.write_all(item.as_bytes())?;
        }

        out.write_all(b"</sst>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut table = SharedStringTable::new();
        assert_eq!(table.intern("a"), 0);
        assert_eq!(table.intern("b"), 1);
        assert_eq!(table.intern("a"), 0);
        assert_eq!(table.unique_count(), 2);
    }

    #[test]
    fn test_write_xml() {
        let mut table = SharedStringTable::new();
        table.intern("x < y");
        table.intern(" padded ");
        table.intern("x < y");

        let mut out = Vec::new();
        table.write_xml(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.contains(r#"count="3" uniqueCount="2""#));
        assert!(xml.contains("<si><t>x &lt; y</t></si>"));
        assert!(xml.contains(r#"<si><t xml:space="preserve"> padded </t></si>"#));
        assert!(xml.ends_with("</sst>"));
    }
}
