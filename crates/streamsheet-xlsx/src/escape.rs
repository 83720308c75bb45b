//! XML escaping for cell text and attributes
//!
//! Besides the usual entity escapes, spreadsheet text uses `_xHHHH_` for
//! characters XML 1.0 cannot carry (most C0 controls, U+FFFE, U+FFFF) and
//! for carriage returns, which XML parsers would otherwise normalize away.
//! A literal underscore that starts something shaped like `_xHHHH_` is
//! written as `_x005F_` so decoding gives back the original text.
//!
//! Attributes are not decoded by readers, so they only get entity escapes
//! and character references for whitespace.

/// Append `s` to `out` escaped for element content
pub(crate) fn escape_text(s: &str, out: &mut String) {
    escape_into(s, out, false);
}

/// Append `s` to `out` escaped for a double- or single-quoted attribute
pub(crate) fn escape_attr(s: &str, out: &mut String) {
    escape_into(s, out, true);
}

/// Append `s` to `out` with entity escapes only
///
/// For values readers take verbatim (numbers, booleans, dates, shared-string
/// indices), where a `_x005F_` guard would never be decoded.
pub(crate) fn escape_entities(s: &str, out: &mut String) {
    out.reserve(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// `s` escaped for an attribute, as a new string
pub(crate) fn attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_attr(s, &mut out);
    out
}

fn escape_into(s: &str, out: &mut String, attribute: bool) {
    out.reserve(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&apos;"),
            '\t' if attribute => out.push_str("&#9;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' if attribute => out.push_str("&#13;"),
            '_' if !attribute && looks_like_escape(&s.as_bytes()[i..]) => out.push_str("_x005F_"),
            '\t' | '\n' => out.push(c),
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => push_code(out, c as u32),
            _ => out.push(c),
        }
    }
}

fn push_code(out: &mut String, code: u32) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    out.push_str("_x");
    for shift in [12, 8, 4, 0] {
        out.push(HEX[((code >> shift) & 0xF) as usize] as char);
    }
    out.push('_');
}

/// `bytes` starts with `_xHHHH_`
fn looks_like_escape(bytes: &[u8]) -> bool {
    bytes.len() >= 7
        && bytes[0] == b'_'
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

/// Whether text needs `xml:space="preserve"` to survive a round trip
pub(crate) fn needs_preserve(s: &str) -> bool {
    let edge_ws = |c: char| c.is_whitespace();
    s.starts_with(edge_ws) || s.ends_with(edge_ws) || s.contains(|c: char| c == '\n' || c == '\t')
}

/// Decode `_xHHHH_` sequences back to the characters they stand for
///
/// Malformed sequences and codes that are not valid chars are kept as-is.
pub fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len());
    let mut last = 0;
    let mut i = 0;
    while i < bytes.len() {
        if looks_like_escape(&bytes[i..]) {
            // The 4 hex digits are ASCII, so slicing stays on char boundaries
            let decoded = u32::from_str_radix(&s[i + 2..i + 6], 16)
                .ok()
                .and_then(char::from_u32);
            if let Some(c) = decoded {
                result.push_str(&s[last..i]);
                result.push(c);
                i += 7;
                last = i;
                continue;
            }
        }
        i += 1;
    }
    result.push_str(&s[last..]);
    result
}
