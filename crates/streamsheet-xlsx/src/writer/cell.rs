//! Cell and row encoding
//!
//! Encoding cannot fail: everything that can go wrong with a row (unknown
//! style, non-finite number, wrong width) is checked before the first cell
//! is encoded, so a rejected row leaves no trace in the sheet or in the
//! shared-string table.

use std::fmt::Write as _;

use streamsheet_core::{
    CellAddress, CellType, CellValue, DateSystem, Error, Result, StreamCell, StringEncoding,
};

use super::shared_strings::SharedStringTable;
use crate::escape::{escape_entities, escape_text, needs_preserve};

/// Workbook state the encoder needs
pub(crate) struct EncodeContext<'a> {
    pub shared: &'a mut SharedStringTable,
    pub encoding: StringEncoding,
    pub date_system: DateSystem,
}

/// Reject values that cannot be represented
pub(crate) fn validate_value(value: &CellValue) -> Result<()> {
    match value {
        CellValue::Float(n) if !n.is_finite() => Err(Error::InvalidNumber(*n)),
        _ => Ok(()),
    }
}

/// Append `<row>` for 0-based `row` to `out`
///
/// `styles[i]` is the resolved style index of `cells[i]`.
pub(crate) fn encode_row(
    out: &mut String,
    row: u32,
    cells: &[StreamCell<'_>],
    styles: &[u32],
    ctx: &mut EncodeContext<'_>,
) {
    if cells.is_empty() {
        let _ = write!(out, "<row r=\"{}\"/>", row + 1);
        return;
    }

    let _ = write!(out, "<row r=\"{}\">", row + 1);
    for (col, (cell, &style)) in cells.iter().zip(styles).enumerate() {
        // Row width is checked against MAX_COLS before encoding
        encode_cell(out, CellAddress::new(row, col as u16), style, &cell.value, ctx);
    }
    out.push_str("</row>");
}

fn open_cell(out: &mut String, address: CellAddress, style: u32, cell_type: Option<CellType>) {
    out.push_str("<c r=\"");
    address.write_a1(out);
    let _ = write!(out, "\" s=\"{}\"", style);
    if let Some(t) = cell_type {
        let _ = write!(out, " t=\"{}\"", t.marker());
    }
    out.push('>');
}

fn push_value(out: &mut String, text: &str) {
    out.push_str("<v>");
    escape_text(text, out);
    out.push_str("</v>");
}

fn push_raw_value(out: &mut String, text: &str) {
    out.push_str("<v>");
    escape_entities(text, out);
    out.push_str("</v>");
}

fn push_inline(out: &mut String, text: &str) {
    out.push_str(if needs_preserve(text) {
        r#"<is><t xml:space="preserve">"#
    } else {
        "<is><t>"
    });
    escape_text(text, out);
    out.push_str("</t></is>");
}

/// Append one `<c>` element
pub(crate) fn encode_cell(
    out: &mut String,
    address: CellAddress,
    style: u32,
    value: &CellValue,
    ctx: &mut EncodeContext<'_>,
) {
    match value {
        CellValue::String(s) => match ctx.encoding {
            StringEncoding::SharedStrings => {
                let index = ctx.shared.intern(s);
                open_cell(out, address, style, Some(CellType::SharedString));
                let _ = write!(out, "<v>{}</v>", index);
            }
            StringEncoding::InlineStrings => {
                open_cell(out, address, style, Some(CellType::InlineString));
                push_inline(out, s);
            }
        },
        CellValue::InlineString(s) => {
            open_cell(out, address, style, Some(CellType::InlineString));
            push_inline(out, s);
        }
        CellValue::Integer(n) => {
            open_cell(out, address, style, None);
            let _ = write!(out, "<v>{}</v>", n);
        }
        CellValue::Float(n) => {
            open_cell(out, address, style, None);
            let _ = write!(out, "<v>{}</v>", n);
        }
        CellValue::Boolean(b) => {
            open_cell(out, address, style, Some(CellType::Boolean));
            out.push_str(if *b { "<v>1</v>" } else { "<v>0</v>" });
        }
        CellValue::Date(dt) => {
            open_cell(out, address, style, None);
            let _ = write!(out, "<v>{}</v>", ctx.date_system.to_serial(*dt));
        }
        CellValue::Error(text) => {
            open_cell(out, address, style, Some(CellType::Error));
            push_value(out, text);
        }
        CellValue::Typed { cell_type, text } => {
            open_cell(out, address, style, Some(*cell_type));
            match cell_type {
                CellType::InlineString => push_inline(out, text),
                CellType::String | CellType::Error => push_value(out, text),
                CellType::Number | CellType::Boolean | CellType::Date | CellType::SharedString => {
                    push_raw_value(out, text)
                }
            }
        }
    }
    out.push_str("</c>");
}
