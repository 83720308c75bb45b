//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{BufReader, Read};

use ahash::AHashMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::attr;
use streamsheet_core::style::{
    builtin_format_code, Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle,
    FontStyle, HorizontalAlignment, NumberFormatTable, PatternType, StreamStyle, StyleRegistry,
    Underline, VerticalAlignment,
};

// === Writing ===

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    num_fmt_id: u32,
}

/// Interns style components so each distinct font, fill and border is
/// written once
struct ComponentTable<T> {
    items: Vec<T>,
    ids: AHashMap<T, u32>,
}

impl<T: Clone + Eq + std::hash::Hash> ComponentTable<T> {
    fn with(initial: impl IntoIterator<Item = T>) -> Self {
        let mut table = Self {
            items: Vec::new(),
            ids: AHashMap::new(),
        };
        for item in initial {
            table.items.push(item.clone());
            // Duplicates among the fixed entries keep their first slot
            table.ids.entry(item).or_insert(table.items.len() as u32 - 1);
        }
        table
    }

    fn intern(&mut self, item: &T) -> u32 {
        if let Some(&id) = self.ids.get(item) {
            return id;
        }
        let id = self.items.len() as u32;
        self.items.push(item.clone());
        self.ids.insert(item.clone(), id);
        id
    }
}

/// Serialize the registry and custom formats as `xl/styles.xml`.
///
/// `cellXfs` follows registry order, so the registry index of a style is
/// the `s` attribute its cells carry.
pub(crate) fn to_styles_xml(registry: &StyleRegistry, formats: &NumberFormatTable) -> String {
    let mut fonts = ComponentTable::with([FontStyle::default()]);
    // The first two fills are fixed: none and gray125
    let mut fills = ComponentTable::with([
        FillStyle::None,
        FillStyle::Pattern {
            pattern: PatternType::Gray125,
            foreground: Color::Auto,
            background: Color::Auto,
        },
    ]);
    let mut borders = ComponentTable::with([BorderStyle::default()]);

    let resolved: Vec<ResolvedXfIds> = registry
        .iter()
        .map(|(_, style)| ResolvedXfIds {
            font_id: fonts.intern(&style.font),
            fill_id: fills.intern(&style.fill),
            border_id: borders.intern(&style.border),
            num_fmt_id: style.num_fmt_id,
        })
        .collect();

    let mut xml = String::with_capacity(2048);
    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    let custom = formats.custom_formats();
    if !custom.is_empty() {
        let _ = write!(xml, "<numFmts count=\"{}\">", custom.len());
        for entry in custom {
            let _ = write!(
                xml,
                "<numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                entry.id,
                attr(&entry.code)
            );
        }
        xml.push_str("</numFmts>");
    }

    let _ = write!(xml, "<fonts count=\"{}\">", fonts.items.len());
    for font in &fonts.items {
        write_font(&mut xml, font);
    }
    xml.push_str("</fonts>");

    let _ = write!(xml, "<fills count=\"{}\">", fills.items.len());
    for fill in &fills.items {
        write_fill(&mut xml, fill);
    }
    xml.push_str("</fills>");

    let _ = write!(xml, "<borders count=\"{}\">", borders.items.len());
    for border in &borders.items {
        write_border(&mut xml, border);
    }
    xml.push_str("</borders>");

    xml.push_str(
        r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    );

    let _ = write!(xml, "<cellXfs count=\"{}\">", resolved.len());
    for ((_, style), ids) in registry.iter().zip(&resolved) {
        write_xf(&mut xml, style, *ids);
    }
    xml.push_str("</cellXfs>");

    xml.push_str(
        r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles><dxfs count="0"/><tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/></styleSheet>"#,
    );
    xml
}

fn write_color(xml: &mut String, tag: &str, color: &Color) {
    match color {
        Color::Auto => {
            let _ = write!(xml, "<{tag} indexed=\"64\"/>");
        }
        Color::Rgb { .. } | Color::Argb { .. } => {
            let hex = color.to_argb_hex().unwrap_or_default();
            let _ = write!(xml, "<{tag} rgb=\"{hex}\"/>");
        }
        Color::Indexed(i) => {
            let _ = write!(xml, "<{tag} indexed=\"{i}\"/>");
        }
        Color::Theme { index, tint } => {
            if *tint == 0 {
                let _ = write!(xml, "<{tag} theme=\"{index}\"/>");
            } else {
                let _ = write!(
                    xml,
                    "<{tag} theme=\"{index}\" tint=\"{}\"/>",
                    f64::from(*tint) / 100.0
                );
            }
        }
    }
}

fn write_font(xml: &mut String, font: &FontStyle) {
    xml.push_str("<font>");
    if font.bold {
        xml.push_str("<b/>");
    }
    if font.italic {
        xml.push_str("<i/>");
    }
    if font.strikethrough {
        xml.push_str("<strike/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => xml.push_str("<u/>"),
        Underline::Double => xml.push_str("<u val=\"double\"/>"),
        Underline::SingleAccounting => xml.push_str("<u val=\"singleAccounting\"/>"),
        Underline::DoubleAccounting => xml.push_str("<u val=\"doubleAccounting\"/>"),
    }
    let _ = write!(xml, "<sz val=\"{}\"/>", font.size);
    if !font.color.is_auto() {
        write_color(xml, "color", &font.color);
    }
    let _ = write!(xml, "<name val=\"{}\"/>", attr(&font.name));
    xml.push_str("</font>");
}

fn pattern_type_to_str(p: PatternType) -> &'static str {
    match p {
        PatternType::None => "none",
        PatternType::Solid => "solid",
        PatternType::MediumGray => "mediumGray",
        PatternType::DarkGray => "darkGray",
        PatternType::LightGray => "lightGray",
        PatternType::DarkHorizontal => "darkHorizontal",
        PatternType::DarkVertical => "darkVertical",
        PatternType::DarkDown => "darkDown",
        PatternType::DarkUp => "darkUp",
        PatternType::DarkGrid => "darkGrid",
        PatternType::DarkTrellis => "darkTrellis",
        PatternType::LightHorizontal => "lightHorizontal",
        PatternType::LightVertical => "lightVertical",
        PatternType::LightDown => "lightDown",
        PatternType::LightUp => "lightUp",
        PatternType::LightGrid => "lightGrid",
        PatternType::LightTrellis => "lightTrellis",
        PatternType::Gray125 => "gray125",
        PatternType::Gray0625 => "gray0625",
    }
}

fn str_to_pattern_type(s: &str) -> Option<PatternType> {
    let p = match s {
        "none" => PatternType::None,
        "solid" => PatternType::Solid,
        "mediumGray" => PatternType::MediumGray,
        "darkGray" => PatternType::DarkGray,
        "lightGray" => PatternType::LightGray,
        "darkHorizontal" => PatternType::DarkHorizontal,
        "darkVertical" => PatternType::DarkVertical,
        "darkDown" => PatternType::DarkDown,
        "darkUp" => PatternType::DarkUp,
        "darkGrid" => PatternType::DarkGrid,
        "darkTrellis" => PatternType::DarkTrellis,
        "lightHorizontal" => PatternType::LightHorizontal,
        "lightVertical" => PatternType::LightVertical,
        "lightDown" => PatternType::LightDown,
        "lightUp" => PatternType::LightUp,
        "lightGrid" => PatternType::LightGrid,
        "lightTrellis" => PatternType::LightTrellis,
        "gray125" => PatternType::Gray125,
        "gray0625" => PatternType::Gray0625,
        _ => return None,
    };
    Some(p)
}

fn write_fill(xml: &mut String, fill: &FillStyle) {
    match fill {
        FillStyle::None => xml.push_str("<fill><patternFill patternType=\"none\"/></fill>"),
        FillStyle::Solid { color } => {
            xml.push_str("<fill><patternFill patternType=\"solid\">");
            write_color(xml, "fgColor", color);
            xml.push_str("<bgColor indexed=\"64\"/></patternFill></fill>");
        }
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => {
            let _ = write!(
                xml,
                "<fill><patternFill patternType=\"{}\">",
                pattern_type_to_str(*pattern)
            );
            write_color(xml, "fgColor", foreground);
            write_color(xml, "bgColor", background);
            xml.push_str("</patternFill></fill>");
        }
    }
}

fn border_style_to_str(s: BorderLineStyle) -> Option<&'static str> {
    match s {
        BorderLineStyle::None => None,
        BorderLineStyle::Thin => Some("thin"),
        BorderLineStyle::Medium => Some("medium"),
        BorderLineStyle::Thick => Some("thick"),
        BorderLineStyle::Dashed => Some("dashed"),
        BorderLineStyle::Dotted => Some("dotted"),
        BorderLineStyle::Double => Some("double"),
        BorderLineStyle::Hair => Some("hair"),
    }
}

fn write_border_edge(xml: &mut String, tag: &str, edge: &Option<BorderEdge>) {
    match edge.as_ref().and_then(|e| border_style_to_str(e.style).map(|s| (s, e))) {
        None => {
            let _ = write!(xml, "<{tag}/>");
        }
        Some((style, e)) => {
            let _ = write!(xml, "<{tag} style=\"{style}\">");
            write_color(xml, "color", &e.color);
            let _ = write!(xml, "</{tag}>");
        }
    }
}

fn write_border(xml: &mut String, border: &BorderStyle) {
    xml.push_str("<border>");
    for (tag, edge) in ["left", "right", "top", "bottom"].into_iter().zip(border.edges()) {
        write_border_edge(xml, tag, edge);
    }
    xml.push_str("<diagonal/></border>");
}

fn horiz_to_str(h: HorizontalAlignment) -> &'static str {
    match h {
        HorizontalAlignment::General => "general",
        HorizontalAlignment::Left => "left",
        HorizontalAlignment::Center => "center",
        HorizontalAlignment::Right => "right",
        HorizontalAlignment::Fill => "fill",
        HorizontalAlignment::Justify => "justify",
        HorizontalAlignment::CenterContinuous => "centerContinuous",
        HorizontalAlignment::Distributed => "distributed",
    }
}

fn vert_to_str(v: VerticalAlignment) -> &'static str {
    match v {
        VerticalAlignment::Top => "top",
        VerticalAlignment::Center => "center",
        VerticalAlignment::Bottom => "bottom",
        VerticalAlignment::Justify => "justify",
        VerticalAlignment::Distributed => "distributed",
    }
}

fn write_alignment(xml: &mut String, al: &Alignment) {
    let default = Alignment::default();
    xml.push_str("<alignment");
    if al.horizontal != default.horizontal {
        let _ = write!(xml, " horizontal=\"{}\"", horiz_to_str(al.horizontal));
    }
    if al.vertical != default.vertical {
        let _ = write!(xml, " vertical=\"{}\"", vert_to_str(al.vertical));
    }
    if al.wrap_text {
        xml.push_str(" wrapText=\"1\"");
    }
    if al.shrink_to_fit {
        xml.push_str(" shrinkToFit=\"1\"");
    }
    if al.indent != 0 {
        let _ = write!(xml, " indent=\"{}\"", al.indent);
    }
    if al.rotation != 0 {
        let _ = write!(xml, " textRotation=\"{}\"", al.rotation);
    }
    xml.push_str("/>");
}

fn write_xf(xml: &mut String, style: &StreamStyle, ids: ResolvedXfIds) {
    let _ = write!(
        xml,
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"",
        ids.num_fmt_id, ids.font_id, ids.fill_id, ids.border_id
    );
    if ids.num_fmt_id != 0 {
        xml.push_str(" applyNumberFormat=\"1\"");
    }
    if style.font != FontStyle::default() {
        xml.push_str(" applyFont=\"1\"");
    }
    if !style.fill.is_none() {
        xml.push_str(" applyFill=\"1\"");
    }
    if !style.border.is_empty() {
        xml.push_str(" applyBorder=\"1\"");
    }

    if style.alignment.is_default() {
        xml.push_str("/>");
        return;
    }
    xml.push_str(" applyAlignment=\"1\">");
    write_alignment(xml, &style.alignment);
    xml.push_str("</xf>");
}

// === Reading ===

/// One `cellXfs` entry as read back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ParsedXf {
    pub num_fmt_id: u32,
    pub font_id: u32,
    pub fill_id: u32,
}

/// The parts of styles.xml the validation reader resolves cells against
#[derive(Debug, Default)]
pub(crate) struct ParsedStyles {
    pub num_fmts: HashMap<u32, String>,
    pub fonts: Vec<FontStyle>,
    pub fills: Vec<FillStyle>,
    pub cell_xfs: Vec<ParsedXf>,
}

impl ParsedStyles {
    /// The `cellXfs` entry at `index`
    pub fn xf(&self, index: u32) -> Option<&ParsedXf> {
        self.cell_xfs.get(index as usize)
    }

    /// Format code for a number format ID, custom or built-in
    pub fn format_code(&self, num_fmt_id: u32) -> Option<&str> {
        self.num_fmts
            .get(&num_fmt_id)
            .map(String::as_str)
            .or_else(|| builtin_format_code(num_fmt_id))
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> u32 {
    attr_value(e, key).and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn parse_color(e: &BytesStart<'_>) -> Color {
    if let Some(rgb) = attr_value(e, b"rgb") {
        return match Color::from_hex(&rgb) {
            // Opaque ARGB is how plain RGB is written
            Some(Color::Argb { a: 0xFF, r, g, b }) => Color::Rgb { r, g, b },
            Some(c) => c,
            None => Color::Auto,
        };
    }
    if let Some(index) = attr_value(e, b"theme").and_then(|v| v.parse().ok()) {
        let tint = attr_value(e, b"tint")
            .and_then(|v| v.parse::<f64>().ok())
            .map_or(0, |t| (t * 100.0).round() as i8);
        return Color::Theme { index, tint };
    }
    match attr_value(e, b"indexed").and_then(|v| v.parse::<u8>().ok()) {
        Some(64) | None => Color::Auto,
        Some(i) => Color::Indexed(i),
    }
}

fn parse_underline(e: &BytesStart<'_>) -> Underline {
    match attr_value(e, b"val").as_deref() {
        None | Some("single") => Underline::Single,
        Some("double") => Underline::Double,
        Some("singleAccounting") => Underline::SingleAccounting,
        Some("doubleAccounting") => Underline::DoubleAccounting,
        Some(_) => Underline::None,
    }
}

/// Apply a child element of `<font>`
fn apply_font_property(font: &mut FontStyle, e: &BytesStart<'_>) {
    // `<b val="0"/>` switches the property off
    let on = || attr_value(e, b"val").map_or(true, |v| v != "0" && v != "false");
    match e.name().as_ref() {
        b"b" => font.bold = on(),
        b"i" => font.italic = on(),
        b"strike" => font.strikethrough = on(),
        b"u" => font.underline = parse_underline(e),
        b"sz" => {
            if let Some(size) = attr_value(e, b"val").and_then(|v| v.parse().ok()) {
                font.size = size;
            }
        }
        b"name" => {
            if let Some(name) = attr_value(e, b"val") {
                font.name = name;
            }
        }
        b"color" => font.color = parse_color(e),
        _ => {}
    }
}

#[derive(Default)]
struct FillState {
    pattern: Option<PatternType>,
    foreground: Color,
    background: Color,
}

impl FillState {
    fn finish(self) -> FillStyle {
        match self.pattern {
            None | Some(PatternType::None) => FillStyle::None,
            Some(PatternType::Solid) => FillStyle::Solid {
                color: self.foreground,
            },
            Some(pattern) => FillStyle::Pattern {
                pattern,
                foreground: self.foreground,
                background: self.background,
            },
        }
    }
}

pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<ParsedStyles> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut parsed = ParsedStyles::default();

    let mut current_font: Option<FontStyle> = None;
    let mut current_fill: Option<FillState> = None;
    let mut in_cell_xfs = false;

    loop {
        let event = xml_reader.read_event_into(&mut buf);
        let (e, is_empty) = match event {
            Ok(Event::Start(e)) => (e, false),
            Ok(Event::Empty(e)) => (e, true),
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"font" => {
                        if let Some(font) = current_font.take() {
                            parsed.fonts.push(font);
                        }
                    }
                    b"fill" => {
                        if let Some(fill) = current_fill.take() {
                            parsed.fills.push(fill.finish());
                        }
                    }
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                }
                buf.clear();
                continue;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {
                buf.clear();
                continue;
            }
        };

        match e.name().as_ref() {
            b"numFmt" => {
                let id = attr_u32(&e, b"numFmtId");
                if let Some(code) = attr_value(&e, b"formatCode") {
                    parsed.num_fmts.insert(id, code);
                }
            }
            b"font" if is_empty => parsed.fonts.push(FontStyle::default()),
            b"font" => current_font = Some(FontStyle::default()),
            b"fill" if is_empty => parsed.fills.push(FillStyle::None),
            b"fill" => current_fill = Some(FillState::default()),
            b"patternFill" => {
                if let Some(fill) = current_fill.as_mut() {
                    fill.pattern = attr_value(&e, b"patternType")
                        .as_deref()
                        .and_then(str_to_pattern_type);
                }
            }
            b"fgColor" => {
                if let Some(fill) = current_fill.as_mut() {
                    fill.foreground = parse_color(&e);
                }
            }
            b"bgColor" => {
                if let Some(fill) = current_fill.as_mut() {
                    fill.background = parse_color(&e);
                }
            }
            b"cellXfs" if !is_empty => in_cell_xfs = true,
            b"xf" if in_cell_xfs => parsed.cell_xfs.push(ParsedXf {
                num_fmt_id: attr_u32(&e, b"numFmtId"),
                font_id: attr_u32(&e, b"fontId"),
                fill_id: attr_u32(&e, b"fillId"),
            }),
            _ => {
                if let Some(font) = current_font.as_mut() {
                    apply_font_property(font, &e);
                }
            }
        }
        buf.clear();
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use streamsheet_core::style::{BOLD_STRING, DEFAULT_DATE, DEFAULT_STRING};

    fn registry_with(styles: &[StreamStyle], formats: &NumberFormatTable) -> StyleRegistry {
        let mut registry = StyleRegistry::new();
        registry.register_all(styles, formats).unwrap();
        registry
    }

    #[test]
    fn test_default_styles_xml() {
        let formats = NumberFormatTable::new();
        let registry = registry_with(&StreamStyle::defaults(), &formats);
        let xml = to_styles_xml(&registry, &formats);

        assert!(xml.contains(r#"<fills count="2">"#));
        assert!(xml.contains(r#"<patternFill patternType="gray125">"#));
        assert!(xml.contains(&format!(r#"<cellXfs count="{}">"#, registry.len())));
        assert!(!xml.contains("<numFmts"));
        assert!(xml.contains(r#"<name val="Calibri"/>"#));
    }

    #[test]
    fn test_custom_number_formats_written() {
        let mut formats = NumberFormatTable::new();
        let five = formats.register("0.00000");
        let date = formats.register("dd/mm/yy");
        let quoted = formats.register("0 \"pcs\"");
        let registry = registry_with(
            &[
                StreamStyle::with_number_format(five),
                StreamStyle::with_number_format(date),
            ],
            &formats,
        );
        let xml = to_styles_xml(&registry, &formats);

        assert!(xml.contains(r#"<numFmts count="3">"#));
        assert!(xml.contains(r#"<numFmt numFmtId="164" formatCode="0.00000"/>"#));
        assert!(xml.contains(r#"<numFmt numFmtId="165" formatCode="dd/mm/yy"/>"#));
        assert!(xml.contains(&format!(
            r#"<numFmt numFmtId="{quoted}" formatCode="0 &quot;pcs&quot;"/>"#
        )));
    }

    #[test]
    fn test_roundtrip_fonts_fills_and_xfs() {
        let formats = NumberFormatTable::new();
        let green = StreamStyle::default()
            .font(FontStyle::sized(12.0, "Times New Roman"))
            .fill_color(Color::LIGHT_GREEN);
        let styles = [
            DEFAULT_STRING.clone(),
            BOLD_STRING.clone(),
            DEFAULT_DATE.clone(),
            green.clone(),
        ];
        let registry = registry_with(&styles, &formats);
        let xml = to_styles_xml(&registry, &formats);

        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed.cell_xfs.len(), registry.len());
        assert_eq!(parsed.fills.len(), 3);

        for (index, style) in registry.iter() {
            let xf = parsed.xf(index).unwrap();
            assert_eq!(xf.num_fmt_id, style.num_fmt_id);
            assert_eq!(parsed.fonts[xf.font_id as usize], style.font);
            assert_eq!(parsed.fills[xf.fill_id as usize], style.fill);
        }
        assert_eq!(parsed.format_code(14), Some("mm-dd-yy"));
    }

    #[test]
    fn test_alignment_and_border_written() {
        let formats = NumberFormatTable::new();
        let style = StreamStyle::default()
            .alignment(Alignment::new().with_horizontal(HorizontalAlignment::Center).with_wrap(true))
            .border(BorderStyle::all(BorderLineStyle::Thin, Color::BLACK));
        let registry = registry_with(&[style], &formats);
        let xml = to_styles_xml(&registry, &formats);

        assert!(xml.contains(r#"<alignment horizontal="center" wrapText="1"/>"#));
        assert!(xml.contains(r#"<left style="thin"><color rgb="FF000000"/></left>"#));
        assert!(xml.contains(r#"applyBorder="1""#));
    }
}
