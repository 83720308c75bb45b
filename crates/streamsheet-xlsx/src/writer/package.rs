//! Package parts that do not depend on row data
//!
//! All of these are written by `build`, before the first sheet is opened.

use std::fmt::Write as _;
use std::io::{Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::XlsxResult;
use crate::escape::attr;
use crate::styles::to_styles_xml;
use streamsheet_core::{StringEncoding, WorkbookDraft};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
"#;

pub(crate) const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Options for every part in the container
pub(crate) fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Zip path of the sheet at `index`
pub(crate) fn sheet_part_name(index: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", index + 1)
}

fn uses_shared_strings(draft: &WorkbookDraft) -> bool {
    draft.settings().string_encoding == StringEncoding::SharedStrings
}

fn write_part<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, content: &str) -> XlsxResult<()> {
    zip.start_file(name, part_options())?;
    zip.write_all(content.as_bytes())?;
    log::trace!("wrote {} ({} bytes)", name, content.len());
    Ok(())
}

/// Write every static part in package order
pub(crate) fn write_static_parts<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    draft: &WorkbookDraft,
) -> XlsxResult<()> {
    write_part(zip, "[Content_Types].xml", &content_types_xml(draft))?;
    write_part(zip, "_rels/.rels", ROOT_RELS_XML)?;
    write_part(zip, "docProps/app.xml", &app_xml(draft))?;
    write_part(zip, "docProps/core.xml", &core_xml(chrono::Utc::now()))?;
    write_part(zip, "xl/workbook.xml", &workbook_xml(draft))?;
    write_part(zip, "xl/_rels/workbook.xml.rels", &workbook_rels_xml(draft))?;
    write_part(zip, "xl/styles.xml", &to_styles_xml(draft.styles(), draft.formats()))?;
    Ok(())
}

fn content_types_xml(draft: &WorkbookDraft) -> String {
    let mut content = String::from(XML_DECLARATION);
    content.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
    );

    for i in 0..draft.sheet_count() {
        let _ = write!(
            content,
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            sheet_part_name(i)
        );
    }

    if uses_shared_strings(draft) {
        let _ = write!(
            content,
            r#"<Override PartName="/{SHARED_STRINGS_PART}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#
        );
    }

    content.push_str("</Types>");
    content
}

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

fn app_xml(draft: &WorkbookDraft) -> String {
    let mut content = String::from(XML_DECLARATION);
    content.push_str(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>streamsheet</Application>"#,
    );
    let _ = write!(
        content,
        r#"<HeadingPairs><vt:vector size="2" baseType="variant"><vt:variant><vt:lpstr>Worksheets</vt:lpstr></vt:variant><vt:variant><vt:i4>{}</vt:i4></vt:variant></vt:vector></HeadingPairs>"#,
        draft.sheet_count()
    );
    let _ = write!(
        content,
        r#"<TitlesOfParts><vt:vector size="{}" baseType="lpstr">"#,
        draft.sheet_count()
    );
    for sheet in draft.sheets() {
        let _ = write!(content, "<vt:lpstr>{}</vt:lpstr>", attr(sheet.name()));
    }
    content.push_str("</vt:vector></TitlesOfParts></Properties>");
    content
}

fn core_xml(created: chrono::DateTime<chrono::Utc>) -> String {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"{XML_DECLARATION}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:creator>streamsheet</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified></cp:coreProperties>"#
    )
}

fn workbook_xml(draft: &WorkbookDraft) -> String {
    let mut content = String::from(XML_DECLARATION);
    content.push_str(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    if draft.settings().date_system.is_1904() {
        content.push_str(r#"<workbookPr date1904="1"/>"#);
    }
    content.push_str(r#"<bookViews><workbookView activeTab="0"/></bookViews><sheets>"#);

    for (i, sheet) in draft.sheets().iter().enumerate() {
        let _ = write!(
            content,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            attr(sheet.name()),
            i + 1,
            i + 1
        );
    }

    content.push_str("</sheets></workbook>");
    content
}

fn workbook_rels_xml(draft: &WorkbookDraft) -> String {
    let mut content = String::from(XML_DECLARATION);
    content.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    let count = draft.sheet_count();
    for i in 0..count {
        let _ = write!(
            content,
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        );
    }

    let _ = write!(
        content,
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        count + 1
    );
    if uses_shared_strings(draft) {
        let _ = write!(
            content,
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            count + 2
        );
    }

    content.push_str("</Relationships>");
    content
}
