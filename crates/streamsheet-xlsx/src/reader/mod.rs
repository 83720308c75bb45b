//! XLSX validation reader
//!
//! Reads a finished package back into plain values so tests and tools can
//! check what a [`StreamFile`](crate::StreamFile) produced. It understands
//! the parts the writer emits and ignores everything else.

mod format;

pub use format::{format_number, format_raw};

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use crate::styles::{read_styles_xml, ParsedStyles};
use streamsheet_core::{CellAddress, CellType, ColumnInfo, DateSystem, FillStyle, FontStyle};

/// A workbook read back from a package
#[derive(Debug, Clone)]
pub struct ReadWorkbook {
    /// Sheets in workbook order
    pub sheets: Vec<ReadSheet>,
    /// Epoch serial dates count from
    pub date_system: DateSystem,
    /// Custom number formats by ID
    pub number_formats: HashMap<u32, String>,
    /// The shared-string table, empty for inline-string workbooks
    pub shared_strings: Vec<String>,
}

impl ReadWorkbook {
    /// Look up a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&ReadSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Sheet names in order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// One sheet read back
#[derive(Debug, Clone)]
pub struct ReadSheet {
    /// Sheet name
    pub name: String,
    /// Rows in order; rows the package skipped are empty
    pub rows: Vec<Vec<ReadCell>>,
    /// `<col>` entries in order
    pub columns: Vec<ColumnInfo>,
}

impl ReadSheet {
    /// First `<col>` entry covering the 1-based column `col`
    pub fn find_column(&self, col: u16) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| (c.min..=c.max).contains(&col))
    }

    /// Every cell as it would be displayed
    pub fn formatted_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(ReadCell::formatted_value).collect())
            .collect()
    }
}

/// One cell read back, with its style resolved
#[derive(Debug, Clone)]
pub struct ReadCell {
    /// Position
    pub address: CellAddress,
    /// Stored value; shared strings are resolved and `_xHHHH_` decoded
    pub value: String,
    /// Type marker, [`CellType::Number`] when the cell had none
    pub cell_type: CellType,
    /// `cellXfs` index from the `s` attribute
    pub style: u32,
    /// Font of the cell's style
    pub font: FontStyle,
    /// Fill of the cell's style
    pub fill: FillStyle,
    /// Number format ID of the cell's style
    pub num_fmt_id: u32,
    /// Number format code of the cell's style
    pub number_format: String,
    date_system: DateSystem,
}

impl ReadCell {
    /// The value as a spreadsheet application would display it
    pub fn formatted_value(&self) -> String {
        match self.cell_type {
            CellType::Boolean => match self.value.as_str() {
                "1" => "TRUE".to_string(),
                "0" => "FALSE".to_string(),
                other => other.to_string(),
            },
            CellType::Number => format_raw(&self.value, &self.number_format, self.date_system),
            CellType::SharedString
            | CellType::InlineString
            | CellType::String
            | CellType::Error
            | CellType::Date => self.value.clone(),
        }
    }
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<ReadWorkbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<ReadWorkbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let styles = Self::read_styles(&mut archive)?;
        let (sheet_info, date_system) = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let context = SheetContext {
            shared_strings: &shared_strings,
            styles: &styles,
            date_system,
        };

        let mut sheets = Vec::with_capacity(sheet_info.len());
        for (name, r_id) in sheet_info {
            let path = sheet_paths
                .get(&r_id)
                .ok_or_else(|| XlsxError::MissingPart(format!("relationship {}", r_id)))?;
            let (rows, columns) = Self::read_worksheet(&mut archive, path, &context)?;
            sheets.push(ReadSheet {
                name,
                rows,
                columns,
            });
        }

        Ok(ReadWorkbook {
            sheets,
            date_system,
            number_formats: styles.num_fmts.clone(),
            shared_strings,
        })
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        // Leading/trailing whitespace inside <t> is data
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"t" if in_si => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => strings.push(String::new()),
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current));
                        in_si = false;
                    }
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<ParsedStyles> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(ParsedStyles::default()),
        }
    }

    /// Read workbook.xml for sheet names, their rIds and the date system
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<(String, String)>, DateSystem)> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut date_system = DateSystem::Excel1900;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        if let (Some(name), Some(r_id)) = (attr(&e, b"name"), attr(&e, b"r:id")) {
                            sheets.push((name, r_id));
                        }
                    }
                    b"workbookPr" => {
                        if matches!(attr(&e, b"date1904").as_deref(), Some("1") | Some("true")) {
                            date_system = DateSystem::Excel1904;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date_system))
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr(&e, b"Id");
                    let target = attr(&e, b"Target");
                    let rel_type = attr(&e, b"Type");

                    // Only worksheet relationships matter here
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the rows and columns of one worksheet
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        context: &SheetContext<'_>,
    ) -> XlsxResult<(Vec<Vec<ReadCell>>, Vec<ColumnInfo>)> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        // Cell text is data; whitespace between elements is skipped below
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut rows: Vec<Vec<ReadCell>> = Vec::new();
        let mut columns = Vec::new();

        let mut current_row: Option<Vec<ReadCell>> = None;
        let mut current_cell: Option<PendingCell> = None;
        let mut in_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        let index = row_index(&e, rows.len());
                        pad_rows(&mut rows, index);
                        current_row = Some(Vec::new());
                    }
                    b"c" => {
                        let next_col = current_row.as_ref().map_or(0, Vec::len);
                        current_cell = Some(PendingCell::start(&e, rows.len(), next_col)?);
                    }
                    b"v" | b"t" if current_cell.is_some() => in_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"col" => columns.push(parse_col(&e)),
                    b"row" => {
                        let index = row_index(&e, rows.len());
                        pad_rows(&mut rows, index);
                        rows.push(Vec::new());
                    }
                    b"c" => {
                        if let Some(row) = current_row.as_mut() {
                            let pending = PendingCell::start(&e, rows.len(), row.len())?;
                            row.push(pending.finish(context));
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_text => {
                    if let Some(cell) = current_cell.as_mut() {
                        cell.text.push_str(&e.unescape()?);
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"v" | b"t" => in_text = false,
                    b"c" => {
                        if let (Some(pending), Some(row)) = (current_cell.take(), current_row.as_mut())
                        {
                            row.push(pending.finish(context));
                        }
                    }
                    b"row" => {
                        if let Some(row) = current_row.take() {
                            rows.push(row);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((rows, columns))
    }
}

/// Workbook-wide lookups shared by every sheet
struct SheetContext<'a> {
    shared_strings: &'a [String],
    styles: &'a ParsedStyles,
    date_system: DateSystem,
}

/// A `<c>` whose content is still being read
struct PendingCell {
    address: CellAddress,
    cell_type: CellType,
    style: u32,
    text: String,
}

impl PendingCell {
    fn start(e: &BytesStart<'_>, row: usize, next_col: usize) -> XlsxResult<Self> {
        let address = match attr(e, b"r") {
            Some(r) => CellAddress::parse(&r)?,
            None => CellAddress::new(row as u32, next_col as u16),
        };
        let cell_type = match attr(e, b"t") {
            Some(t) => CellType::from_marker(&t)
                .ok_or_else(|| XlsxError::Parse(format!("unknown cell type '{}'", t)))?,
            None => CellType::Number,
        };
        let style = attr(e, b"s").and_then(|s| s.parse().ok()).unwrap_or(0);
        Ok(Self {
            address,
            cell_type,
            style,
            text: String::new(),
        })
    }

    fn finish(self, context: &SheetContext<'_>) -> ReadCell {
        let value = match self.cell_type {
            CellType::SharedString => self
                .text
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| context.shared_strings.get(i))
                .cloned()
                .unwrap_or_default(),
            CellType::InlineString | CellType::String | CellType::Error => {
                decode_excel_escapes(&self.text)
            }
            CellType::Number | CellType::Boolean | CellType::Date => self.text,
        };

        let xf = context.styles.xf(self.style).copied().unwrap_or_default();
        let font = context
            .styles
            .fonts
            .get(xf.font_id as usize)
            .cloned()
            .unwrap_or_default();
        let fill = context
            .styles
            .fills
            .get(xf.fill_id as usize)
            .cloned()
            .unwrap_or_default();
        let number_format = context
            .styles
            .format_code(xf.num_fmt_id)
            .unwrap_or("General")
            .to_string();

        ReadCell {
            address: self.address,
            value,
            cell_type: self.cell_type,
            style: self.style,
            font,
            fill,
            num_fmt_id: xf.num_fmt_id,
            number_format,
            date_system: context.date_system,
        }
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// 0-based index from a row's `r` attribute
fn row_index(e: &BytesStart<'_>, fallback: usize) -> usize {
    attr(e, b"r")
        .and_then(|r| r.parse::<usize>().ok())
        .map_or(fallback, |r| r.saturating_sub(1))
}

/// Fill skipped rows so `rows.len() == index`
fn pad_rows(rows: &mut Vec<Vec<ReadCell>>, index: usize) {
    while rows.len() < index {
        rows.push(Vec::new());
    }
}

fn parse_col(e: &BytesStart<'_>) -> ColumnInfo {
    let number = |key: &[u8]| attr(e, key).and_then(|v| v.parse::<u16>().ok());
    let min = number(b"min").unwrap_or(1);
    ColumnInfo {
        min,
        max: number(b"max").unwrap_or(min),
        width: attr(e, b"width").and_then(|v| v.parse().ok()),
        style: attr(e, b"style").and_then(|v| v.parse().ok()),
    }
}
