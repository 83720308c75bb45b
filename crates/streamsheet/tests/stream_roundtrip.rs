//! End-to-end tests for streamed workbooks (build -> write rows -> close -> read back)

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use streamsheet::prelude::*;
use streamsheet::{CellAddress, ReadSheet};

type Builder = StreamFileBuilder<Cursor<Vec<u8>>>;

fn builder() -> Builder {
    let mut builder = StreamFileBuilder::new(Cursor::new(Vec::<u8>::new()));
    builder.add_style_list(&StreamStyle::defaults()).unwrap();
    builder
}

fn finish(file: StreamFile<Cursor<Vec<u8>>>) -> ReadWorkbook {
    let (_, cursor) = file.close_into_inner().unwrap();
    XlsxReader::read(Cursor::new(cursor.into_inner())).unwrap()
}

fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// One sheet with a header row and a data row of mixed types
#[test]
fn test_header_and_data_row() {
    let mut b = builder();
    b.add_sheet("Sheet1", &vec![DEFAULT_STRING.clone(); 4]).unwrap();

    let mut file = b.build().unwrap();
    file.write_strings(&["Token", "Name", "Price", "SKU"]).unwrap();
    file.write_row(&[
        StreamCell::integer(123),
        StreamCell::string("Taco"),
        StreamCell::integer(300),
        StreamCell::integer(600),
    ])
    .unwrap();

    let wb = finish(file);
    assert_eq!(wb.sheet_names(), vec!["Sheet1"]);
    let sheet = &wb.sheets[0];
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(
        sheet.formatted_rows(),
        strings(&[&["Token", "Name", "Price", "SKU"], &["123", "Taco", "300", "600"]])
    );
}

#[test]
fn test_one_column() {
    let mut b = builder();
    b.add_sheet("Sheet1", &[DEFAULT_STRING.clone()]).unwrap();

    let mut file = b.build().unwrap();
    file.write_all(vec![
        vec![StreamCell::string("Token")],
        vec![StreamCell::integer(123)],
    ])
    .unwrap();

    let wb = finish(file);
    assert_eq!(
        wb.sheets[0].formatted_rows(),
        strings(&[&["Token"], &["123"]])
    );
}

/// Each sheet has its own row width
#[test]
fn test_several_sheets_with_different_widths() {
    let mut b = builder();
    b.add_sheet("Sheet 1", &[]).unwrap();
    b.add_sheet("Sheet 2", &[]).unwrap();
    b.add_sheet("Sheet 3", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_strings(&["Token", "Name", "Price", "SKU"]).unwrap();
    file.write_strings(&["123", "Taco", "300", "0000000123"]).unwrap();
    file.next_sheet().unwrap();
    file.write_strings(&["Token", "Price"]).unwrap();
    file.write_strings(&["456", "500"]).unwrap();
    file.write_strings(&["789", "600"]).unwrap();
    file.next_sheet().unwrap();
    assert_eq!(file.current_sheet_name(), "Sheet 3");
    file.write_strings(&["Token", "Name", "Price", "SKU", "Stock"]).unwrap();

    let (summary, cursor) = file.close_into_inner().unwrap();
    assert_eq!(summary.total_rows(), 6);
    assert_eq!(summary.sheets[0].dimension, "A1:D2");
    assert_eq!(summary.sheets[1].dimension, "A1:B3");
    assert_eq!(summary.sheets[2].dimension, "A1:E1");

    let wb = XlsxReader::read(Cursor::new(cursor.into_inner())).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Sheet 1", "Sheet 2", "Sheet 3"]);
    assert_eq!(
        wb.sheet("Sheet 1").unwrap().formatted_rows(),
        strings(&[&["Token", "Name", "Price", "SKU"], &["123", "Taco", "300", "0000000123"]])
    );
    assert_eq!(
        wb.sheet("Sheet 2").unwrap().formatted_rows(),
        strings(&[&["Token", "Price"], &["456", "500"], &["789", "600"]])
    );
    assert_eq!(wb.sheet("Sheet 3").unwrap().rows[0].len(), 5);
}

const AWKWARD_STRINGS: &[&str] = &[
    "Hello, 世界",
    "emoji \u{1F600}\u{1F44B}",
    "</c></row></sheetData>",
    "<v>1</v>",
    "Special: <>&\"'",
    "  padded  ",
    "tab\there",
    "Multi\nLine",
    "windows\r\nline",
    "bell\u{7}and\u{1}nul\u{0}",
    "_x0041_ is not A",
    "under_score",
    "",
];

fn check_awkward_strings(encoding: StringEncoding) {
    let mut b = builder();
    b.string_encoding(encoding);
    b.add_sheet("Strings", &[]).unwrap();

    let mut file = b.build().unwrap();
    for s in AWKWARD_STRINGS {
        file.write_strings(&[*s]).unwrap();
    }

    let wb = finish(file);
    let read: Vec<String> = wb.sheets[0]
        .formatted_rows()
        .into_iter()
        .map(|mut row| row.remove(0))
        .collect();
    assert_eq!(read, AWKWARD_STRINGS);
}

#[test]
fn test_awkward_strings_shared() {
    check_awkward_strings(StringEncoding::SharedStrings);
}

#[test]
fn test_awkward_strings_inline() {
    check_awkward_strings(StringEncoding::InlineStrings);
}

#[test]
fn test_shared_strings_are_deduplicated() {
    let mut b = builder();
    b.add_sheet("A", &[]).unwrap();
    b.add_sheet("B", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_strings(&["x", "y", "x"]).unwrap();
    file.next_sheet().unwrap();
    file.write_strings(&["y"]).unwrap();

    let (summary, cursor) = file.close_into_inner().unwrap();
    assert_eq!(summary.shared_strings, 2);
    let wb = XlsxReader::read(Cursor::new(cursor.into_inner())).unwrap();
    assert_eq!(wb.shared_strings, vec!["x", "y"]);
    assert_eq!(wb.sheet("B").unwrap().rows[0][0].value, "y");
}

#[test]
fn test_inline_workbook_has_no_shared_strings_part() {
    let mut b = builder();
    b.string_encoding(StringEncoding::InlineStrings);
    b.add_sheet("Sheet1", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_strings(&["a", "b"]).unwrap();

    let (summary, cursor) = file.close_into_inner().unwrap();
    assert_eq!(summary.shared_strings, 0);
    let bytes = cursor.into_inner();

    let archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
    assert!(archive.file_names().all(|n| n != "xl/sharedStrings.xml"));

    let wb = XlsxReader::read(Cursor::new(bytes)).unwrap();
    assert_eq!(wb.sheets[0].rows[0][1].cell_type, CellType::InlineString);
    assert!(wb.shared_strings.is_empty());
}

#[test]
fn test_numbers_and_booleans() {
    let mut b = builder();
    b.add_sheet("Sheet1", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_row(&[
        StreamCell::integer(-42),
        StreamCell::float(3.14159),
        StreamCell::boolean(true),
        StreamCell::boolean(false),
        StreamCell::new(1234567, &DEFAULT_STRING),
    ])
    .unwrap();

    let wb = finish(file);
    let row = &wb.sheets[0].rows[0];
    assert_eq!(row[0].value, "-42");
    assert_eq!(row[1].value, "3.14159");
    // DEFAULT_DECIMAL shows two places
    assert_eq!(row[1].formatted_value(), "3.14");
    assert_eq!(row[2].formatted_value(), "TRUE");
    assert_eq!(row[3].formatted_value(), "FALSE");
    assert_eq!(row[4].formatted_value(), "1234567");
}

#[test]
fn test_dates() {
    let mut b = builder();
    b.add_sheet("Dates", &[]).unwrap();

    let when = date(2009, 11, 10);
    let mut file = b.build().unwrap();
    file.write_row(&[
        StreamCell::date(when),
        StreamCell::new(when, &DEFAULT_DATETIME),
        StreamCell::date(date(1900, 1, 1)),
    ])
    .unwrap();

    let wb = finish(file);
    let row = &wb.sheets[0].rows[0];
    assert_eq!(row[0].value, "40127");
    assert_eq!(row[0].number_format, "mm-dd-yy");
    assert_eq!(row[0].formatted_value(), "11-10-09");
    assert_eq!(row[1].formatted_value(), "11/10/09 0:00");
    assert_eq!(row[2].value, "1");
    assert_eq!(row[2].formatted_value(), "01-01-00");
}

#[test]
fn test_dates_1904() {
    let mut b = builder();
    b.date_system(DateSystem::Excel1904);
    b.add_sheet("Dates", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_row(&[StreamCell::date(date(2009, 11, 10))]).unwrap();

    let wb = finish(file);
    assert_eq!(wb.date_system, DateSystem::Excel1904);
    let cell = &wb.sheets[0].rows[0][0];
    assert_eq!(cell.value, "38665");
    assert_eq!(cell.formatted_value(), "11-10-09");
}

/// Typed content for verbatim markers comes back exactly as written
#[test]
fn test_typed_underscore_text_is_verbatim() {
    let mut b = builder();
    b.add_sheet("Typed", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_row(&[
        StreamCell::typed("_x0041_", CellType::Date, &DEFAULT_STRING),
        StreamCell::typed("_x0041_", CellType::String, &DEFAULT_STRING),
    ])
    .unwrap();

    let wb = finish(file);
    let row = &wb.sheets[0].rows[0];
    assert_eq!(row[0].value, "_x0041_");
    assert_eq!(row[1].value, "_x0041_");
}

#[test]
fn test_typed_cells() {
    let mut b = builder();
    b.add_sheet("Typed", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_row(&[
        StreamCell::typed("1", CellType::Boolean, &DEFAULT_BOOLEAN),
        StreamCell::typed("98", CellType::Number, &DEFAULT_INTEGER),
        StreamCell::typed("raw & text", CellType::String, &DEFAULT_STRING),
        StreamCell::error("#N/A"),
        StreamCell::inline("inline"),
    ])
    .unwrap();

    let wb = finish(file);
    let row = &wb.sheets[0].rows[0];
    let types: Vec<CellType> = row.iter().map(|c| c.cell_type).collect();
    assert_eq!(
        types,
        vec![
            CellType::Boolean,
            CellType::Number,
            CellType::String,
            CellType::Error,
            CellType::InlineString
        ]
    );
    assert_eq!(
        row.iter().map(|c| c.formatted_value()).collect::<Vec<_>>(),
        vec!["TRUE", "98", "raw & text", "#N/A", "inline"]
    );
}

#[test]
fn test_sheets_without_rows() {
    let mut b = builder();
    b.add_sheet("First", &[]).unwrap();
    b.add_sheet("Second", &[DEFAULT_STRING.clone()]).unwrap();
    b.add_sheet("Third", &[]).unwrap();

    let file = b.build().unwrap();
    let (summary, cursor) = file.close_into_inner().unwrap();
    assert_eq!(summary.sheets.len(), 3);
    assert!(summary.sheets.iter().all(|s| s.rows == 0 && s.dimension == "A1"));

    let wb = XlsxReader::read(Cursor::new(cursor.into_inner())).unwrap();
    assert_eq!(wb.sheet_names(), vec!["First", "Second", "Third"]);
    assert!(wb.sheets.iter().all(|s| s.rows.is_empty()));
}

#[test]
fn test_rows_on_last_sheet_only() {
    let mut b = builder();
    b.add_sheet("Skipped", &[]).unwrap();
    b.add_sheet("Used", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.next_sheet().unwrap();
    file.write_strings(&["only"]).unwrap();

    let wb = finish(file);
    assert!(wb.sheet("Skipped").unwrap().rows.is_empty());
    assert_eq!(wb.sheet("Used").unwrap().rows[0][0].value, "only");
}

#[test]
fn test_empty_rows_keep_their_place() {
    let mut b = builder();
    b.add_sheet("Sheet1", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_row(&[]).unwrap();
    file.write_row(&[]).unwrap();

    let wb = finish(file);
    assert_eq!(wb.sheets[0].rows.len(), 2);
}

/// Widths 20 for column 1 and 30.23 for columns 2 to 4
#[test]
fn test_column_widths() {
    let mut b = builder();
    b.add_sheet("Sheet1", &[DEFAULT_STRING.clone()]).unwrap();
    b.set_column_width(0, 1, 1, 20.0).unwrap();
    b.set_column_width(0, 2, 4, 30.23).unwrap();

    let mut file = b.build().unwrap();
    file.write_strings(&["a", "b", "c", "d", "e"]).unwrap();

    let wb = finish(file);
    let sheet: &ReadSheet = &wb.sheets[0];
    assert_eq!(sheet.find_column(1).and_then(|c| c.width), Some(20.0));
    for col in 2..=4 {
        let range = sheet.find_column(col).unwrap();
        assert_eq!(range.width, Some(30.23));
        assert_eq!((range.min, range.max), (2, 4));
    }
    assert!(sheet.find_column(5).is_none());
}

/// Column default styles inside a width range do not split it
#[test]
fn test_width_range_survives_mixed_column_styles() {
    let mut b = builder();
    b.add_sheet(
        "Sheet1",
        &[
            DEFAULT_STRING.clone(),
            BOLD_STRING.clone(),
            DEFAULT_STRING.clone(),
            BOLD_STRING.clone(),
        ],
    )
    .unwrap();
    b.set_column_width(0, 2, 4, 30.23).unwrap();

    let mut file = b.build().unwrap();
    file.write_strings(&["a", "b", "c", "d"]).unwrap();

    let wb = finish(file);
    let sheet = &wb.sheets[0];
    for col in 2..=4 {
        let range = sheet.find_column(col).unwrap();
        assert_eq!((range.min, range.max), (2, 4));
        assert_eq!(range.width, Some(30.23));
    }
    let first = sheet.find_column(1).unwrap();
    assert_eq!((first.min, first.max), (1, 1));
    assert_eq!(first.width, Some(streamsheet::DEFAULT_COLUMN_WIDTH));
    assert!(first.style.is_some());
}

/// Adjacent ranges with the same width keep their own bounds
#[test]
fn test_adjacent_width_ranges_stay_apart() {
    let mut b = builder();
    b.add_sheet("Sheet1", &[]).unwrap();
    b.set_column_width(0, 1, 1, 30.23).unwrap();
    b.set_column_width(0, 2, 4, 30.23).unwrap();

    let mut file = b.build().unwrap();
    file.write_strings(&["a", "b", "c", "d"]).unwrap();

    let wb = finish(file);
    let sheet = &wb.sheets[0];
    let first = sheet.find_column(1).unwrap();
    assert_eq!((first.min, first.max), (1, 1));
    for col in 2..=4 {
        let range = sheet.find_column(col).unwrap();
        assert_eq!((range.min, range.max), (2, 4));
    }
}

#[test]
fn test_first_width_range_wins() {
    let mut b = builder();
    b.add_sheet("Sheet1", &[]).unwrap();
    b.set_column_width(0, 1, 3, 12.0).unwrap();
    b.set_column_width(0, 2, 2, 40.0).unwrap();

    let wb = finish(b.build().unwrap());
    let sheet = &wb.sheets[0];
    assert_eq!(sheet.find_column(2).and_then(|c| c.width), Some(12.0));
    assert_eq!(sheet.find_column(3).and_then(|c| c.width), Some(12.0));
}

#[test]
fn test_custom_number_formats() {
    let mut b = StreamFileBuilder::new(Cursor::new(Vec::<u8>::new()));
    let five_places = b.add_number_format("0.00000");
    let iso_date = b.add_number_format("yyyy-mm-dd");
    assert_eq!((five_places, iso_date), (164, 165));
    assert_eq!(b.add_number_format("0.00000"), 164);

    let precise = StreamStyle::with_number_format(five_places);
    let iso = StreamStyle::with_number_format(iso_date);
    b.add_style_list(&[precise.clone(), iso.clone()]).unwrap();
    b.add_sheet("Formats", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_row(&[
        StreamCell::new(1.5, &precise),
        StreamCell::new(date(2021, 3, 4), &iso),
    ])
    .unwrap();

    let wb = finish(file);
    assert_eq!(wb.number_formats.get(&164).map(String::as_str), Some("0.00000"));
    assert_eq!(wb.number_formats.get(&165).map(String::as_str), Some("yyyy-mm-dd"));
    let row = &wb.sheets[0].rows[0];
    assert_eq!(row[0].num_fmt_id, 164);
    assert_eq!(row[0].formatted_value(), "1.50000");
    assert_eq!(row[1].formatted_value(), "2021-03-04");
}

#[test]
fn test_cell_addresses() {
    let mut b = builder();
    b.add_sheet("Sheet1", &[]).unwrap();

    let mut file = b.build().unwrap();
    file.write_strings(&["a", "b"]).unwrap();
    file.write_strings(&["c", "d"]).unwrap();

    let wb = finish(file);
    assert_eq!(wb.sheets[0].rows[1][1].address, CellAddress::new(1, 1));
}

#[test]
fn test_create_and_open_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("streamed.xlsx");

    let mut b = streamsheet::create(&path).unwrap();
    b.add_style_list(&StreamStyle::defaults()).unwrap();
    b.add_sheet("On disk", &[]).unwrap();
    let mut file = b.build().unwrap();
    for i in 0..1000 {
        file.write_row(&[StreamCell::integer(i), StreamCell::string(format!("row {}", i))])
            .unwrap();
    }
    let summary = file.close().unwrap();
    assert_eq!(summary.sheets[0].dimension, "A1:B1000");

    let wb = streamsheet::open(&path).unwrap();
    let sheet = wb.sheet("On disk").unwrap();
    assert_eq!(sheet.rows.len(), 1000);
    assert_eq!(sheet.rows[999][1].value, "row 999");
}

#[test]
fn test_create_rejects_other_extensions() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        streamsheet::create(dir.path().join("out.csv")),
        Err(XlsxError::InvalidFormat(_))
    ));
}
