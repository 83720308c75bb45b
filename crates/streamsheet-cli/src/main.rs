//! streamsheet CLI - stream CSV data into XLSX workbooks

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use streamsheet::prelude::*;
use streamsheet::{ColumnInfo, MAX_SHEET_NAME_LEN};

#[derive(Parser)]
#[command(name = "streamsheet")]
#[command(author, version, about = "Stream CSV data into XLSX workbooks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one or more CSV files into a workbook, one sheet per file
    #[command(alias = "csv")]
    FromCsv {
        /// Input CSV files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output XLSX file
        #[arg(short, long)]
        output: PathBuf,

        /// Write the first row of each file in bold
        #[arg(long)]
        header_bold: bool,

        /// Store strings in the cells instead of a shared-string table
        #[arg(long)]
        inline_strings: bool,

        /// Width of every column that holds data
        #[arg(short, long)]
        width: Option<f64>,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Show the sheets, row counts and column ranges of a workbook
    Inspect {
        /// Input XLSX file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::FromCsv {
            inputs,
            output,
            header_bold,
            inline_strings,
            width,
            delimiter,
        } => {
            let options = CsvOptions {
                header_bold,
                inline_strings,
                width,
                delimiter,
            };
            from_csv(&inputs, &output, &options)
        }
        Commands::Inspect { input } => inspect(&input),
    }
}

struct CsvOptions {
    header_bold: bool,
    inline_strings: bool,
    width: Option<f64>,
    delimiter: char,
}

/// A CSV input whose first record has already been read
struct CsvSheet {
    path: PathBuf,
    reader: csv::Reader<File>,
    header: csv::StringRecord,
}

fn from_csv(inputs: &[PathBuf], output: &Path, options: &CsvOptions) -> Result<()> {
    if !options.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character");
    }

    let mut builder = streamsheet::create(output)
        .with_context(|| format!("Failed to create '{}'", output.display()))?;
    builder.add_style_list(&StreamStyle::defaults())?;
    if options.inline_strings {
        builder.string_encoding(StringEncoding::InlineStrings);
    }

    // Headers are read up front: they fix each sheet's width, and widths
    // must be known before the first row is streamed
    let mut sheets = Vec::with_capacity(inputs.len());
    for path in inputs {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter as u8)
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open '{}'", path.display()))?;

        let mut header = csv::StringRecord::new();
        reader
            .read_record(&mut header)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;

        let name = sheet_name(path);
        let index = builder
            .add_sheet(&name, &[])
            .with_context(|| format!("Cannot add sheet for '{}'", path.display()))?;
        if let (Some(width), Ok(columns @ 1..)) = (options.width, u16::try_from(header.len())) {
            builder
                .set_column_width(index, 1, columns, width)
                .with_context(|| format!("Invalid column width {}", width))?;
        }

        sheets.push(CsvSheet {
            path: path.clone(),
            reader,
            header,
        });
    }

    let mut file = builder.build().context("Failed to start workbook")?;
    for (i, sheet) in sheets.iter_mut().enumerate() {
        if i > 0 {
            file.next_sheet()?;
        }
        stream_csv(&mut file, sheet, options.header_bold)
            .with_context(|| format!("Failed to convert '{}'", sheet.path.display()))?;
    }

    let summary = file.close().context("Failed to finish workbook")?;
    for sheet in &summary.sheets {
        eprintln!("  {}: {} rows ({})", sheet.name, sheet.rows, sheet.dimension);
    }
    eprintln!(
        "Wrote {} rows to '{}'",
        summary.total_rows(),
        output.display()
    );

    Ok(())
}

fn stream_csv<W: std::io::Write + std::io::Seek>(
    file: &mut StreamFile<W>,
    sheet: &mut CsvSheet,
    header_bold: bool,
) -> Result<()> {
    // An empty file gives an empty sheet
    if sheet.header.is_empty() {
        return Ok(());
    }
    let width = sheet.header.len();

    let header: Vec<StreamCell<'_>> = sheet
        .header
        .iter()
        .map(|field| {
            if header_bold {
                StreamCell::styled_string(field, &BOLD_STRING)
            } else {
                StreamCell::string(field)
            }
        })
        .collect();
    file.write_row(&header)?;

    let mut row = Vec::with_capacity(width);
    for (line, record) in sheet.reader.records().enumerate() {
        let record = record?;
        if record.len() > width {
            bail!(
                "record {} has {} fields, the header has {}",
                line + 2,
                record.len(),
                width
            );
        }

        row.clear();
        row.extend(record.iter().map(detect_cell));
        // Short records are padded so every row has the header's width
        row.resize(width, StreamCell::string(""));
        file.write_row(&row)?;
    }

    Ok(())
}

/// Numbers become numeric cells; everything else stays text
fn detect_cell(field: &str) -> StreamCell<'static> {
    let trimmed = field.trim();

    // Leading zeros are identifiers, not numbers
    let padded = trimmed.len() > 1 && trimmed.starts_with('0') && !trimmed.starts_with("0.");
    if !padded {
        if let Ok(n) = trimmed.parse::<i64>() {
            return StreamCell::integer(n);
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() && trimmed.bytes().any(|b| b.is_ascii_digit()) {
                return StreamCell::float(n);
            }
        }
    }
    StreamCell::string(field)
}

/// Sheet name from a file stem, cut to the allowed length
fn sheet_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet");
    let cleaned: String = stem
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

fn inspect(input: &Path) -> Result<()> {
    let workbook = streamsheet::open(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("File: {}", input.display());
    println!("Sheets: {}", workbook.sheets.len());
    if workbook.date_system.is_1904() {
        println!("Date system: 1904");
    }

    for (i, sheet) in workbook.sheets.iter().enumerate() {
        let columns = sheet.rows.iter().map(Vec::len).max().unwrap_or(0);

        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name);
        println!("    Rows: {}", sheet.rows.len());
        println!("    Columns: {}", columns);
        for col in &sheet.columns {
            println!("    {}", describe_column(col));
        }
    }

    Ok(())
}

fn describe_column(col: &ColumnInfo) -> String {
    let range = if col.min == col.max {
        format!("col {}", col.min)
    } else {
        format!("cols {}-{}", col.min, col.max)
    };
    let mut text = range;
    if let Some(width) = col.width {
        text.push_str(&format!(" width {}", width));
    }
    if let Some(style) = col.style {
        text.push_str(&format!(" style {}", style));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_cell() {
        assert_eq!(detect_cell("42").value, CellValue::Integer(42));
        assert_eq!(detect_cell("-3.5").value, CellValue::Float(-3.5));
        assert_eq!(detect_cell("0.25").value, CellValue::Float(0.25));
        assert_eq!(detect_cell("0").value, CellValue::Integer(0));
        assert_eq!(
            detect_cell("0000000123").value,
            CellValue::String("0000000123".into())
        );
        assert_eq!(detect_cell("NaN").value, CellValue::String("NaN".into()));
        assert_eq!(detect_cell("inf").value, CellValue::String("inf".into()));
        assert_eq!(detect_cell("Taco").value, CellValue::String("Taco".into()));
    }

    #[test]
    fn test_sheet_name() {
        assert_eq!(sheet_name(Path::new("data/prices.csv")), "prices");
        assert_eq!(sheet_name(Path::new("a[1].csv")), "a_1_");
        assert_eq!(
            sheet_name(Path::new("a-very-long-file-name-that-keeps-going.csv")).len(),
            MAX_SHEET_NAME_LEN
        );
    }

    #[test]
    fn test_from_csv_and_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let prices = dir.path().join("prices.csv");
        std::fs::write(&prices, "Token,Name,Price\n123,Taco,3.5\n456,Burrito\n").unwrap();
        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "").unwrap();
        let output = dir.path().join("out.xlsx");

        let options = CsvOptions {
            header_bold: true,
            inline_strings: false,
            width: Some(15.0),
            delimiter: ',',
        };
        from_csv(&[prices, empty], &output, &options).unwrap();

        let wb = streamsheet::open(&output).unwrap();
        assert_eq!(wb.sheet_names(), vec!["prices", "empty"]);
        let sheet = wb.sheet("prices").unwrap();
        assert_eq!(
            sheet.formatted_rows(),
            vec![
                vec!["Token", "Name", "Price"],
                vec!["123", "Taco", "3.50"],
                vec!["456", "Burrito", ""],
            ]
        );
        assert!(sheet.rows[0][0].font.bold);
        assert_eq!(sheet.find_column(3).and_then(|c| c.width), Some(15.0));
        assert!(wb.sheet("empty").unwrap().rows.is_empty());

        inspect(&output).unwrap();
    }

    #[test]
    fn test_from_csv_rejects_long_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ragged.csv");
        std::fs::write(&input, "a,b\n1,2,3\n").unwrap();
        let options = CsvOptions {
            header_bold: false,
            inline_strings: true,
            width: None,
            delimiter: ',',
        };
        assert!(from_csv(&[input], &dir.path().join("out.xlsx"), &options).is_err());
    }
}
