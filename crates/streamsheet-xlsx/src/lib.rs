//! # streamsheet-xlsx
//!
//! Streaming XLSX (Office Open XML) writer for streamsheet.
//!
//! Workbooks are declared up front with [`StreamFileBuilder`] and then
//! written row by row through a [`StreamFile`]. Rows go straight into the
//! zip entry of the current sheet, so memory use does not grow with the
//! number of rows.
//!
//! [`XlsxReader`] reads a finished package back for verification.
//!
//! ## Example
//!
//! ```rust
//! use std::io::Cursor;
//! use streamsheet_core::{StreamCell, StreamStyle, DEFAULT_INTEGER, DEFAULT_STRING};
//! use streamsheet_xlsx::{StreamFileBuilder, XlsxReader};
//!
//! let mut builder = StreamFileBuilder::new(Cursor::new(Vec::<u8>::new()));
//! builder.add_style_list(&StreamStyle::defaults())?;
//! builder.add_sheet("Sheet1", &[DEFAULT_STRING.clone(), DEFAULT_INTEGER.clone()])?;
//!
//! let mut file = builder.build()?;
//! file.write_row(&[StreamCell::string("answer"), StreamCell::integer(42)])?;
//! let (_, cursor) = file.close_into_inner()?;
//!
//! let workbook = XlsxReader::read(Cursor::new(cursor.into_inner()))?;
//! assert_eq!(workbook.sheets[0].formatted_rows(), vec![vec!["answer", "42"]]);
//! # Ok::<(), streamsheet_xlsx::XlsxError>(())
//! ```

mod builder;
pub mod error;
mod escape;
pub mod reader;
mod styles;
pub mod writer;

pub use builder::StreamFileBuilder;
pub use error::{XlsxError, XlsxResult};
pub use escape::decode_excel_escapes;
pub use reader::{ReadCell, ReadSheet, ReadWorkbook, XlsxReader};
pub use writer::{SheetSummary, StreamFile, WorkbookSummary};
