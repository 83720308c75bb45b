//! Prelude module - common imports for streamsheet users
//!
//! ```rust
//! use streamsheet::prelude::*;
//! ```

pub use crate::{
    // Style types
    Alignment,
    BorderLineStyle,
    BorderStyle,
    // Cell types
    CellType,
    CellValue,
    Color,
    DateSystem,
    // Error types
    Error,
    FillStyle,
    FontStyle,
    HorizontalAlignment,
    // Reading back
    ReadWorkbook,
    StreamCell,
    // Writing
    StreamFile,
    StreamFileBuilder,
    StreamStyle,
    StringEncoding,
    VerticalAlignment,
    WorkbookSummary,
    XlsxError,
    XlsxReader,
    XlsxResult,

    // Baseline styles
    BOLD_INTEGER,
    BOLD_STRING,
    DEFAULT_BOOLEAN,
    DEFAULT_DATE,
    DEFAULT_DATETIME,
    DEFAULT_DECIMAL,
    DEFAULT_INTEGER,
    DEFAULT_STRING,
    ITALIC_INTEGER,
    ITALIC_STRING,
    UNDERLINED_INTEGER,
    UNDERLINED_STRING,
};
