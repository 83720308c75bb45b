//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while streaming or reading back a package
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration or usage error from the workbook model
    #[error(transparent)]
    Core(#[from] streamsheet_core::Error),
}

impl XlsxError {
    /// The configuration error behind this one, if any
    pub fn as_core(&self) -> Option<&streamsheet_core::Error> {
        match self {
            XlsxError::Core(e) => Some(e),
            _ => None,
        }
    }
}
