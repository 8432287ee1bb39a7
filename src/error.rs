use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failures that abort a whole run: unreadable
/// inputs, structurally wrong workbooks, or a broken environment.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the JSON configuration cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a sheet does not have the expected shape.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a required input file does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the accommodation schedule yields no usable references.
    #[error("no unit references found in {0}")]
    NoReferences(PathBuf),

    /// Raised when the configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Reasons a raw unit reference cannot be normalised. These never abort a
/// run; the offending row is skipped and listed in the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("reference is empty")]
    Empty,

    #[error("unknown unit kind '{0}', expected HT or FT")]
    UnknownKind(String),

    #[error("reference has no type letter")]
    MissingLetter,

    #[error("'{0}' is not a bed/person suffix such as 3B4P")]
    MalformedSuffix(String),
}
