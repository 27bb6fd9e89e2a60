use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool loads, transforms, or emits route data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the tabular input cannot be parsed.
    #[error("TSV read error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when the configuration file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when a column required by the configuration is absent from the
    /// input header.
    #[error("missing column '{column}' in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// Raised when the input has a header but no data rows.
    #[error("no route rows found in {}", .0.display())]
    EmptyInput(PathBuf),

    /// Raised when a hold-color token cannot be turned into a cell color.
    #[error("invalid hold color '{token}' on data row {row}")]
    InvalidEncoding { row: usize, token: String },

    /// Raised when the configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
