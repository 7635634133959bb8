use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Error type covering the different failure cases that can occur while the
/// tool loads, reconciles, or emits BOM data. Every variant is fatal for the
/// invocation it occurs in; there is no partial output mode.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization of the preview fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the input workbook lacks one of the two BOM sheets.
    #[error("missing sheet '{0}' in input workbook")]
    MissingSheet(String),

    /// Raised when a loaded table lacks a required column.
    #[error("missing column '{column}' in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    /// Raised when a header text occurs more than once in one table, making
    /// column lookup ambiguous.
    #[error("ambiguous column '{column}' in sheet '{sheet}': header occurs more than once")]
    AmbiguousColumn { sheet: String, column: String },

    /// Raised when a quantity cell cannot be coerced to a number.
    #[error("non-numeric quantity '{value}' in sheet '{sheet}', column '{column}', row {row}")]
    NonNumericQuantity {
        sheet: String,
        column: String,
        row: usize,
        value: String,
    },

    /// Raised when a header label required for cell decoration is absent
    /// from the written comparison table.
    #[error("header '{header}' not found in sheet '{sheet}'")]
    HeaderNotFound { sheet: String, header: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
