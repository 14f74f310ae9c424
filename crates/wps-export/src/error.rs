//! Error types for export operations

use thiserror::Error;

/// Errors from building an ODS package
#[derive(Error, Debug)]
pub enum OdsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(String),

    /// A cell holds characters XML cannot represent
    #[error("cell {column} cannot be represented in XML")]
    InvalidCell { column: usize },

    #[error("sheet name \"{name}\" cannot be represented in XML")]
    InvalidSheetName { name: String },
}

/// Errors from rendering an export buffer
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Ods(#[from] OdsError),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("encoding error: {0}")]
    Encode(String),
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

pub(crate) fn xml_error<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Xml(e.to_string())
}
