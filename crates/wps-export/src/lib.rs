//! wps-export: Tabular exporter for the WPS toolkit
//!
//! Renders a row sequence as csv, json, xml, serialized (bincode),
//! php_array (`var_export` literal) or ods, and packages the result as an
//! HTTP attachment.
//!
//! ```rust,no_run
//! use serde_json::json;
//! use wps_export::Exporter;
//!
//! let mut exporter = Exporter::new();
//! exporter
//!     .format("csv")
//!     .set_data(vec![json!({"id": 1, "title": "Hello"})]);
//!
//! let response = exporter.download("posts").into_http_response();
//! assert_eq!(response.headers()["content-type"], "text/csv");
//! ```

mod download;
mod error;
mod exporter;
mod format;
pub mod ods;
mod render;
mod text;

pub use download::Download;
pub use error::{ExportError, OdsError, Result};
pub use exporter::{ExportData, Exporter, DEFAULT_DELIMITER};
pub use format::ExportFormat;
pub use ods::{OdsOptions, OdsWriter, SheetId};
pub use render::render;
