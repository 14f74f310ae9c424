//! OpenDocument Spreadsheet writer
//!
//! Builds a flat grid of string cells. The package holds exactly `mimetype`,
//! `content.xml`, `meta.xml`, `styles.xml` and `META-INF/manifest.xml`; no
//! formulas or formatting are written.

mod parts;
mod writer;

use serde::Deserialize;
use std::path::PathBuf;

pub use writer::OdsWriter;

/// Sheet that `import` writes into
pub const DEFAULT_SHEET: &str = "Foglio1";

/// `mimetype` entry content
pub const MIME_TYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// Handle to a sheet of one [`OdsWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(usize);

/// Configuration for the ODS writer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OdsOptions {
    /// Directory for the temporary archive; the system temp dir when unset
    pub temp_dir: Option<PathBuf>,

    /// `meta:generator` of the document
    pub generator: String,

    /// `dc:creator` of the document
    pub creator: String,
}

impl Default for OdsOptions {
    fn default() -> Self {
        Self {
            temp_dir: None,
            generator: concat!("wps-export/", env!("CARGO_PKG_VERSION")).to_string(),
            creator: "WPS".to_string(),
        }
    }
}

impl OdsOptions {
    /// Write temporary archives under `dir`
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }
}
