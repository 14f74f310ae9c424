//! Export job: format + rows -> buffer

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::download::Download;
use crate::error::{ExportError, Result};
use crate::format::ExportFormat;
use crate::ods::OdsOptions;
use crate::render::render;

/// Delimiter used to split text input when none is given
pub const DEFAULT_DELIMITER: &str = "\n";

/// Input accepted by [`Exporter::set_data`]
#[derive(Debug, Clone, PartialEq)]
pub enum ExportData {
    /// Structured rows, usually objects mapping column to value
    Rows(Vec<Value>),
    /// Flat text split into one scalar row per delimited piece
    Text(String),
}

impl ExportData {
    /// Rows from any serializable sequence
    pub fn from_serialize<T: Serialize + ?Sized>(items: &T) -> Result<Self> {
        let value = serde_json::to_value(items).map_err(|e| ExportError::Encode(e.to_string()))?;
        Ok(value.into())
    }

    fn into_rows(self, delimiter: &str) -> Vec<Value> {
        match self {
            ExportData::Rows(rows) => rows,
            ExportData::Text(text) if delimiter.is_empty() => vec![Value::String(text)],
            ExportData::Text(text) => text
                .split(delimiter)
                .map(|piece| Value::String(piece.to_string()))
                .collect(),
        }
    }
}

impl From<Vec<Value>> for ExportData {
    fn from(rows: Vec<Value>) -> Self {
        ExportData::Rows(rows)
    }
}

impl From<Value> for ExportData {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(rows) => ExportData::Rows(rows),
            Value::String(text) => ExportData::Text(text),
            single => ExportData::Rows(vec![single]),
        }
    }
}

impl From<String> for ExportData {
    fn from(text: String) -> Self {
        ExportData::Text(text)
    }
}

impl From<&str> for ExportData {
    fn from(text: &str) -> Self {
        ExportData::Text(text.to_string())
    }
}

/// One export job
///
/// Pick a format, assign rows, then [`prepare`](Exporter::prepare) renders
/// the buffer once. Later calls to `prepare` keep the first rendering until
/// [`reset`](Exporter::reset).
#[derive(Debug, Default)]
pub struct Exporter {
    format: ExportFormat,
    rows: Vec<Value>,
    buffer: Vec<u8>,
    rendered: bool,
    ods: OdsOptions,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter whose ODS output uses `options`
    pub fn with_ods_options(options: OdsOptions) -> Self {
        Self {
            ods: options,
            ..Default::default()
        }
    }

    /// Select the output format by tag
    pub fn format(&mut self, tag: &str) -> &mut Self {
        self.format = ExportFormat::parse(tag);
        self
    }

    pub fn selected_format(&self) -> &ExportFormat {
        &self.format
    }

    /// Assign rows, splitting text input on newlines
    pub fn set_data(&mut self, data: impl Into<ExportData>) -> &mut Self {
        self.set_data_with_delimiter(data, DEFAULT_DELIMITER)
    }

    /// Assign rows, splitting text input on `delimiter`
    pub fn set_data_with_delimiter(
        &mut self,
        data: impl Into<ExportData>,
        delimiter: &str,
    ) -> &mut Self {
        self.rows = data.into().into_rows(delimiter);
        self
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Render the buffer if it has not been rendered yet
    ///
    /// Unknown formats render nothing. A rendering failure is logged and
    /// leaves the buffer empty.
    pub fn prepare(&mut self) -> &mut Self {
        if self.rendered {
            return self;
        }
        self.rendered = true;

        if !self.format.is_renderable() {
            debug!(target: "wps_export", format = %self.format, "no renderer for format, buffer left empty");
            self.buffer.clear();
            return self;
        }

        match render(&self.format, &self.rows, &self.ods) {
            Ok(buffer) => self.buffer = buffer,
            Err(e) => {
                warn!(target: "wps_export", format = %self.format, error = %e, "export failed, buffer left empty");
                self.buffer.clear();
            }
        }
        self
    }

    pub fn is_prepared(&self) -> bool {
        self.rendered
    }

    /// The rendered buffer, preparing it first if needed
    pub fn export(&mut self) -> &[u8] {
        self.prepare();
        &self.buffer
    }

    /// Take the rendered buffer
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.prepare();
        self.buffer
    }

    /// Drop the rendered buffer so the next `prepare` renders again
    pub fn reset(&mut self) -> &mut Self {
        self.buffer.clear();
        self.rendered = false;
        self
    }

    /// Package the buffer as an attachment named after `filename`
    ///
    /// The format extension is appended when `filename` has none.
    pub fn download(mut self, filename: &str) -> Download {
        self.prepare();
        Download::new(filename, &self.format, self.buffer)
    }
}
