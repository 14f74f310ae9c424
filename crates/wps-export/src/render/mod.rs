//! Format renderers
//!
//! Each renderer turns the whole row sequence into one buffer.

mod csv;
mod json;
mod php;
mod serialized;
mod xml;

use serde_json::Value;

use crate::error::Result;
use crate::format::ExportFormat;
use crate::ods::{OdsOptions, OdsWriter};

/// Render `rows` in `format`
///
/// Formats without a renderer produce an empty buffer.
pub fn render(format: &ExportFormat, rows: &[Value], ods: &OdsOptions) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => csv::render(rows),
        ExportFormat::Json => json::render(rows),
        ExportFormat::Xml => xml::render(rows),
        ExportFormat::Serialized => serialized::render(rows),
        ExportFormat::PhpArray => Ok(php::render(rows)),
        ExportFormat::Ods => {
            let mut writer = OdsWriter::with_options(ods.clone())?;
            writer.import(rows);
            Ok(writer.export()?)
        }
        ExportFormat::Other(_) => Ok(Vec::new()),
    }
}
