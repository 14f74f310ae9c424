use serde_json::Value;

use crate::error::{ExportError, Result};

pub(super) fn render(rows: &[Value]) -> Result<Vec<u8>> {
    serde_json::to_vec(rows).map_err(|e| ExportError::Encode(e.to_string()))
}
