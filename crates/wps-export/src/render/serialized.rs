use serde_json::Value;

use crate::error::{ExportError, Result};

/// bincode with the standard config
///
/// Not self-describing: only a reader that knows the row shape can decode it.
pub(super) fn render(rows: &[Value]) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(rows, bincode::config::standard())
        .map_err(|e| ExportError::Encode(e.to_string()))
}
