use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;

use crate::error::{ExportError, Result};
use crate::text::scalar_text;

/// Comma-joined lines, header taken from the keys of the first row
///
/// Values are written as-is: embedded commas and newlines are not quoted.
pub(super) fn render(rows: &[Value]) -> Result<Vec<u8>> {
    if rows.is_empty() {
        return Ok(b"\n".to_vec());
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    // Scalar and list rows have no keys to name columns.
    if let Some(Value::Object(first)) = rows.first() {
        writer.write_record(first.keys())?;
    }

    for row in rows {
        let cells: Vec<String> = match row {
            Value::Object(map) => map.values().map(scalar_text).collect(),
            Value::Array(items) => items.iter().map(scalar_text).collect(),
            scalar => vec![scalar_text(scalar)],
        };
        writer.write_record(&cells)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Encode(e.error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn csv(rows: Value) -> String {
        let Value::Array(rows) = rows else {
            panic!("rows must be an array");
        };
        String::from_utf8(render(&rows).unwrap()).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        assert_eq!(
            csv(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}])),
            "a,b\n1,2\n3,4\n"
        );
    }

    #[test]
    fn test_column_order_follows_first_row() {
        assert_eq!(
            csv(json!([{"zeta": "z", "alpha": "a"}])),
            "zeta,alpha\nz,a\n"
        );
    }

    #[test]
    fn test_empty_rows_give_empty_header() {
        assert_eq!(csv(json!([])), "\n");
    }

    #[test]
    fn test_scalar_rows() {
        assert_eq!(csv(json!(["one", "two"])), "one\ntwo\n");
    }

    #[test]
    fn test_values_are_not_quoted() {
        assert_eq!(
            csv(json!([{"title": "a, b", "n": null, "ok": true}])),
            "title,n,ok\na, b,,true\n"
        );
    }

    #[test]
    fn test_ragged_rows_are_written() {
        assert_eq!(
            csv(json!([{"a": 1, "b": 2}, {"a": 3}, [4, 5, 6]])),
            "a,b\n1,2\n3\n4,5,6\n"
        );
    }
}
