use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;
use tracing::warn;

use crate::error::{xml_error, Result};
use crate::text::{is_xml_name, is_xml_text, scalar_text};

/// Pretty-printed document with one child of `<root>` per row
pub(super) fn render(rows: &[Value]) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("root")))
        .map_err(xml_error)?;
    for (index, row) in rows.iter().enumerate() {
        write_element(&mut writer, &index.to_string(), row)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("root")))
        .map_err(xml_error)?;

    Ok(writer.into_inner())
}

/// Numeric keys become `item<N>`
fn element_name(key: &str) -> String {
    if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        format!("item{key}")
    } else {
        key.to_string()
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, key: &str, value: &Value) -> Result<()> {
    let name = element_name(key);
    if !is_xml_name(&name) {
        warn!(target: "wps_export", key, "skipping value with invalid XML element name");
        return Ok(());
    }

    match value {
        Value::Object(map) if !map.is_empty() => {
            writer
                .write_event(Event::Start(BytesStart::new(name.as_str())))
                .map_err(xml_error)?;
            for (child_key, child) in map {
                write_element(writer, child_key, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name.as_str())))
                .map_err(xml_error)?;
        }
        Value::Array(items) if !items.is_empty() => {
            writer
                .write_event(Event::Start(BytesStart::new(name.as_str())))
                .map_err(xml_error)?;
            for (index, child) in items.iter().enumerate() {
                write_element(writer, &index.to_string(), child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name.as_str())))
                .map_err(xml_error)?;
        }
        Value::Object(_) | Value::Array(_) => {
            writer
                .write_event(Event::Empty(BytesStart::new(name.as_str())))
                .map_err(xml_error)?;
        }
        scalar => {
            let text = scalar_text(scalar);
            if !is_xml_text(&text) {
                warn!(target: "wps_export", element = %name, "skipping value with characters not allowed in XML");
                return Ok(());
            }
            if text.is_empty() {
                writer
                    .write_event(Event::Empty(BytesStart::new(name.as_str())))
                    .map_err(xml_error)?;
            } else {
                writer
                    .write_event(Event::Start(BytesStart::new(name.as_str())))
                    .map_err(xml_error)?;
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(xml_error)?;
                writer
                    .write_event(Event::End(BytesEnd::new(name.as_str())))
                    .map_err(xml_error)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn xml(rows: Value) -> String {
        let Value::Array(rows) = rows else {
            panic!("rows must be an array");
        };
        String::from_utf8(render(&rows).unwrap()).unwrap()
    }

    #[test]
    fn test_flat_rows() {
        let out = xml(json!([{"id": 1, "title": "Hello"}]));
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("<root>"));
        assert!(out.contains("<item0>"));
        assert!(out.contains("<id>1</id>"));
        assert!(out.contains("<title>Hello</title>"));
        assert!(out.trim_end().ends_with("</root>"));
    }

    #[test]
    fn test_nested_and_numeric_keys() {
        let out = xml(json!([{"tags": ["a", "b"], "meta": {"views": 10}}]));
        assert!(out.contains("<tags>"));
        assert!(out.contains("<item0>a</item0>"));
        assert!(out.contains("<item1>b</item1>"));
        assert!(out.contains("<views>10</views>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let out = xml(json!([{"title": "Fish & <Chips>"}]));
        assert!(out.contains("<title>Fish &amp; &lt;Chips&gt;</title>"));
    }

    #[test]
    fn test_invalid_names_and_text_are_skipped() {
        let out = xml(json!([{"bad key": 1, "ctrl": "a\u{1}b", "ok": "yes"}]));
        assert!(!out.contains("bad key"));
        assert!(!out.contains("<ctrl"));
        assert!(out.contains("<ok>yes</ok>"));
    }

    #[test]
    fn test_null_is_empty_element() {
        let out = xml(json!([{"excerpt": null}]));
        assert!(out.contains("<excerpt/>"));
    }

    #[test]
    fn test_scalar_rows_are_flat() {
        let out = xml(json!(["one", "two"]));
        assert!(out.contains("<item0>one</item0>"));
        assert!(out.contains("<item1>two</item1>"));
    }
}
