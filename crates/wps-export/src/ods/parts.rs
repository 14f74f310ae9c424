//! XML parts of the package

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;

use super::writer::Sheet;
use crate::error::OdsError;
use crate::text::is_xml_text;

const NS_OFFICE: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
const NS_TABLE: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";
const NS_TEXT: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";
const NS_STYLE: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";
const NS_FO: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";
const NS_META: &str = "urn:oasis:names:tc:opendocument:xmlns:meta:1.0";
const NS_DC: &str = "http://purl.org/dc/elements/1.1/";

const ODF_VERSION: &str = "1.2";

pub(super) const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" "#,
    r#"xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" "#,
    r#"xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" office:version="1.2">"#,
    r#"<office:styles/><office:automatic-styles/><office:master-styles/>"#,
    r#"</office:document-styles>"#
);

pub(super) const MANIFEST: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2">"#,
    r#"<manifest:file-entry manifest:full-path="/" manifest:version="1.2" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/>"#,
    r#"<manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>"#,
    r#"<manifest:file-entry manifest:full-path="styles.xml" manifest:media-type="text/xml"/>"#,
    r#"<manifest:file-entry manifest:full-path="meta.xml" manifest:media-type="text/xml"/>"#,
    r#"</manifest:manifest>"#
);

fn xml<E: Display>(e: E) -> OdsError {
    OdsError::Xml(e.to_string())
}

fn start(writer: &mut Writer<Vec<u8>>, element: BytesStart<'_>) -> Result<(), OdsError> {
    writer.write_event(Event::Start(element)).map_err(xml)
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), OdsError> {
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml)
}

fn empty(writer: &mut Writer<Vec<u8>>, element: BytesStart<'_>) -> Result<(), OdsError> {
    writer.write_event(Event::Empty(element)).map_err(xml)
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), OdsError> {
    start(writer, BytesStart::new(name))?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml)?;
    end(writer, name)
}

fn declaration(writer: &mut Writer<Vec<u8>>) -> Result<(), OdsError> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml)
}

/// `content.xml`: one `table:table` per sheet
pub(super) fn content(sheets: &[Sheet]) -> Result<Vec<u8>, OdsError> {
    let mut writer = Writer::new(Vec::new());
    declaration(&mut writer)?;

    start(
        &mut writer,
        BytesStart::new("office:document-content").with_attributes([
            ("xmlns:office", NS_OFFICE),
            ("xmlns:style", NS_STYLE),
            ("xmlns:text", NS_TEXT),
            ("xmlns:table", NS_TABLE),
            ("xmlns:fo", NS_FO),
            ("office:version", ODF_VERSION),
        ]),
    )?;
    empty(&mut writer, BytesStart::new("office:automatic-styles"))?;
    start(&mut writer, BytesStart::new("office:body"))?;
    start(&mut writer, BytesStart::new("office:spreadsheet"))?;
    empty(
        &mut writer,
        BytesStart::new("table:calculation-settings")
            .with_attributes([("table:automatic-find-labels", "false")]),
    )?;

    for sheet in sheets {
        write_sheet(&mut writer, sheet)?;
    }

    end(&mut writer, "office:spreadsheet")?;
    end(&mut writer, "office:body")?;
    end(&mut writer, "office:document-content")?;
    Ok(writer.into_inner())
}

fn write_sheet(writer: &mut Writer<Vec<u8>>, sheet: &Sheet) -> Result<(), OdsError> {
    start(
        writer,
        BytesStart::new("table:table").with_attributes([("table:name", sheet.name.as_str())]),
    )?;

    let columns = sheet.rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
    let repeated = columns.to_string();
    empty(
        writer,
        BytesStart::new("table:table-column")
            .with_attributes([("table:number-columns-repeated", repeated.as_str())]),
    )?;

    if sheet.rows.is_empty() {
        // A table needs at least one row with one cell.
        start(writer, BytesStart::new("table:table-row"))?;
        empty(writer, BytesStart::new("table:table-cell"))?;
        end(writer, "table:table-row")?;
    }

    for row in &sheet.rows {
        start(writer, BytesStart::new("table:table-row"))?;
        if row.is_empty() {
            empty(writer, BytesStart::new("table:table-cell"))?;
        }
        for cell in row {
            if cell.is_empty() {
                empty(writer, BytesStart::new("table:table-cell"))?;
                continue;
            }
            start(
                writer,
                BytesStart::new("table:table-cell")
                    .with_attributes([("office:value-type", "string")]),
            )?;
            text_element(writer, "text:p", cell)?;
            end(writer, "table:table-cell")?;
        }
        end(writer, "table:table-row")?;
    }

    end(writer, "table:table")
}

/// `meta.xml`
pub(super) fn meta(
    generator: &str,
    creator: &str,
    created: Option<&str>,
) -> Result<Vec<u8>, OdsError> {
    let mut writer = Writer::new(Vec::new());
    declaration(&mut writer)?;

    start(
        &mut writer,
        BytesStart::new("office:document-meta").with_attributes([
            ("xmlns:office", NS_OFFICE),
            ("xmlns:meta", NS_META),
            ("xmlns:dc", NS_DC),
            ("office:version", ODF_VERSION),
        ]),
    )?;
    start(&mut writer, BytesStart::new("office:meta"))?;

    let fields = [
        ("meta:generator", Some(generator)),
        ("dc:creator", Some(creator)),
        ("meta:creation-date", created),
    ];
    for (name, value) in fields {
        match value {
            Some(value) if !value.is_empty() && is_xml_text(value) => {
                text_element(&mut writer, name, value)?;
            }
            _ => {}
        }
    }

    end(&mut writer, "office:meta")?;
    end(&mut writer, "office:document-meta")?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
        Sheet {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_content_cells() {
        let out = content(&[sheet("Posts", &[&["id", "title"], &["1", "A & B"]])]).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains(r#"<table:table table:name="Posts">"#));
        assert!(out.contains(r#"table:number-columns-repeated="2""#));
        assert!(out.contains("<table:calculation-settings"));
        assert!(out.contains("<text:p>A &amp; B</text:p>"));
        assert_eq!(out.matches("<table:table-row>").count(), 2);
    }

    #[test]
    fn test_empty_sheet_has_placeholder_row() {
        let out = String::from_utf8(content(&[sheet("Empty", &[])]).unwrap()).unwrap();
        assert!(out.contains("<table:table-row><table:table-cell/></table:table-row>"));
    }

    #[test]
    fn test_meta_fields() {
        let out = meta("wps-export/0.1.0", "Editor", Some("2026-01-05T10:00:00")).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("<meta:generator>wps-export/0.1.0</meta:generator>"));
        assert!(out.contains("<dc:creator>Editor</dc:creator>"));
        assert!(out.contains("<meta:creation-date>2026-01-05T10:00:00</meta:creation-date>"));
    }

    #[test]
    fn test_meta_skips_missing_date() {
        let out = String::from_utf8(meta("g", "c", None).unwrap()).unwrap();
        assert!(!out.contains("creation-date"));
    }
}
