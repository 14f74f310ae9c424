use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempPath;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{parts, OdsOptions, SheetId, DEFAULT_SHEET, MIME_TYPE};
use crate::error::OdsError;
use crate::text::{is_xml_text, scalar_text};

/// One table of the document
#[derive(Debug)]
pub(super) struct Sheet {
    pub(super) name: String,
    pub(super) rows: Vec<Vec<String>>,
}

/// Builds one `.ods` package in a temporary file
///
/// The archive is opened on construction; [`save`](OdsWriter::save) writes
/// every part and hands back the path, [`export`](OdsWriter::export) also
/// reads the bytes and removes the file. Dropping an unsaved writer removes
/// the file too.
pub struct OdsWriter {
    archive: ZipWriter<File>,
    path: TempPath,
    sheets: Vec<Sheet>,
    names: HashMap<String, SheetId>,
    current: Option<SheetId>,
    options: OdsOptions,
}

impl OdsWriter {
    pub fn new() -> Result<Self, OdsError> {
        Self::with_options(OdsOptions::default())
    }

    /// Open an empty archive at a fresh temporary path
    pub fn with_options(options: OdsOptions) -> Result<Self, OdsError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("wps-ods-").suffix(".ods");
        let file = match &options.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let (file, path) = file.into_parts();
        debug!(target: "wps_export", path = %path.display(), "opened ods archive");

        Ok(Self {
            archive: ZipWriter::new(file),
            path,
            sheets: Vec::new(),
            names: HashMap::new(),
            current: None,
            options,
        })
    }

    /// Path of the archive being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Select the sheet called `name`, creating it on first use
    ///
    /// Names with characters XML cannot carry are rejected and the current
    /// sheet stays selected.
    pub fn set_page(&mut self, name: &str) -> Result<SheetId, OdsError> {
        if !is_xml_text(name) {
            return Err(OdsError::InvalidSheetName {
                name: name.escape_debug().to_string(),
            });
        }
        Ok(self.select(name))
    }

    fn select(&mut self, name: &str) -> SheetId {
        let id = match self.names.get(name) {
            Some(id) => *id,
            None => {
                let id = SheetId(self.sheets.len());
                self.sheets.push(Sheet {
                    name: name.to_string(),
                    rows: Vec::new(),
                });
                self.names.insert(name.to_string(), id);
                id
            }
        };
        self.current = Some(id);
        id
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet_name(&self, sheet: SheetId) -> Option<&str> {
        self.sheets.get(sheet.0).map(|s| s.name.as_str())
    }

    /// Rows appended to `sheet` so far
    pub fn row_count(&self, sheet: SheetId) -> usize {
        self.sheets.get(sheet.0).map_or(0, |s| s.rows.len())
    }

    /// Append one row of string cells to the current sheet
    ///
    /// Selects [`DEFAULT_SHEET`] when no sheet is selected. A row with a cell
    /// XML cannot carry is rejected whole.
    pub fn add_row<I, S>(&mut self, cells: I) -> Result<(), OdsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        if let Some(column) = cells.iter().position(|cell| !is_xml_text(cell)) {
            return Err(OdsError::InvalidCell { column });
        }

        let id = match self.current {
            Some(id) => id,
            None => self.select(DEFAULT_SHEET),
        };
        self.sheets[id.0].rows.push(cells);
        Ok(())
    }

    /// Append every row to [`DEFAULT_SHEET`], skipping rows that are rejected
    pub fn import(&mut self, rows: &[Value]) -> &mut Self {
        self.select(DEFAULT_SHEET);
        for (index, row) in rows.iter().enumerate() {
            if let Err(e) = self.add_row(row_cells(row)) {
                warn!(target: "wps_export", row = index, error = %e, "skipping ods row");
            }
        }
        self
    }

    /// Write every part, close the archive and return its path
    ///
    /// The file is deleted when the returned path is dropped.
    pub fn save(mut self) -> Result<TempPath, OdsError> {
        if self.sheets.is_empty() {
            self.select(DEFAULT_SHEET);
        }
        let Self {
            mut archive,
            path,
            sheets,
            options,
            ..
        } = self;

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // Readers sniff the type from the first entry, uncompressed.
        archive.start_file("mimetype", stored)?;
        archive.write_all(MIME_TYPE.as_bytes())?;

        archive.start_file("content.xml", deflated)?;
        archive.write_all(&parts::content(&sheets)?)?;

        let created = OffsetDateTime::now_utc()
            .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
            .ok();
        archive.start_file("meta.xml", deflated)?;
        archive.write_all(&parts::meta(
            &options.generator,
            &options.creator,
            created.as_deref(),
        )?)?;

        archive.start_file("styles.xml", deflated)?;
        archive.write_all(parts::STYLES.as_bytes())?;

        archive.start_file("META-INF/manifest.xml", deflated)?;
        archive.write_all(parts::MANIFEST.as_bytes())?;

        archive.finish()?;
        Ok(path)
    }

    /// Save, read the package back and delete the temporary file
    pub fn export(self) -> Result<Vec<u8>, OdsError> {
        let path = self.save()?;
        let bytes = std::fs::read(&path)?;
        if let Err(e) = path.close() {
            debug!(target: "wps_export", error = %e, "could not remove ods temp file");
        }
        Ok(bytes)
    }
}

/// Cells of one exported row
fn row_cells(row: &Value) -> Vec<String> {
    match row {
        Value::Object(map) => map.values().map(scalar_text).collect(),
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        scalar => vec![scalar_text(scalar)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut out = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_package_entries() {
        let mut writer = OdsWriter::new().unwrap();
        writer.import(&[json!({"a": 1, "b": 2})]);
        let mut archive = open(writer.export().unwrap());

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "mimetype",
                "content.xml",
                "meta.xml",
                "styles.xml",
                "META-INF/manifest.xml"
            ]
        );

        {
            let mut mimetype = archive.by_index(0).unwrap();
            assert_eq!(mimetype.compression(), CompressionMethod::Stored);
            let mut literal = String::new();
            mimetype.read_to_string(&mut literal).unwrap();
            assert_eq!(literal, MIME_TYPE);
        }

        let content = read_entry(&mut archive, "content.xml");
        assert!(content.contains(r#"table:name="Foglio1""#));
        assert!(content.contains("<text:p>1</text:p>"));
        assert!(content.contains("<text:p>2</text:p>"));
    }

    #[test]
    fn test_set_page_is_idempotent() {
        let mut writer = OdsWriter::new().unwrap();

        let first = writer.set_page("S1").unwrap();
        writer.add_row(["a"]).unwrap();
        let again = writer.set_page("S1").unwrap();
        writer.add_row(["b"]).unwrap();

        assert_eq!(first, again);
        assert_eq!(writer.sheet_count(), 1);
        assert_eq!(writer.row_count(first), 2);
        assert_eq!(writer.sheet_name(first), Some("S1"));
    }

    #[test]
    fn test_set_page_rejects_control_characters() {
        let mut writer = OdsWriter::new().unwrap();
        let posts = writer.set_page("Posts").unwrap();

        let err = writer.set_page("Bad\u{1}name").unwrap_err();
        assert!(matches!(err, OdsError::InvalidSheetName { .. }));
        assert_eq!(writer.sheet_count(), 1);

        writer.add_row(["still posts"]).unwrap();
        assert_eq!(writer.row_count(posts), 1);

        let mut archive = open(writer.export().unwrap());
        let content = read_entry(&mut archive, "content.xml");
        assert!(!content.contains("Bad"));
    }

    #[test]
    fn test_multiple_sheets() {
        let mut writer = OdsWriter::new().unwrap();
        let posts = writer.set_page("Posts").unwrap();
        writer.add_row(["1", "Hello"]).unwrap();
        let users = writer.set_page("Users").unwrap();
        writer.add_row(["alice"]).unwrap();

        assert_ne!(posts, users);
        assert_eq!(writer.row_count(posts), 1);
        assert_eq!(writer.row_count(users), 1);

        let mut archive = open(writer.export().unwrap());
        let content = read_entry(&mut archive, "content.xml");
        assert!(content.contains(r#"table:name="Posts""#));
        assert!(content.contains(r#"table:name="Users""#));
    }

    #[test]
    fn test_add_row_without_page_uses_default_sheet() {
        let mut writer = OdsWriter::new().unwrap();
        writer.add_row(["x"]).unwrap();

        let id = writer.set_page(DEFAULT_SHEET).unwrap();
        assert_eq!(writer.sheet_count(), 1);
        assert_eq!(writer.row_count(id), 1);
    }

    #[test]
    fn test_invalid_cell_is_rejected() {
        let mut writer = OdsWriter::new().unwrap();
        let err = writer.add_row(["fine", "bad\u{0}"]).unwrap_err();
        assert!(matches!(err, OdsError::InvalidCell { column: 1 }));
    }

    #[test]
    fn test_import_skips_malformed_rows() {
        let mut writer = OdsWriter::new().unwrap();
        writer.import(&[
            json!({"title": "ok"}),
            json!({"title": "broken\u{1b}"}),
            json!({"title": "also ok"}),
        ]);

        let id = writer.set_page(DEFAULT_SHEET).unwrap();
        assert_eq!(writer.row_count(id), 2);
    }

    #[test]
    fn test_export_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OdsWriter::with_options(OdsOptions::default().temp_dir(dir.path())).unwrap();
        assert!(writer.path().starts_with(dir.path()));
        assert!(writer.path().exists());

        let bytes = writer.export().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_keeps_file_until_path_dropped() {
        let writer = OdsWriter::new().unwrap();
        let path = writer.save().unwrap();
        let on_disk = path.to_path_buf();
        assert!(on_disk.exists());

        drop(path);
        assert!(!on_disk.exists());
    }

    #[test]
    fn test_missing_temp_dir_fails() {
        let options = OdsOptions::default().temp_dir("/nonexistent/wps-ods");
        assert!(matches!(OdsWriter::with_options(options), Err(OdsError::Io(_))));
    }

    #[test]
    fn test_meta_creator() {
        let mut writer = OdsWriter::with_options(OdsOptions::default().creator("Editor")).unwrap();
        writer.import(&[]);
        let mut archive = open(writer.export().unwrap());
        let meta = read_entry(&mut archive, "meta.xml");
        assert!(meta.contains("<dc:creator>Editor</dc:creator>"));
        assert!(meta.contains("<meta:creation-date>"));
    }

    #[test]
    fn test_row_cells() {
        assert_eq!(row_cells(&json!({"a": 1, "b": null})), vec!["1", ""]);
        assert_eq!(row_cells(&json!(["x", true])), vec!["x", "true"]);
        assert_eq!(row_cells(&json!("line")), vec!["line"]);
    }
}
