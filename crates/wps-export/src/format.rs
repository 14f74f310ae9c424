//! Export format tags

use std::fmt;

/// Output format selected by a tag
///
/// Unknown tags are kept as [`ExportFormat::Other`]: they render nothing but
/// still drive the MIME type and extension of a download.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Xml,
    /// Rust-native binary encoding (bincode)
    Serialized,
    /// `var_export`-style array literal
    PhpArray,
    Ods,
    Other(String),
}

impl ExportFormat {
    /// Parse a format tag; matching is case-insensitive
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "csv" => Self::Csv,
            "json" => Self::Json,
            "xml" => Self::Xml,
            "serialized" => Self::Serialized,
            "php_array" => Self::PhpArray,
            "ods" => Self::Ods,
            other => Self::Other(other.to_string()),
        }
    }

    /// Tag as passed to [`ExportFormat::parse`]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Serialized => "serialized",
            Self::PhpArray => "php_array",
            Self::Ods => "ods",
            Self::Other(tag) => tag,
        }
    }

    /// Whether `prepare` produces output for this format
    pub fn is_renderable(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// MIME type sent with a download
    pub fn mime_type(&self) -> String {
        match self {
            Self::PhpArray | Self::Serialized => "text/txt".to_string(),
            Self::Ods => "application/vnd.oasis.opendocument.spreadsheet".to_string(),
            Self::Other(tag) if tag == "zip" => "application/zip".to_string(),
            Self::Other(tag) if tag == "xlsx" => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string()
            }
            other => format!("text/{}", other.as_str()),
        }
    }

    /// File extension appended to a download name that has none
    pub fn extension(&self) -> &str {
        match self {
            Self::PhpArray | Self::Serialized => "txt",
            other => other.as_str(),
        }
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ExportFormat {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}
