//! Attachment responses

use http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Response};
use std::path::Path;

use crate::format::ExportFormat;

/// A rendered export ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct Download {
    filename: String,
    content_type: String,
    body: Vec<u8>,
}

impl Download {
    pub(crate) fn new(filename: &str, format: &ExportFormat, body: Vec<u8>) -> Self {
        // Header values cannot carry control characters or quotes.
        let mut filename: String = filename
            .chars()
            .filter(|c| !c.is_control() && *c != '"')
            .collect();
        if Path::new(&filename).extension().is_none() && !format.extension().is_empty() {
            filename.push('.');
            filename.push_str(format.extension());
        }

        Self {
            filename,
            content_type: format.mime_type(),
            body,
        }
    }

    /// Attachment name, extension included
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// `Content-Disposition` value
    pub fn disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }

    /// Build the HTTP response
    pub fn into_http_response(self) -> Response<Vec<u8>> {
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
        let disposition = HeaderValue::from_str(&self.disposition())
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
        let length = HeaderValue::from(self.body.len());

        let mut response = Response::new(self.body);
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, content_type);
        headers.insert(CONTENT_DISPOSITION, disposition);
        headers.insert(CONTENT_LENGTH, length);
        response
    }
}

impl From<Download> for Response<Vec<u8>> {
    fn from(download: Download) -> Self {
        download.into_http_response()
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Download {
    fn into_response(self) -> axum::response::Response {
        let (parts, body) = self.into_http_response().into_parts();
        axum::response::Response::from_parts(parts, axum::body::Body::from(body))
    }
}
