//! HTTP transport types.
//!
//! # Design
//! Requests and responses are plain data. The endpoint wrappers build an
//! `HttpRequest`, a `Transport` executes it, and the client decodes the
//! resulting `HttpResponse`. Keeping the I/O behind this boundary means every
//! request builder can be tested without a network.
//!
//! Response bodies are bytes: thumbnails, zips, and text downloads are passed
//! through untouched, and only JSON endpoints ever parse them.

use std::path::{Path, PathBuf};

use crate::params::Params;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// One file in a multipart upload.
///
/// The source is opened by the transport when the request is sent and closed
/// as soon as the request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name.
    pub field: String,
    /// Local file to stream into the body.
    pub source: PathBuf,
    /// File name reported to the server.
    pub filename: String,
}

impl FilePart {
    /// A part named `file` whose remote name is the source's base name.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let filename = base_name(&source);
        Self {
            field: "file".to_string(),
            source,
            filename,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Raw bytes sent as `application/octet-stream`.
    Bytes(Vec<u8>),
    /// `multipart/form-data` built from local files.
    Multipart(Vec<FilePart>),
}

/// An API call described as plain data.
///
/// `endpoint` is the bare method name (`listfolder`, `getthumb`, ...); the
/// transport joins it with its configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    pub params: Params,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn get(endpoint: &str, params: Params) -> Self {
        Self {
            method: HttpMethod::Get,
            endpoint: endpoint.to_string(),
            params,
            body: RequestBody::Empty,
        }
    }

    pub fn multipart(endpoint: &str, params: Params, files: Vec<FilePart>) -> Self {
        Self {
            method: HttpMethod::Post,
            endpoint: endpoint.to_string(),
            params,
            body: RequestBody::Multipart(files),
        }
    }

    pub fn put_bytes(endpoint: &str, params: Params, data: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Put,
            endpoint: endpoint.to_string(),
            params,
            body: RequestBody::Bytes(data),
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_part_defaults_to_base_name() {
        let part = FilePart::new("/tmp/photos/cat.jpg");
        assert_eq!(part.field, "file");
        assert_eq!(part.filename, "cat.jpg");

        let part = part.with_field("upload").with_filename("kitten.jpg");
        assert_eq!(part.field, "upload");
        assert_eq!(part.filename, "kitten.jpg");
        assert_eq!(part.source, PathBuf::from("/tmp/photos/cat.jpg"));
    }

    #[test]
    fn response_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut resp = HttpResponse::new(200, "");
        resp.headers
            .push(("Content-Type".to_string(), "image/png".to_string()));
        assert_eq!(resp.header("content-type"), Some("image/png"));
        assert_eq!(resp.header("x-missing"), None);
    }

    #[test]
    fn text_is_lossy() {
        let resp = HttpResponse::new(200, vec![b'o', b'k', 0xff]);
        assert_eq!(resp.text(), "ok\u{fffd}");
    }
}
