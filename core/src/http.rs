//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network. The host (the mobile shell, or `ureq` in tests)
//! executes the actual I/O and honours `timeout_ms`.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross FFI
//! boundaries without lifetime concerns.

/// HTTP method for a request. The board API only reads and creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Request payload.
///
/// `Json` bodies are produced by the client's serializer. `Raw` bodies
/// (multipart forms, binary uploads) are forwarded byte-for-byte with the
/// content type the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Json(String),
    Raw { content_type: String, bytes: Vec<u8> },
}

impl RequestBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RequestBody::Json(s) => s.as_bytes(),
            RequestBody::Raw { bytes, .. } => bytes,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            RequestBody::Json(_) => "application/json",
            RequestBody::Raw { content_type, .. } => content_type,
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `BoardClient::build_*` methods. `url` is absolute. Header names
/// are lower-case.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    /// First header value with the given (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed
/// to `BoardClient::parse_*` or `ScreenController::complete`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
