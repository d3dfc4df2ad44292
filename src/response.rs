use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::RouterError;
use crate::request::HeaderVec;

/// Response produced by a handler or a short-circuiting middleware.
///
/// The router passes it back to its caller untouched; only middleware and
/// handlers look inside.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl Default for Response {
    /// An empty `200 OK`, handed to handlers as the live response object.
    fn default() -> Self {
        Self::new(200, HeaderVec::new(), Value::Null)
    }
}

impl Response {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a `content-type` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self::new(status, headers, body)
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Translate a router failure into a response for the hosting layer.
    ///
    /// Only not-found outcomes keep their message; every 500-class failure is
    /// rendered generically so configuration details never leak to clients.
    #[must_use]
    pub fn from_error(err: &RouterError) -> Self {
        let status = err.status_code();
        if err.is_not_found() {
            Self::error(status, "Not Found")
        } else {
            Self::error(status, "Internal Server Error")
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }
}
