//! The inbound request as the router sees it.
//!
//! Wire parsing belongs to the hosting server. By the time a [`Request`]
//! reaches the router its method, path, query string, headers and body are
//! already decoded; the router only reads `method()` and `path()` and fills
//! in the matched route information before the middleware chain runs.

use std::sync::Arc;

use http::Method;
use serde_json::Value;
use smallvec::SmallVec;

use crate::ids::RequestId;
use crate::route::ParamVec;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage. Names are compared case-insensitively.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed through middleware to the handler.
#[derive(Debug, Clone)]
pub struct Request {
    /// Correlation id for log lines belonging to this request
    pub request_id: RequestId,
    method: Method,
    path: String,
    /// Query string parameters, decoded
    pub query_params: ParamVec,
    /// HTTP headers
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
    /// Path parameters bound by the matcher
    pub path_params: ParamVec,
    /// Name of the matched route, if it has one
    pub route_name: Option<String>,
    /// Path template of the matched route (e.g. `/users/{id}`)
    pub route_template: Option<Arc<str>>,
}

impl Request {
    /// Build a request from a method and a request target.
    ///
    /// Anything after `?` in `target` is decoded into [`Request::query_params`].
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        let query_params = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (Arc::<str>::from(k), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            query_params,
            headers: HeaderVec::new(),
            body: None,
            path_params: ParamVec::new(),
            route_name: None,
            route_template: None,
        }
    }

    /// Add a header. An `x-request-id` header also sets [`Request::request_id`].
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if name.eq_ignore_ascii_case("x-request-id") {
            self.request_id = RequestId::from_header_or_new(Some(&value));
        }
        self.headers.push((Arc::from(name.to_ascii_lowercase()), value));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a path parameter bound by the matcher.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name.
    ///
    /// Last write wins: `?limit=10&limit=20` yields `20`.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}
