//! # Route Module
//!
//! A [`Route`] binds an HTTP method and a compiled [`PathPattern`] to a
//! [`Handler`], with an optional name for reverse URL generation and an
//! ordered list of middleware identifiers.
//!
//! Routes are assembled by a [`RouteBuilder`] and are immutable once built.
//! The router hands them out as `Arc<Route>` so that the table, the named
//! index and every [`RouteMatch`] share one allocation.

pub mod pattern;

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use smallvec::SmallVec;

use crate::dispatcher::Handler;
use crate::error::RouterError;

pub use pattern::{normalize_path, PathPattern, DEFAULT_CONSTRAINT};

/// Maximum number of path/query parameters before heap allocation.
/// Most routes have ≤4 path params (e.g., /users/{id}/posts/{post_id}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage used on the request path.
///
/// Names are `Arc<str>` shared with the compiled pattern; values are the
/// per-request strings taken from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// One registered route.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
    name: Option<String>,
    middleware: Vec<String>,
}

impl Route {
    /// Compile `template` and start building a route.
    ///
    /// # Errors
    ///
    /// [`RouterError::MalformedRoute`] if the template does not compile.
    pub fn builder(
        method: Method,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<RouteBuilder, RouterError> {
        let pattern = PathPattern::compile(template)?;
        Ok(RouteBuilder::new(method, pattern, handler.into()))
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Effective path template, group prefixes included.
    #[must_use]
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Middleware identifiers, outermost first.
    #[must_use]
    pub fn middleware(&self) -> &[String] {
        &self.middleware
    }
}

/// Builder producing an immutable [`Route`].
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
    name: Option<String>,
    middleware: Vec<String>,
}

impl RouteBuilder {
    #[must_use]
    pub fn new(method: Method, pattern: PathPattern, handler: Handler) -> Self {
        Self {
            method,
            pattern,
            handler,
            name: None,
            middleware: Vec::new(),
        }
    }

    /// Set the route name used by reverse URL generation.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append middleware identifiers after any already present.
    #[must_use]
    pub fn middleware<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn build(self) -> Route {
        Route {
            method: self.method,
            pattern: self.pattern,
            handler: self.handler,
            name: self.name,
            middleware: self.middleware,
        }
    }
}

/// Result of successfully matching a request path to a route.
///
/// Lives for one request only.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route, shared with the route table
    pub route: Arc<Route>,
    /// Path parameters in template order (e.g. `{id}` → `("id", "123")`)
    pub path_params: ParamVec,
}

impl RouteMatch {
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_params to a HashMap.
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}
