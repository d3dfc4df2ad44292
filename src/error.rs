//! Error taxonomy for registration, matching and dispatch.
//!
//! The router never converts a failure into a response on its own. Every
//! variant propagates to the caller of [`Router::resolve`](crate::router::Router::resolve),
//! which decides how to render it. [`RouterError::status_code`] gives the
//! conventional HTTP status for each kind, and
//! [`Response::from_error`](crate::response::Response::from_error) builds a
//! JSON error body from it.

use http::Method;
use thiserror::Error;

/// Result type returned by handlers, middleware and the pipeline.
pub type HandlerResult = Result<crate::response::Response, RouterError>;

/// Every failure the router can surface.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A path template could not be compiled (bad parameter name, unbalanced
    /// braces, duplicate parameter, invalid constraint).
    #[error("malformed route template '{template}': {reason}")]
    MalformedRoute { template: String, reason: String },

    /// A handler identifier is not of the form `Controller@action`.
    #[error("malformed handler identifier '{0}': expected 'Controller@action'")]
    MalformedHandler(String),

    /// Routes may only be registered for GET, POST, PUT, PATCH, DELETE and HEAD.
    #[error("unsupported method {0} for route registration")]
    UnsupportedMethod(Method),

    /// A registration call arrived after the router started serving requests.
    #[error("route registration is closed: the router has already served a request")]
    RegistrationClosed,

    /// No registered route matches the request.
    #[error("no route matches {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// `url()` was called with a name that no route carries.
    #[error("no route is named '{0}'")]
    NamedRouteNotFound(String),

    /// A `Controller@action` handler does not resolve to an existing action.
    #[error("handler {controller}@{action} not found")]
    HandlerNotFound { controller: String, action: String },

    /// A declared handler parameter could not be bound.
    #[error("cannot bind parameter '{param}' of handler {handler}")]
    UnresolvedParameter { handler: String, param: String },

    /// A route references a middleware identifier nobody registered.
    #[error("middleware '{0}' is not registered")]
    MiddlewareNotFound(String),

    /// A handler or middleware failed.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl RouterError {
    pub(crate) fn malformed(template: &str, reason: impl Into<String>) -> Self {
        RouterError::MalformedRoute {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status conventionally associated with this failure.
    ///
    /// Only [`RouterError::RouteNotFound`] is a client-facing 404; everything
    /// else indicates a configuration bug or a failing handler and maps to 500.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RouterError::RouteNotFound { .. } => 404,
            _ => 500,
        }
    }

    /// True when the error is the dispatch-time not-found outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::RouteNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = RouterError::RouteNotFound {
            method: Method::GET,
            path: "/missing".into(),
        };
        assert_eq!(not_found.status_code(), 404);
        assert!(not_found.is_not_found());

        let missing_action = RouterError::HandlerNotFound {
            controller: "UserController".into(),
            action: "show".into(),
        };
        assert_eq!(missing_action.status_code(), 500);
        assert_eq!(missing_action.to_string(), "handler UserController@show not found");
    }

    #[test]
    fn test_failed_is_transparent() {
        let err: RouterError = anyhow::anyhow!("database unavailable").into();
        assert_eq!(err.to_string(), "database unavailable");
        assert_eq!(err.status_code(), 500);
    }
}
