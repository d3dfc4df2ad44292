use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{HandlerResult, RouterError};
use crate::request::Request;
use crate::response::Response;

/// Signature of a plain callable handler.
pub type HandlerFn = dyn Fn(BoundArgs<'_>) -> HandlerResult + Send + Sync;

/// What a route invokes once it matches.
#[derive(Clone)]
pub enum Handler {
    /// A closure or function, optionally with a declared [`Signature`]
    Callable(CallableHandler),
    /// A `Controller@action` pair resolved through the controller registry
    Action(ControllerAction),
}

impl Handler {
    /// Wrap a closure that takes the request, the response, then every path
    /// parameter positionally in template order.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(BoundArgs<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Callable(CallableHandler {
            signature: None,
            func: Arc::new(f),
        })
    }

    /// Wrap a closure whose arguments are bound by name from `signature`.
    pub fn callable_with<F>(signature: Signature, f: F) -> Self
    where
        F: Fn(BoundArgs<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Callable(CallableHandler {
            signature: Some(signature),
            func: Arc::new(f),
        })
    }

    /// Parse a `Controller@action` identifier.
    ///
    /// # Errors
    ///
    /// [`RouterError::MalformedHandler`] unless the identifier has exactly one
    /// `@` with non-empty text on both sides.
    pub fn action(identifier: &str) -> Result<Self, RouterError> {
        identifier.parse::<ControllerAction>().map(Handler::Action)
    }

    /// Human-readable identifier used in logs and errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Handler::Callable(_) => "<callable>".to_string(),
            Handler::Action(action) => action.to_string(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Callable(c) => f
                .debug_struct("Callable")
                .field("signature", &c.signature)
                .finish_non_exhaustive(),
            Handler::Action(a) => f.debug_tuple("Action").field(a).finish(),
        }
    }
}

impl From<ControllerAction> for Handler {
    fn from(action: ControllerAction) -> Self {
        Handler::Action(action)
    }
}

impl From<CallableHandler> for Handler {
    fn from(callable: CallableHandler) -> Self {
        Handler::Callable(callable)
    }
}

/// A callable handler and its optional declared parameters.
#[derive(Clone)]
pub struct CallableHandler {
    pub(crate) signature: Option<Signature>,
    pub(crate) func: Arc<HandlerFn>,
}

impl CallableHandler {
    pub(crate) fn call(&self, args: BoundArgs<'_>) -> HandlerResult {
        (self.func)(args)
    }
}

/// A `Controller@action` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerAction {
    pub controller: String,
    pub action: String,
}

impl ControllerAction {
    #[must_use]
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }
}

impl FromStr for ControllerAction {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((controller, action))
                if !controller.is_empty() && !action.is_empty() && !action.contains('@') =>
            {
                Ok(ControllerAction::new(controller, action))
            }
            _ => Err(RouterError::MalformedHandler(s.to_string())),
        }
    }
}

impl fmt::Display for ControllerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.controller, self.action)
    }
}

/// How a declared handler parameter gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Receives the live [`Request`]
    Request,
    /// Receives the live [`Response`]
    Response,
    /// Receives the path parameter of the same name, or the default
    Value,
}

/// One declared formal parameter of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<String>,
}

impl Param {
    #[must_use]
    pub fn request(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Request,
            default: None,
        }
    }

    #[must_use]
    pub fn response(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Response,
            default: None,
        }
    }

    #[must_use]
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Value,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Ordered formal parameters of a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

impl FromIterator<Param> for Signature {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

/// A bound argument, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Request,
    Response,
    Value { name: String, value: String },
}

/// Arguments handed to a handler invocation.
///
/// Holds the live request and response alongside the bound values so a
/// handler can read whichever its signature asked for.
#[derive(Debug)]
pub struct BoundArgs<'a> {
    request: &'a Request,
    response: Response,
    arguments: Vec<Argument>,
}

impl<'a> BoundArgs<'a> {
    pub(crate) fn new(request: &'a Request, response: Response, arguments: Vec<Argument>) -> Self {
        Self {
            request,
            response,
            arguments,
        }
    }

    #[must_use]
    pub fn request(&self) -> &'a Request {
        self.request
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Consume the arguments and return the live response.
    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }

    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Bound value of the parameter called `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.arguments.iter().find_map(|arg| match arg {
            Argument::Value { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Bound values in order, skipping request and response slots.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().filter_map(|arg| match arg {
            Argument::Value { value, .. } => Some(value.as_str()),
            _ => None,
        })
    }

    /// The `index`-th bound value.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.values().nth(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_controller_action() {
        let action: ControllerAction = "UserController@show".parse().unwrap();
        assert_eq!(action.controller, "UserController");
        assert_eq!(action.action, "show");
        assert_eq!(action.to_string(), "UserController@show");
    }

    #[test]
    fn test_reject_malformed_identifiers() {
        for bad in ["UserController", "@show", "UserController@", "A@b@c", ""] {
            assert!(
                matches!(Handler::action(bad), Err(RouterError::MalformedHandler(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_signature_collects_params() {
        let sig: Signature = [Param::request("req"), Param::value("page").with_default("1")]
            .into_iter()
            .collect();
        assert_eq!(sig.params().len(), 2);
        assert_eq!(sig.params()[1].default.as_deref(), Some("1"));
    }
}
