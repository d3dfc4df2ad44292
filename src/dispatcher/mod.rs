//! # Dispatcher Module
//!
//! The dispatcher turns a matched route's handler reference into a call.
//!
//! ## Handlers
//!
//! A [`Handler`] is either a callable or a `Controller@action` pair:
//!
//! ```rust
//! use switchyard::dispatcher::{Handler, Param, Signature};
//! use switchyard::Response;
//!
//! // Request, response, then path parameters positionally
//! let plain = Handler::callable(|args| Ok(args.into_response()));
//!
//! // Parameters bound by name, with a default
//! let named = Handler::callable_with(
//!     Signature::new()
//!         .param(Param::request("req"))
//!         .param(Param::value("id"))
//!         .param(Param::value("page").with_default("1")),
//!     |args| Ok(Response::json(200, serde_json::json!({ "id": args.value("id") }))),
//! );
//!
//! // Resolved through the ControllerRegistry at dispatch time
//! let action = Handler::action("UserController@show").unwrap();
//! # let _ = (plain, named, action);
//! ```
//!
//! ## Parameter Binding
//!
//! For each declared parameter, in order:
//!
//! 1. `Request` / `Response` kinds receive the live objects
//! 2. `Value` kinds receive the path parameter with the same name
//! 3. otherwise the declared default
//! 4. otherwise [`RouterError::UnresolvedParameter`](crate::RouterError::UnresolvedParameter)
//!
//! ## Error Handling
//!
//! Unknown controllers and actions yield
//! [`RouterError::HandlerNotFound`](crate::RouterError::HandlerNotFound), a
//! 500-class configuration error. Errors returned by handlers propagate
//! unchanged.

mod controller;
mod core;
mod handler;

pub use controller::{Controller, ControllerRegistry};
pub use self::core::HandlerResolver;
pub use handler::{
    Argument, BoundArgs, CallableHandler, ControllerAction, Handler, HandlerFn, Param, ParamKind,
    Signature,
};
