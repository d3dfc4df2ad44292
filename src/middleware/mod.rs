//! # Middleware Module
//!
//! Middleware wraps a route's handler. Each layer receives the request and a
//! [`Next`] continuation; the layers nest like an onion, so for a route with
//! middleware `[m1, m2]` the order is:
//!
//! ```text
//! m1 before → m2 before → handler → m2 after → m1 after
//! ```
//!
//! Routes refer to middleware by identifier. Identifiers are resolved through
//! a [`MiddlewareRegistry`] when a request is dispatched, and the resolved
//! layers are folded into a single continuation by [`Pipeline::build`].

mod auth;
mod core;
mod metrics;
mod pipeline;
mod registry;
mod tracing;

pub use self::core::{from_fn, Continuation, FnMiddleware, Middleware, Next};
pub use auth::AuthMiddleware;
pub use metrics::MetricsMiddleware;
pub use pipeline::Pipeline;
pub use registry::MiddlewareRegistry;
pub use self::tracing::TracingMiddleware;
