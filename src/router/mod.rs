//! # Router Module
//!
//! The router module registers routes, matches incoming requests against
//! them and dispatches matched requests through their middleware chain to
//! the handler.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling path templates such as `/users/{id:\d+}` at registration time
//! - Applying group prefixes and group middleware to routes registered inside a group
//! - Matching requests first-registered-wins per HTTP method
//! - Extracting path parameters and generating URLs for named routes
//!
//! ## Lifecycle
//!
//! The router has two phases:
//!
//! 1. **Registration**: `get`, `post`, `group` and friends take `&mut Router`.
//!    Templates are compiled immediately, so a malformed route fails here.
//!
//! 2. **Serving**: the first `match_route` or `resolve` seals the table.
//!    From then on every registration call returns
//!    [`RouterError::RegistrationClosed`](crate::RouterError::RegistrationClosed).
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use switchyard::{GroupAttributes, Handler, Router};
//!
//! let mut router = Router::new();
//! router
//!     .group(GroupAttributes::new().prefix("/api/v1"), |r| {
//!         r.get("/users/{id}", Handler::callable(|args| Ok(args.into_response())))?
//!             .name("users.show");
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let m = router.match_route(&Method::GET, "/api/v1/users/7").unwrap();
//! assert_eq!(m.get_path_param("id"), Some("7"));
//! ```
//!
//! ## Matching
//!
//! Candidates are tried in registration order and the first hit wins. There
//! is no specificity ranking: register literal routes such as `/users/new`
//! before `/users/{id}`. Routes that can never match are reported by
//! [`Router::shadowed_routes`] and logged when the router seals.

mod core;
mod group;
mod matcher;
mod table;

pub use self::core::{Registration, Router};
pub use group::{join_paths, GroupAttributes, GroupContext, GroupStack};
pub use matcher::{Matcher, ShadowedRoute};
pub use table::RouteTable;
