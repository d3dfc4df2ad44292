//! # Switchyard
//!
//! **Switchyard** is a synchronous HTTP request router: it registers routes
//! against regex-compiled path templates, groups them under shared prefixes
//! and middleware, matches requests first-registered-wins, runs the matched
//! route through an onion-style middleware chain and invokes its handler.
//!
//! It does not speak HTTP on the wire. A server hands it a [`Request`] and
//! receives a [`Response`] or a [`RouterError`].
//!
//! ## Architecture
//!
//! - **[`route`]** - Path templates (`/users/{id:\d+}`), compiled patterns and route metadata
//! - **[`router`]** - Registration, groups, matching and reverse URL generation
//! - **[`middleware`]** - The `Middleware` trait, the pipeline and built-in middleware
//! - **[`dispatcher`]** - Handlers, controllers and parameter binding
//! - **[`manifest`]** - Declaring routes in TOML or YAML files
//! - **[`config`]** - Router settings from the environment or TOML
//! - **[`cli`]** - The `switchyard` inspection tool
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server
//!     participant Router
//!     participant Matcher
//!     participant Pipeline as Middleware Chain
//!     participant Resolver as HandlerResolver
//!     participant Handler
//!
//!     Server->>Router: resolve(Request)
//!     Router->>Matcher: find(method, path)
//!     alt No Route Match
//!         Matcher-->>Router: None
//!         Router-->>Server: Err(RouteNotFound)
//!     end
//!     Matcher-->>Router: RouteMatch (route, path params)
//!     Router->>Pipeline: global + group + route middleware
//!     Pipeline->>Pipeline: before logic, outermost first
//!     Pipeline->>Resolver: terminal continuation
//!     Resolver->>Handler: bound arguments
//!     Handler-->>Pipeline: Response
//!     Pipeline->>Pipeline: after logic, innermost first
//!     Pipeline-->>Server: Response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use http::Method;
//! use switchyard::{GroupAttributes, Handler, Request, Response, Router};
//!
//! let mut router = Router::new();
//! router.register_middleware("stamp", switchyard::middleware::from_fn(|req, next| {
//!     let mut resp = next.run(req)?;
//!     resp.set_header("x-stamped", "1");
//!     Ok(resp)
//! }))
//! .unwrap();
//!
//! router
//!     .group(GroupAttributes::new().prefix("/api").middleware(["stamp"]), |r| {
//!         r.get(r"/posts/{year:\d{4}}/{slug}", Handler::callable(|args| {
//!             Ok(Response::json(200, serde_json::json!({
//!                 "year": args.positional(0),
//!                 "slug": args.positional(1),
//!             })))
//!         }))?
//!         .name("posts.show");
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let resp = router
//!     .resolve(Request::new(Method::GET, "/api/posts/2024/hello"))
//!     .unwrap();
//! assert_eq!(resp.body["slug"], "hello");
//! assert_eq!(resp.get_header("x-stamped"), Some("1"));
//!
//! let params = HashMap::from([("year", "2025"), ("slug", "bye")]);
//! assert_eq!(router.url("posts.show", &params).unwrap(), "/api/posts/2025/bye");
//! ```
//!
//! ## Logging
//!
//! Every layer emits `tracing` events with structured fields. The library
//! never installs a subscriber; the `switchyard` binary does, honouring
//! `RUST_LOG`.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod manifest;
pub mod middleware;
pub mod request;
pub mod response;
pub mod route;
pub mod router;

pub use config::RouterConfig;
pub use dispatcher::{BoundArgs, Controller, ControllerRegistry, Handler, Param, Signature};
pub use error::{HandlerResult, RouterError};
pub use ids::RequestId;
pub use manifest::RouteManifest;
pub use middleware::Middleware;
pub use request::Request;
pub use response::Response;
pub use route::{PathPattern, Route, RouteMatch};
pub use router::{GroupAttributes, Registration, Router};
