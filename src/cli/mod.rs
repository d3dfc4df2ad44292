//! # CLI Module
//!
//! Command-line tooling for inspecting a route manifest without running a
//! server.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the route table in registration order, followed by any literal
//! routes that can never match:
//!
//! ```bash
//! switchyard routes --manifest routes.toml
//! ```
//!
//! ### `match`
//!
//! Show which route a request would hit and the parameters it extracts:
//!
//! ```bash
//! switchyard match GET /users/42 --manifest routes.toml
//! ```
//!
//! ### `url`
//!
//! Generate the URL for a named route:
//!
//! ```bash
//! switchyard url users.show id=42 --manifest routes.toml
//! ```
//!
//! ## Global Options
//!
//! - `--config <FILE>` - Router settings in TOML (default: from environment)
//! - `--json` - Emit logs as JSON lines

mod commands;

pub use commands::{run_cli, Cli, Commands};
