//! # Router Configuration
//!
//! Runtime knobs for the router, loaded from environment variables or TOML.
//!
//! ## Environment Variables
//!
//! ### `SWITCHYARD_WARN_SHADOWED`
//!
//! When `true` (the default), the router logs a warning for every literal
//! route that can never match because an earlier route on the same method
//! already matches its path. Set to `false`, `0` or `off` to silence it.
//!
//! ### `SWITCHYARD_SLOW_MATCH_US`
//!
//! Route lookups slower than this many microseconds are logged at `warn`.
//! Accepts decimal (`1000`) or hexadecimal (`0x3e8`). Default: `1000`.
//!
//! ## TOML
//!
//! ```toml
//! warn_shadowed_routes = false
//! slow_match_threshold_us = 250
//! ```

use std::env;

use serde::Deserialize;

const DEFAULT_SLOW_MATCH_US: u64 = 1_000;

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Log shadowed literal routes when the router seals
    pub warn_shadowed_routes: bool,
    /// Threshold above which a route lookup is logged as slow
    pub slow_match_threshold_us: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            warn_shadowed_routes: true,
            slow_match_threshold_us: DEFAULT_SLOW_MATCH_US,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document is not valid.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let warn_shadowed_routes = lookup("SWITCHYARD_WARN_SHADOWED")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "off" | "no"))
            .unwrap_or(defaults.warn_shadowed_routes);
        let slow_match_threshold_us = lookup("SWITCHYARD_SLOW_MATCH_US")
            .and_then(|v| parse_number(v.trim()))
            .unwrap_or(defaults.slow_match_threshold_us);
        Self {
            warn_shadowed_routes,
            slow_match_threshold_us,
        }
    }
}

fn parse_number(val: &str) -> Option<u64> {
    if let Some(hex) = val.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
