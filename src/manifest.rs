//! # Route Manifests
//!
//! Routes can be declared in a TOML or YAML file instead of code. Entries are
//! registered in file order, so first-match-wins applies exactly as it does
//! for routes registered programmatically.
//!
//! Handlers in a manifest are always `Controller@action` references; the
//! controllers themselves are registered in code.
//!
//! ```toml
//! [[routes]]
//! method = "GET"
//! path = "/"
//! handler = "HomeController@index"
//! name = "home"
//!
//! [[routes]]
//! prefix = "/admin"
//! middleware = ["auth"]
//!
//!   [[routes.routes]]
//!   method = "GET"
//!   path = "/users/{id:\\d+}"
//!   handler = "AdminController@show"
//!   name = "admin.users.show"
//! ```
//!
//! The same document in YAML:
//!
//! ```yaml
//! routes:
//!   - method: GET
//!     path: /
//!     handler: HomeController@index
//!     name: home
//!   - prefix: /admin
//!     middleware: [auth]
//!     routes:
//!       - method: GET
//!         path: '/users/{id:\d+}'
//!         handler: AdminController@show
//!         name: admin.users.show
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use http::Method;
use serde::Deserialize;
use tracing::info;

use crate::dispatcher::Handler;
use crate::error::RouterError;
use crate::router::{GroupAttributes, Router};

/// A parsed manifest file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub routes: Vec<ManifestEntry>,
}

/// One entry: a route, or a group of nested entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ManifestEntry {
    Route(RouteEntry),
    Group(GroupEntry),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
    pub handler: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub middleware: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupEntry {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub middleware: Vec<String>,
    pub routes: Vec<ManifestEntry>,
}

impl RouteManifest {
    /// Load a manifest, choosing the format by extension.
    ///
    /// `.yaml`/`.yml` are read as YAML, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route manifest {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let manifest = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .with_context(|| format!("failed to parse route manifest {}", path.display()))?;

        info!(
            manifest = %path.display(),
            entries = manifest.routes.len(),
            "Route manifest loaded"
        );
        Ok(manifest)
    }

    /// # Errors
    ///
    /// Fails if `text` is not a valid TOML manifest.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid TOML route manifest")
    }

    /// # Errors
    ///
    /// Fails if `text` is not a valid YAML manifest.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid YAML route manifest")
    }

    /// Register every entry on `router` and return the number of routes added.
    ///
    /// # Errors
    ///
    /// Fails on an unknown method, a malformed path or handler reference,
    /// or a sealed router. Routes registered before the failing entry stay
    /// registered.
    pub fn register(&self, router: &mut Router) -> Result<usize> {
        let mut count = 0;
        register_entries(router, &self.routes, &mut count)
            .context("failed to register routes from manifest")?;
        info!(routes_registered = count, "Manifest routes registered");
        Ok(count)
    }
}

fn register_entries(
    router: &mut Router,
    entries: &[ManifestEntry],
    count: &mut usize,
) -> Result<(), RouterError> {
    for entry in entries {
        match entry {
            ManifestEntry::Route(route) => {
                register_route(router, route)?;
                *count += 1;
            }
            ManifestEntry::Group(group) => {
                let mut attributes = GroupAttributes::new().middleware(group.middleware.iter().cloned());
                if let Some(prefix) = &group.prefix {
                    attributes = attributes.prefix(prefix.clone());
                }
                router.group(attributes, |r| register_entries(r, &group.routes, count))?;
            }
        }
    }
    Ok(())
}

fn register_route(router: &mut Router, entry: &RouteEntry) -> Result<(), RouterError> {
    let method = Method::from_bytes(entry.method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| RouterError::malformed(&entry.path, format!("invalid method '{}'", entry.method)))?;
    let handler = Handler::action(&entry.handler)?;

    let mut registration = router
        .route(method, &entry.path, handler)?
        .middleware(entry.middleware.iter().cloned());
    if let Some(name) = &entry.name {
        registration = registration.name(name.clone());
    }
    registration.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_entries() {
        let manifest = RouteManifest::from_toml_str(
            r#"
            [[routes]]
            method = "get"
            path = "/health"
            handler = "HealthController@show"

            [[routes]]
            prefix = "/api"
            routes = []
            "#,
        )
        .unwrap();
        assert!(matches!(manifest.routes[0], ManifestEntry::Route(_)));
        assert!(matches!(manifest.routes[1], ManifestEntry::Group(_)));
    }

    #[test]
    fn test_invalid_method_rejected() {
        let manifest = RouteManifest::from_yaml_str(
            "routes:\n  - method: 'GE T'\n    path: /x\n    handler: A@b\n",
        )
        .unwrap();
        let mut router = Router::new();
        assert!(manifest.register(&mut router).is_err());
        assert_eq!(router.route_count(), 0);
    }
}
