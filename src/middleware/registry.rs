use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::core::Middleware;
use crate::error::RouterError;

/// Maps middleware identifiers used by routes and groups to instances.
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    entries: HashMap<String, Arc<dyn Middleware>>,
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("MiddlewareRegistry")
            .field("middleware", &names)
            .finish()
    }
}

impl MiddlewareRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `middleware` under `id`, replacing any previous entry.
    pub fn register<M>(&mut self, id: &str, middleware: M)
    where
        M: Middleware + 'static,
    {
        self.register_arc(id, Arc::new(middleware));
    }

    /// Register a shared instance, e.g. one the caller keeps a handle to for reading metrics.
    pub fn register_arc(&mut self, id: &str, middleware: Arc<dyn Middleware>) {
        if self.entries.insert(id.to_string(), middleware).is_some() {
            warn!(middleware = %id, "Replaced existing middleware registration");
        } else {
            info!(middleware = %id, total_middleware = self.entries.len(), "Middleware registered");
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Middleware>> {
        self.entries.get(id).map(Arc::clone)
    }

    /// Look up every identifier, preserving order.
    ///
    /// # Errors
    ///
    /// [`RouterError::MiddlewareNotFound`] for the first identifier that is not registered.
    pub fn resolve<'s, I>(&self, ids: I) -> Result<Vec<Arc<dyn Middleware>>, RouterError>
    where
        I: IntoIterator<Item = &'s str>,
    {
        ids.into_iter()
            .map(|id| {
                self.get(id).ok_or_else(|| {
                    error!(middleware = %id, "Middleware not registered - CRITICAL");
                    RouterError::MiddlewareNotFound(id.to_string())
                })
            })
            .collect()
    }
}
