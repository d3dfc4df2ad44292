use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use tracing::{debug, warn};

use crate::route::Route;

/// Every registered route, by method, in registration order.
///
/// Also holds the named-route index used for reverse URL generation. A name
/// registered twice points at the later route.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    by_method: HashMap<Method, Vec<Arc<Route>>>,
    ordered: Vec<Arc<Route>>,
    named: HashMap<String, Arc<Route>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route and index its name.
    pub fn insert(&mut self, route: Route) -> Arc<Route> {
        let route = Arc::new(route);
        if let Some(name) = route.name() {
            if let Some(previous) = self.named.insert(name.to_string(), Arc::clone(&route)) {
                warn!(
                    route_name = %name,
                    previous = %previous.template(),
                    replacement = %route.template(),
                    "Duplicate route name - later registration wins"
                );
            }
        }
        self.by_method
            .entry(route.method().clone())
            .or_default()
            .push(Arc::clone(&route));
        self.ordered.push(Arc::clone(&route));

        debug!(
            method = %route.method(),
            template = %route.template(),
            handler = %route.handler().describe(),
            middleware = ?route.middleware(),
            route_name = route.name().unwrap_or(""),
            "Route registered"
        );
        route
    }

    /// Routes for `method`, in registration order.
    #[must_use]
    pub fn routes_for(&self, method: &Method) -> &[Arc<Route>] {
        self.by_method.get(method).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Arc<Route>> {
        self.named.get(name)
    }

    /// All routes across methods, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.ordered.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
