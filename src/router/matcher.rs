use std::sync::Arc;

use http::Method;

use super::table::RouteTable;
use crate::route::{normalize_path, Route, RouteMatch};

/// First-match-wins lookup over a [`RouteTable`].
///
/// There is no specificity ranking: a literal `/users/new` registered after
/// `/users/{id}` is never reached, because the parameterized route also
/// matches `new`. [`Matcher::shadowed`] reports such routes.
pub struct Matcher<'t> {
    table: &'t RouteTable,
}

/// A route that can never match because an earlier one always wins.
#[derive(Debug, Clone)]
pub struct ShadowedRoute {
    pub shadowed: Arc<Route>,
    pub by: Arc<Route>,
}

impl<'t> Matcher<'t> {
    #[must_use]
    pub fn new(table: &'t RouteTable) -> Self {
        Self { table }
    }

    /// Find the first route registered for `method` whose pattern matches `path`.
    ///
    /// `None` is the not-found outcome.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let path = normalize_path(path);
        self.table.routes_for(method).iter().find_map(|route| {
            route.pattern().captures(path).map(|path_params| RouteMatch {
                route: Arc::clone(route),
                path_params,
            })
        })
    }

    /// Literal routes that an earlier route on the same method already matches,
    /// in registration order.
    ///
    /// Parameterized routes are not checked: whether they are reachable
    /// depends on the values a client sends.
    #[must_use]
    pub fn shadowed(&self) -> Vec<ShadowedRoute> {
        self.table
            .iter()
            .filter(|route| route.pattern().is_literal())
            .filter_map(|route| {
                let siblings = self.table.routes_for(route.method());
                let idx = siblings.iter().position(|r| Arc::ptr_eq(r, route))?;
                siblings[..idx]
                    .iter()
                    .find(|earlier| earlier.pattern().matches(route.template()))
                    .map(|earlier| ShadowedRoute {
                        shadowed: Arc::clone(route),
                        by: Arc::clone(earlier),
                    })
            })
            .collect()
    }
}
