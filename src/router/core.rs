use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use http::Method;
use tracing::{debug, error, info, warn};

use super::group::{GroupAttributes, GroupStack};
use super::matcher::{Matcher, ShadowedRoute};
use super::table::RouteTable;
use crate::config::RouterConfig;
use crate::dispatcher::{Controller, ControllerRegistry, Handler, HandlerResolver};
use crate::error::{HandlerResult, RouterError};
use crate::middleware::{Continuation, Middleware, MiddlewareRegistry, Pipeline};
use crate::request::Request;
use crate::response::Response;
use crate::route::{PathPattern, Route, RouteBuilder, RouteMatch};

/// The routing facade.
///
/// Registration (`get`, `post`, `group`, ...) needs `&mut Router`; matching
/// and dispatch need only `&Router`. The first call to
/// [`Router::match_route`] or [`Router::resolve`] seals the router, after
/// which every registration call fails with
/// [`RouterError::RegistrationClosed`]. Sharing the router behind an `Arc`
/// makes the table read-only by construction.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use switchyard::{GroupAttributes, Handler, Request, Response, Router};
///
/// let mut router = Router::new();
/// router
///     .get(r"/users/{id:\d+}", Handler::callable(|args| {
///         Ok(Response::json(200, serde_json::json!({ "id": args.positional(0) })))
///     }))
///     .unwrap()
///     .name("user.show");
/// router
///     .group(GroupAttributes::new().prefix("/admin"), |r| {
///         r.get("/dashboard", Handler::callable(|args| Ok(args.into_response())))?;
///         Ok(())
///     })
///     .unwrap();
///
/// let resp = router.resolve(Request::new(Method::GET, "/users/42")).unwrap();
/// assert_eq!(resp.body["id"], "42");
/// ```
pub struct Router {
    table: RouteTable,
    groups: GroupStack,
    global_middleware: Vec<String>,
    middleware: MiddlewareRegistry,
    resolver: HandlerResolver,
    config: RouterConfig,
    sealed: AtomicBool,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            table: RouteTable::new(),
            groups: GroupStack::new(),
            global_middleware: Vec::new(),
            middleware: MiddlewareRegistry::new(),
            resolver: HandlerResolver::default(),
            config,
            sealed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a GET route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn get(&mut self, path: &str, handler: impl Into<Handler>) -> Result<Registration<'_>, RouterError> {
        self.route(Method::GET, path, handler)
    }

    /// Register a POST route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn post(&mut self, path: &str, handler: impl Into<Handler>) -> Result<Registration<'_>, RouterError> {
        self.route(Method::POST, path, handler)
    }

    /// Register a PUT route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn put(&mut self, path: &str, handler: impl Into<Handler>) -> Result<Registration<'_>, RouterError> {
        self.route(Method::PUT, path, handler)
    }

    /// Register a PATCH route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn patch(&mut self, path: &str, handler: impl Into<Handler>) -> Result<Registration<'_>, RouterError> {
        self.route(Method::PATCH, path, handler)
    }

    /// Register a DELETE route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn delete(&mut self, path: &str, handler: impl Into<Handler>) -> Result<Registration<'_>, RouterError> {
        self.route(Method::DELETE, path, handler)
    }

    /// Register a HEAD route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn head(&mut self, path: &str, handler: impl Into<Handler>) -> Result<Registration<'_>, RouterError> {
        self.route(Method::HEAD, path, handler)
    }

    /// Register a route for `method` inside the current group.
    ///
    /// The template is prefixed with the active group prefix and compiled
    /// immediately. The returned [`Registration`] commits the route when it
    /// is dropped, so `.name()` and `.middleware()` may be chained first.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnsupportedMethod`] for methods other than GET, POST, PUT, PATCH, DELETE, HEAD
    /// - [`RouterError::RegistrationClosed`] once the router has been sealed
    /// - [`RouterError::MalformedRoute`] if the template does not compile
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        handler: impl Into<Handler>,
    ) -> Result<Registration<'_>, RouterError> {
        let supported_methods = [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
        ];
        if !supported_methods.contains(&method) {
            return Err(RouterError::UnsupportedMethod(method));
        }
        self.ensure_open(path)?;

        let template = self.groups.apply(path);
        let pattern = PathPattern::compile(&template)?;
        let builder = RouteBuilder::new(method, pattern, handler.into())
            .middleware(self.groups.inherited_middleware().iter().cloned());

        Ok(Registration {
            table: &mut self.table,
            builder: Some(builder),
        })
    }

    /// Register routes inside a group.
    ///
    /// Routes registered by `body` inherit the group's prefix and middleware
    /// (appended to those of any enclosing group). The group is left when
    /// `body` returns, fails, or panics.
    ///
    /// # Errors
    ///
    /// [`RouterError::RegistrationClosed`] once sealed, or whatever `body` returns.
    pub fn group<F>(&mut self, attributes: GroupAttributes, body: F) -> Result<(), RouterError>
    where
        F: FnOnce(&mut Router) -> Result<(), RouterError>,
    {
        self.ensure_open("<group>")?;
        let depth = self.groups.depth() + 1;
        let ctx = self.groups.push(&attributes);
        debug!(
            prefix = %ctx.prefix,
            middleware = ?ctx.middleware,
            depth,
            "Entering route group"
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(self)));
        self.groups.pop();

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Add a middleware identifier that wraps every route, outside group and
    /// route middleware. Global middleware runs in the order added.
    ///
    /// # Errors
    ///
    /// [`RouterError::RegistrationClosed`] once sealed.
    pub fn wrap(&mut self, id: impl Into<String>) -> Result<(), RouterError> {
        let id = id.into();
        self.ensure_open(&id)?;
        self.global_middleware.push(id);
        Ok(())
    }

    /// # Errors
    ///
    /// [`RouterError::RegistrationClosed`] once sealed.
    pub fn register_middleware<M>(&mut self, id: &str, middleware: M) -> Result<(), RouterError>
    where
        M: Middleware + 'static,
    {
        self.ensure_open(id)?;
        self.middleware.register(id, middleware);
        Ok(())
    }

    /// Register a shared middleware instance.
    ///
    /// # Errors
    ///
    /// [`RouterError::RegistrationClosed`] once sealed.
    pub fn register_middleware_arc(
        &mut self,
        id: &str,
        middleware: Arc<dyn Middleware>,
    ) -> Result<(), RouterError> {
        self.ensure_open(id)?;
        self.middleware.register_arc(id, middleware);
        Ok(())
    }

    /// Register controller `C` under `name`; `C::default()` builds it per request.
    ///
    /// # Errors
    ///
    /// [`RouterError::RegistrationClosed`] once sealed.
    pub fn register_controller<C>(&mut self, name: &str) -> Result<(), RouterError>
    where
        C: Controller + Default + 'static,
    {
        self.ensure_open(name)?;
        self.resolver.controllers_mut().register::<C>(name);
        Ok(())
    }

    /// Direct access to the controller registry, e.g. for `register_with`.
    ///
    /// # Errors
    ///
    /// [`RouterError::RegistrationClosed`] once sealed.
    pub fn controllers_mut(&mut self) -> Result<&mut ControllerRegistry, RouterError> {
        self.ensure_open("<controllers>")?;
        Ok(self.resolver.controllers_mut())
    }

    fn ensure_open(&mut self, target: &str) -> Result<(), RouterError> {
        if *self.sealed.get_mut() {
            error!(target_id = %target, "Registration after the router started serving");
            return Err(RouterError::RegistrationClosed);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Freeze the route table. Called implicitly by the first match.
    pub fn seal(&self) {
        if self.sealed.load(Ordering::Acquire) || self.sealed.swap(true, Ordering::AcqRel) {
            return;
        }
        let routes_summary: Vec<String> = self
            .table
            .iter()
            .take(10)
            .map(|r| format!("{} {}", r.method(), r.template()))
            .collect();
        info!(
            routes_count = self.table.len(),
            routes_summary = ?routes_summary,
            "Routing table sealed"
        );

        if self.config.warn_shadowed_routes {
            for s in self.shadowed_routes() {
                warn!(
                    method = %s.shadowed.method(),
                    shadowed = %s.shadowed.template(),
                    shadowed_by = %s.by.template(),
                    "Route can never match: an earlier route always wins"
                );
            }
        }
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Match `method` and `path` against the table, first registration wins.
    ///
    /// Returns `None` when nothing matches.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        self.seal();
        debug!(method = %method, path = %path, "Route match attempt");

        let match_start = Instant::now();
        let result = Matcher::new(&self.table).find(method, path);
        let match_duration = match_start.elapsed();

        match &result {
            Some(m) => {
                let duration_us = match_duration.as_micros() as u64;
                if duration_us > self.config.slow_match_threshold_us {
                    warn!(
                        method = %method,
                        path = %path,
                        route_pattern = %m.route.template(),
                        duration_us,
                        "Slow route matching detected"
                    );
                } else {
                    debug!(
                        method = %method,
                        path = %path,
                        route_pattern = %m.route.template(),
                        path_params = ?m.path_params,
                        duration_us,
                        "Route matched"
                    );
                }
            }
            None => {
                warn!(
                    method = %method,
                    path = %path,
                    duration_us = match_duration.as_micros() as u64,
                    "No route matched"
                );
            }
        }
        result
    }

    /// Dispatch a request: match, build the middleware chain, invoke the handler.
    ///
    /// # Errors
    ///
    /// - [`RouterError::RouteNotFound`] when no route matches (404-class)
    /// - [`RouterError::MiddlewareNotFound`], [`RouterError::HandlerNotFound`],
    ///   [`RouterError::UnresolvedParameter`] for configuration bugs (500-class)
    /// - any error raised by middleware or the handler
    pub fn resolve(&self, mut request: Request) -> HandlerResult {
        let Some(RouteMatch { route, path_params }) = self.match_route(request.method(), request.path())
        else {
            return Err(RouterError::RouteNotFound {
                method: request.method().clone(),
                path: request.path().to_string(),
            });
        };

        request.path_params = path_params;
        request.route_name = route.name().map(str::to_string);
        request.route_template = Some(Arc::from(route.template()));

        let layers = self.middleware.resolve(
            self.global_middleware
                .iter()
                .chain(route.middleware())
                .map(String::as_str),
        )?;
        debug!(
            request_id = %request.request_id,
            middleware_count = layers.len(),
            "Middleware chain built"
        );

        let resolver = &self.resolver;
        let handler = route.handler();
        let terminal: Continuation<'_> = Box::new(move |req: &mut Request| {
            resolver.resolve(handler, &req.path_params, req, Response::default())
        });
        let chain = Pipeline::build(&layers, terminal);
        chain(&mut request)
    }

    /// Reverse URL generation for a named route.
    ///
    /// Values are substituted verbatim; see [`PathPattern::render`].
    ///
    /// # Errors
    ///
    /// [`RouterError::NamedRouteNotFound`] if no route has this name.
    pub fn url<K, V>(&self, name: &str, params: &HashMap<K, V>) -> Result<String, RouterError>
    where
        K: Borrow<str> + Eq + Hash,
        V: AsRef<str>,
    {
        let route = self.table.named(name).ok_or_else(|| {
            error!(route_name = %name, "Reverse URL requested for unknown route name");
            RouterError::NamedRouteNotFound(name.to_string())
        })?;
        Ok(route.pattern().render(params))
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// All routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.table.iter()
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn named_route(&self, name: &str) -> Option<&Arc<Route>> {
        self.table.named(name)
    }

    /// Literal routes that can never match. See [`Matcher::shadowed`].
    #[must_use]
    pub fn shadowed_routes(&self) -> Vec<ShadowedRoute> {
        Matcher::new(&self.table).shadowed()
    }

    /// Check every route's handler and middleware identifiers up front.
    ///
    /// Dispatch reports the same problems lazily; calling this at startup
    /// turns them into a boot failure instead.
    #[must_use]
    pub fn verify(&self) -> Vec<RouterError> {
        let mut problems = Vec::new();
        for id in &self.global_middleware {
            if !self.middleware.contains(id) {
                problems.push(RouterError::MiddlewareNotFound(id.clone()));
            }
        }
        for route in self.table.iter() {
            if let Err(e) = self.resolver.verify(route.handler()) {
                problems.push(e);
            }
            for id in route.middleware() {
                if !self.middleware.contains(id) {
                    problems.push(RouterError::MiddlewareNotFound(id.clone()));
                }
            }
        }
        problems
    }

    /// One line per route: method, template, handler, middleware, name.
    #[must_use]
    pub fn describe_routes(&self) -> Vec<String> {
        self.table
            .iter()
            .map(|route| {
                let mut line = format!(
                    "{:<7} {} -> {}",
                    route.method().as_str(),
                    route.template(),
                    route.handler().describe()
                );
                if !route.middleware().is_empty() {
                    line.push_str(&format!(" [{}]", route.middleware().join(", ")));
                }
                if let Some(name) = route.name() {
                    line.push_str(&format!(" ({name})"));
                }
                line
            })
            .collect()
    }
}

/// A route being registered.
///
/// Chain [`Registration::name`] and [`Registration::middleware`]; the route
/// is built and committed to the table when this value is dropped or when
/// [`Registration::finish`] is called.
pub struct Registration<'r> {
    table: &'r mut RouteTable,
    builder: Option<RouteBuilder>,
}

impl<'r> Registration<'r> {
    /// Name the route for reverse URL generation.
    ///
    /// Reusing a name re-points it at this route.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.builder = self.builder.take().map(|b| b.name(name));
        self
    }

    /// Append route-specific middleware after the inherited group middleware.
    pub fn middleware<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builder = self.builder.take().map(|b| b.middleware(ids));
        self
    }

    /// Commit now and return the stored route.
    #[allow(clippy::expect_used)]
    pub fn finish(mut self) -> Arc<Route> {
        let builder = self
            .builder
            .take()
            .expect("a registration is committed exactly once");
        self.table.insert(builder.build())
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if let Some(builder) = self.builder.take() {
            self.table.insert(builder.build());
        }
    }
}
