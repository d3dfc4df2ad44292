use crate::error::HandlerResult;
use crate::request::Request;

/// The rest of the chain, as seen from one middleware.
pub type Continuation<'a> = Box<dyn FnOnce(&mut Request) -> HandlerResult + 'a>;

/// Continuation handed to [`Middleware::handle`].
///
/// Calling [`Next::run`] executes every inner middleware and the handler and
/// returns their response. Dropping it without calling `run` short-circuits
/// the chain.
pub struct Next<'a> {
    inner: Continuation<'a>,
}

impl<'a> Next<'a> {
    #[must_use]
    pub fn new(inner: Continuation<'a>) -> Self {
        Self { inner }
    }

    /// Run the remainder of the chain.
    pub fn run(self, request: &mut Request) -> HandlerResult {
        (self.inner)(request)
    }
}

/// Request-processing logic wrapped around a handler.
///
/// Code before `next.run(..)` executes on the way in, code after it on the
/// way out. A middleware may also return its own response without calling
/// `next`, or fail with an error that propagates to the caller.
pub trait Middleware: Send + Sync {
    fn handle(&self, request: &mut Request, next: Next<'_>) -> HandlerResult;
}

/// Middleware built from a closure. See [`from_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut Request, Next<'_>) -> HandlerResult + Send + Sync,
{
    fn handle(&self, request: &mut Request, next: Next<'_>) -> HandlerResult {
        (self.f)(request, next)
    }
}

/// Turn a closure into a [`Middleware`].
///
/// ```rust
/// use switchyard::middleware::from_fn;
///
/// let stamp = from_fn(|req, next| {
///     let mut resp = next.run(req)?;
///     resp.set_header("x-powered-by", "switchyard");
///     Ok(resp)
/// });
/// # let _ = stamp;
/// ```
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&mut Request, Next<'_>) -> HandlerResult + Send + Sync,
{
    FnMiddleware { f }
}
