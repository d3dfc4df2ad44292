use std::sync::Arc;

use super::core::{Continuation, Middleware, Next};
use crate::request::Request;

/// Composes middleware into a single continuation (onion model).
pub struct Pipeline;

impl Pipeline {
    /// Fold `middleware` right to left around `terminal`.
    ///
    /// The first entry is the outermost layer: it runs first on the way in
    /// and last on the way out.
    #[must_use]
    pub fn build<'a>(middleware: &'a [Arc<dyn Middleware>], terminal: Continuation<'a>) -> Continuation<'a> {
        middleware.iter().rev().fold(terminal, |next, mw| {
            let wrapped: Continuation<'a> =
                Box::new(move |request: &mut Request| mw.handle(request, Next::new(next)));
            wrapped
        })
    }
}
