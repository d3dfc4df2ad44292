use tracing::debug;

use super::core::{Middleware, Next};
use crate::error::HandlerResult;
use crate::request::Request;
use crate::response::Response;

/// Static bearer-token check.
///
/// Requests whose `authorization` header is neither `Bearer <token>` nor the
/// bare token are answered with `401` and never reach inner middleware or
/// the handler.
pub struct AuthMiddleware {
    token: String,
}

impl AuthMiddleware {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    fn accepts(&self, header: &str) -> bool {
        header
            .strip_prefix("Bearer ")
            .unwrap_or(header)
            .trim()
            == self.token
    }
}

impl Middleware for AuthMiddleware {
    fn handle(&self, request: &mut Request, next: Next<'_>) -> HandlerResult {
        match request.get_header("authorization") {
            Some(h) if self.accepts(h) => next.run(request),
            _ => {
                debug!(
                    request_id = %request.request_id,
                    path = %request.path(),
                    "Rejected unauthenticated request"
                );
                Ok(Response::error(401, "Unauthorized"))
            }
        }
    }
}
