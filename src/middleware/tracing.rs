use std::time::Instant;

use tracing::{field, info_span, warn};

use super::core::{Middleware, Next};
use crate::error::HandlerResult;
use crate::request::Request;

/// Opens one `request` span around the rest of the chain and records the
/// outcome on it.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn handle(&self, request: &mut Request, next: Next<'_>) -> HandlerResult {
        let span = info_span!(
            "request",
            request_id = %request.request_id,
            method = %request.method(),
            path = %request.path(),
            route = request.route_template.as_deref().unwrap_or(""),
            status = field::Empty,
            latency_ms = field::Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let result = next.run(request);

        span.record("latency_ms", start.elapsed().as_millis() as u64);
        match &result {
            Ok(resp) => {
                span.record("status", resp.status);
            }
            Err(err) => {
                span.record("status", err.status_code());
                warn!(error = %err, "Request failed");
            }
        }
        result
    }
}
