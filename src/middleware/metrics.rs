use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::core::{Middleware, Next};
use crate::error::HandlerResult;
use crate::request::Request;

/// Middleware for collecting request statistics.
///
/// Counts requests, failures and latency with relaxed atomics, and keeps a
/// per-route request count keyed by the matched route template.
///
/// Register it with [`MiddlewareRegistry::register_arc`](super::MiddlewareRegistry::register_arc)
/// and keep the `Arc` to read the counters.
#[derive(Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    failure_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    per_route: DashMap<String, usize>,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests that passed through this middleware
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Requests that ended in an error or a 5xx response
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Mean time spent in the rest of the chain.
    ///
    /// Returns zero duration if no requests have been processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Requests served by the route with this template (e.g. `/users/{id}`)
    #[must_use]
    pub fn route_count(&self, template: &str) -> usize {
        self.per_route.get(template).map(|c| *c).unwrap_or(0)
    }
}

impl Middleware for MetricsMiddleware {
    fn handle(&self, request: &mut Request, next: Next<'_>) -> HandlerResult {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let key = request
            .route_template
            .as_deref()
            .unwrap_or_else(|| request.path())
            .to_string();
        *self.per_route.entry(key).or_insert(0) += 1;

        let start = Instant::now();
        let result = next.run(request);
        self.total_latency_ns
            .fetch_add(start.elapsed().as_nanos() as u64, Ordering::Relaxed);

        let failed = match &result {
            Ok(resp) => resp.status >= 500,
            Err(_) => true,
        };
        if failed {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
        }
        result
    }
}
