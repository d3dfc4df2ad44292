//! Tests for middleware composition through `Router::resolve`
//!
//! # Test Coverage
//!
//! - Onion ordering across global, group and route middleware
//! - Short-circuit responses seen by outer layers
//! - Error propagation and unknown middleware identifiers
//! - Built-in auth, metrics and tracing middleware

use std::sync::{Arc, Mutex};

use http::Method;
use switchyard::middleware::{from_fn, AuthMiddleware, Middleware, MetricsMiddleware, TracingMiddleware};
use switchyard::{GroupAttributes, Handler, Request, Response, Router, RouterError};

mod tracing_util;
use tracing_util::TestTracing;

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(tag: &'static str, log: &Log) -> impl Middleware {
    let log = Arc::clone(log);
    from_fn(move |req, next| {
        log.lock().unwrap().push(format!("{tag}-before"));
        let resp = next.run(req);
        log.lock().unwrap().push(format!("{tag}-after"));
        resp
    })
}

fn logging_handler(log: &Log) -> Handler {
    let log = Arc::clone(log);
    Handler::callable(move |_args| {
        log.lock().unwrap().push("handler".to_string());
        Ok(Response::json(200, serde_json::json!({ "ok": true })))
    })
}

#[test]
fn test_onion_ordering() {
    let log: Log = Arc::default();
    let mut router = Router::new();
    router.register_middleware("m1", recorder("m1", &log)).unwrap();
    router.register_middleware("m2", recorder("m2", &log)).unwrap();
    router
        .get("/onion", logging_handler(&log))
        .unwrap()
        .middleware(["m1", "m2"]);

    let resp = router.resolve(Request::new(Method::GET, "/onion")).unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["m1-before", "m2-before", "handler", "m2-after", "m1-after"]
    );
}

#[test]
fn test_global_then_group_then_route_order() {
    let log: Log = Arc::default();
    let mut router = Router::new();
    for tag in ["global", "group", "route"] {
        router.register_middleware(tag, recorder(tag, &log)).unwrap();
    }
    router.wrap("global").unwrap();
    router
        .group(GroupAttributes::new().prefix("/g").middleware(["group"]), |r| {
            r.get("/x", logging_handler(&log))?.middleware(["route"]);
            Ok(())
        })
        .unwrap();

    router.resolve(Request::new(Method::GET, "/g/x")).unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "global-before",
            "group-before",
            "route-before",
            "handler",
            "route-after",
            "group-after",
            "global-after",
        ]
    );
}

#[test]
fn test_short_circuit_skips_inner_layers() {
    let log: Log = Arc::default();
    let seen_status = Arc::new(Mutex::new(None));

    let mut router = Router::new();
    let observed = Arc::clone(&seen_status);
    router.register_middleware(
        "outer",
        from_fn(move |req, next| {
            let resp = next.run(req)?;
            *observed.lock().unwrap() = Some(resp.status);
            Ok(resp)
        }),
    )
    .unwrap();
    router.register_middleware("gate", from_fn(|_req, _next| Ok(Response::error(403, "Forbidden")))).unwrap();
    router.register_middleware("inner", recorder("inner", &log)).unwrap();
    router
        .get("/guarded", logging_handler(&log))
        .unwrap()
        .middleware(["outer", "gate", "inner"]);

    let resp = router.resolve(Request::new(Method::GET, "/guarded")).unwrap();
    assert_eq!(resp.status, 403);
    assert_eq!(*seen_status.lock().unwrap(), Some(403));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_middleware_can_modify_request_and_response() {
    let mut router = Router::new();
    router.register_middleware(
        "tenant",
        from_fn(|req, next| {
            req.headers.push(("x-tenant".into(), "acme".to_string()));
            let mut resp = next.run(req)?;
            resp.set_header("x-served-by", "switchyard");
            Ok(resp)
        }),
    )
    .unwrap();
    router
        .get(
            "/whoami",
            Handler::callable(|args| {
                let tenant = args.request().get_header("x-tenant").unwrap_or("none").to_string();
                Ok(Response::json(200, serde_json::json!({ "tenant": tenant })))
            }),
        )
        .unwrap()
        .middleware(["tenant"]);

    let resp = router.resolve(Request::new(Method::GET, "/whoami")).unwrap();
    assert_eq!(resp.body["tenant"], "acme");
    assert_eq!(resp.get_header("x-served-by"), Some("switchyard"));
}

#[test]
fn test_middleware_error_propagates() {
    let log: Log = Arc::default();
    let mut router = Router::new();
    router.register_middleware("outer", recorder("outer", &log)).unwrap();
    router.register_middleware(
        "fail",
        from_fn(|_req, _next| Err(RouterError::Failed(anyhow::anyhow!("quota exceeded")))),
    )
    .unwrap();
    router
        .get("/limited", logging_handler(&log))
        .unwrap()
        .middleware(["outer", "fail"]);

    let err = router.resolve(Request::new(Method::GET, "/limited")).unwrap_err();
    assert_eq!(err.to_string(), "quota exceeded");
    assert_eq!(err.status_code(), 500);
    assert_eq!(*log.lock().unwrap(), vec!["outer-before", "outer-after"]);
}

#[test]
fn test_handler_error_propagates_through_middleware() {
    let log: Log = Arc::default();
    let mut router = Router::new();
    router.register_middleware("outer", recorder("outer", &log)).unwrap();
    router
        .get(
            "/broken",
            Handler::callable(|_args| Err(RouterError::Failed(anyhow::anyhow!("db down")))),
        )
        .unwrap()
        .middleware(["outer"]);

    let err = router.resolve(Request::new(Method::GET, "/broken")).unwrap_err();
    assert!(matches!(err, RouterError::Failed(_)));
    assert_eq!(*log.lock().unwrap(), vec!["outer-before", "outer-after"]);
}

#[test]
fn test_unknown_middleware_is_server_error() {
    let log: Log = Arc::default();
    let mut router = Router::new();
    router
        .get("/x", logging_handler(&log))
        .unwrap()
        .middleware(["missing"]);

    assert!(matches!(router.verify().as_slice(), [RouterError::MiddlewareNotFound(id)] if id == "missing"));

    let err = router.resolve(Request::new(Method::GET, "/x")).unwrap_err();
    assert!(matches!(err, RouterError::MiddlewareNotFound(ref id) if id == "missing"));
    assert_eq!(err.status_code(), 500);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_auth_middleware() {
    let mut router = Router::new();
    router.register_middleware("auth", AuthMiddleware::new("s3cret")).unwrap();
    router
        .group(GroupAttributes::new().prefix("/admin").middleware(["auth"]), |r| {
            r.get("/dashboard", Handler::callable(|args| Ok(args.into_response())))?;
            Ok(())
        })
        .unwrap();

    let denied = router.resolve(Request::new(Method::GET, "/admin/dashboard")).unwrap();
    assert_eq!(denied.status, 401);

    let wrong = router
        .resolve(Request::new(Method::GET, "/admin/dashboard").with_header("Authorization", "Bearer nope"))
        .unwrap();
    assert_eq!(wrong.status, 401);

    let ok = router
        .resolve(Request::new(Method::GET, "/admin/dashboard").with_header("Authorization", "Bearer s3cret"))
        .unwrap();
    assert_eq!(ok.status, 200);
}

#[test]
fn test_metrics_middleware_counts() {
    let metrics = Arc::new(MetricsMiddleware::new());
    let mut router = Router::new();
    router.register_middleware_arc("metrics", Arc::clone(&metrics) as Arc<dyn Middleware>).unwrap();
    router.wrap("metrics").unwrap();
    router
        .get("/items/{id}", Handler::callable(|args| Ok(args.into_response())))
        .unwrap();
    router
        .get(
            "/fail",
            Handler::callable(|_args| Ok(Response::error(503, "Service Unavailable"))),
        )
        .unwrap();

    for path in ["/items/1", "/items/2", "/fail"] {
        router.resolve(Request::new(Method::GET, path)).unwrap();
    }
    assert!(router.resolve(Request::new(Method::GET, "/unknown")).is_err());

    assert_eq!(metrics.request_count(), 3);
    assert_eq!(metrics.failure_count(), 1);
    assert_eq!(metrics.route_count("/items/{id}"), 2);
    assert_eq!(metrics.route_count("/fail"), 1);
}

#[test]
fn test_tracing_middleware_records_request_span() {
    let tracing = TestTracing::init();
    let mut router = Router::new();
    router.register_middleware("trace", TracingMiddleware).unwrap();
    router
        .get(
            "/boom",
            Handler::callable(|_args| Err(RouterError::Failed(anyhow::anyhow!("exploded")))),
        )
        .unwrap()
        .middleware(["trace"]);

    assert!(router.resolve(Request::new(Method::GET, "/boom")).is_err());
    assert!(tracing.contains("Request failed"));
    assert!(tracing.contains("/boom"));
}
