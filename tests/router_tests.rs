//! Tests for route registration, matching and reverse URL generation
//!
//! # Test Coverage
//!
//! - Constrained and unconstrained path parameters
//! - First-registered-wins matching and shadowed route detection
//! - Group prefix and middleware inheritance
//! - Named routes, duplicates and URL rendering
//! - Verb helpers and per-method isolation

use std::collections::HashMap;

use http::Method;
use switchyard::{GroupAttributes, Handler, Request, Router, RouterError};

mod tracing_util;
use tracing_util::TestTracing;

fn echo() -> Handler {
    Handler::callable(|args| Ok(args.into_response()))
}

#[test]
fn test_constrained_param_match() {
    let mut router = Router::new();
    router.get(r"/users/{id:\d+}", echo()).unwrap().name("user.show");

    let m = router.match_route(&Method::GET, "/users/42").unwrap();
    assert_eq!(m.route.name(), Some("user.show"));
    assert_eq!(m.path_params_map(), HashMap::from([("id".to_string(), "42".to_string())]));

    assert!(router.match_route(&Method::GET, "/users/abc").is_none());
}

#[test]
fn test_first_registered_route_wins() {
    let mut router = Router::new();
    router.get("/users/{id}", echo()).unwrap().name("by-id");
    router.get("/users/new", echo()).unwrap().name("new");

    let m = router.match_route(&Method::GET, "/users/new").unwrap();
    assert_eq!(m.route.name(), Some("by-id"));
    assert_eq!(m.get_path_param("id"), Some("new"));
}

#[test]
fn test_literal_registered_first_is_reachable() {
    let mut router = Router::new();
    router.get("/users/new", echo()).unwrap().name("new");
    router.get("/users/{id}", echo()).unwrap().name("by-id");

    assert_eq!(
        router.match_route(&Method::GET, "/users/new").unwrap().route.name(),
        Some("new")
    );
    assert_eq!(
        router.match_route(&Method::GET, "/users/9").unwrap().route.name(),
        Some("by-id")
    );
    assert!(router.shadowed_routes().is_empty());
}

#[test]
fn test_shadowed_routes_reported_on_seal() {
    let tracing = TestTracing::init();
    let mut router = Router::new();
    router.get("/users/{id}", echo()).unwrap();
    router.get("/users/new", echo()).unwrap();
    router.post("/users/new", echo()).unwrap();

    let shadowed = router.shadowed_routes();
    assert_eq!(shadowed.len(), 1);
    assert_eq!(shadowed[0].shadowed.template(), "/users/new");
    assert_eq!(*shadowed[0].shadowed.method(), Method::GET);
    assert_eq!(shadowed[0].by.template(), "/users/{id}");

    router.seal();
    assert!(tracing.contains("Route can never match"));
}

#[test]
fn test_shadowed_routes_follow_registration_order() {
    let mut router = Router::new();
    router.post("/jobs/{id}", echo()).unwrap();
    router.get("/files/{name}", echo()).unwrap();
    router.delete("/jobs/{id}", echo()).unwrap();
    router.post("/jobs/retry", echo()).unwrap();
    router.get("/files/index", echo()).unwrap();
    router.delete("/jobs/all", echo()).unwrap();
    router.post("/jobs/purge", echo()).unwrap();

    for _ in 0..3 {
        let order: Vec<(Method, String)> = router
            .shadowed_routes()
            .iter()
            .map(|s| (s.shadowed.method().clone(), s.shadowed.template().to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Method::POST, "/jobs/retry".to_string()),
                (Method::GET, "/files/index".to_string()),
                (Method::DELETE, "/jobs/all".to_string()),
                (Method::POST, "/jobs/purge".to_string()),
            ]
        );
    }
}

#[test]
fn test_group_prefix_and_middleware() {
    let mut router = Router::new();
    router
        .group(GroupAttributes::new().prefix("/admin").middleware(["auth"]), |r| {
            r.get("/dashboard", echo())?;
            Ok(())
        })
        .unwrap();

    let route = router.routes().next().unwrap();
    assert_eq!(route.template(), "/admin/dashboard");
    assert_eq!(route.middleware(), ["auth"]);
}

#[test]
fn test_group_middleware_precedes_route_middleware() {
    let mut router = Router::new();
    router
        .group(GroupAttributes::new().prefix("/api").middleware(["A"]), |r| {
            r.get("/users", echo())?.middleware(["B"]);
            Ok(())
        })
        .unwrap();

    let m = router.match_route(&Method::GET, "/api/users").unwrap();
    assert_eq!(m.route.template(), "/api/users");
    assert_eq!(m.route.middleware(), ["A", "B"]);
}

#[test]
fn test_nested_groups() {
    let mut router = Router::new();
    router
        .group(GroupAttributes::new().prefix("api/").middleware(["outer"]), |r| {
            r.group(GroupAttributes::new().prefix("/v1/").middleware(["inner"]), |r| {
                r.get("posts", echo())?.name("posts.index");
                Ok(())
            })?;
            r.get("/status", echo())?;
            Ok(())
        })
        .unwrap();
    router.get("/outside", echo()).unwrap();

    let templates: Vec<&str> = router.routes().map(|r| r.template()).collect();
    assert_eq!(templates, vec!["/api/v1/posts", "/api/status", "/outside"]);

    let posts = router.named_route("posts.index").unwrap();
    assert_eq!(posts.middleware(), ["outer", "inner"]);
    assert!(router.routes().last().unwrap().middleware().is_empty());
}

#[test]
fn test_url_generation() {
    let mut router = Router::new();
    router.get(r"/users/{id:\d+}", echo()).unwrap().name("user.show");
    router
        .get("/users/{user}/posts/{post}", echo())
        .unwrap()
        .name("user.post");

    let url = router.url("user.show", &HashMap::from([("id", "7")])).unwrap();
    assert_eq!(url, "/users/7");

    let url = router
        .url("user.post", &HashMap::from([("user", "ann"), ("post", "3")]))
        .unwrap();
    assert_eq!(url, "/users/ann/posts/3");
}

#[test]
fn test_url_for_missing_name() {
    let router = Router::new();
    let err = router.url("missing-name", &HashMap::<String, String>::new()).unwrap_err();
    assert!(matches!(err, RouterError::NamedRouteNotFound(ref n) if n == "missing-name"));
}

#[test]
fn test_url_drops_unresolved_tokens() {
    let mut router = Router::new();
    router.get("/users/{id}/posts/{post}", echo()).unwrap().name("p");

    let url = router.url("p", &HashMap::from([("id", "1")])).unwrap();
    assert_eq!(url, "/users/1/posts/");
}

#[test]
fn test_render_then_match_round_trip() {
    let mut router = Router::new();
    router
        .get("/orgs/{org}/repos/{repo}/issues/{number}", echo())
        .unwrap()
        .name("issue");

    let values = HashMap::from([
        ("org".to_string(), "rust-lang".to_string()),
        ("repo".to_string(), "regex".to_string()),
        ("number".to_string(), "1024".to_string()),
    ]);
    let url = router.url("issue", &values).unwrap();
    let m = router.match_route(&Method::GET, &url).unwrap();
    assert_eq!(m.path_params_map(), values);
}

#[test]
fn test_duplicate_name_last_wins() {
    let tracing = TestTracing::init();
    let mut router = Router::new();
    router.get("/old", echo()).unwrap().name("home");
    router.get("/new", echo()).unwrap().name("home");

    assert_eq!(router.url("home", &HashMap::<&str, &str>::new()).unwrap(), "/new");
    assert_eq!(router.route_count(), 2);
    assert!(tracing.contains("Duplicate route name"));
}

#[test]
fn test_not_found() {
    let mut router = Router::new();
    router.get("/exists", echo()).unwrap();

    assert!(router.match_route(&Method::GET, "/nonexistent").is_none());

    let err = router
        .resolve(Request::new(Method::GET, "/nonexistent"))
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_methods_are_isolated() {
    let mut router = Router::new();
    router.get("/zoo/animals", echo()).unwrap().name("get");
    router.post("/zoo/animals", echo()).unwrap().name("post");
    router.put("/zoo/animals/{id}", echo()).unwrap().name("put");
    router.patch("/zoo/animals/{id}", echo()).unwrap().name("patch");
    router.delete("/zoo/animals/{id}", echo()).unwrap().name("delete");
    router.head("/zoo/health", echo()).unwrap().name("head");

    let cases = [
        (Method::GET, "/zoo/animals", Some("get")),
        (Method::POST, "/zoo/animals", Some("post")),
        (Method::PUT, "/zoo/animals/1", Some("put")),
        (Method::PATCH, "/zoo/animals/1", Some("patch")),
        (Method::DELETE, "/zoo/animals/1", Some("delete")),
        (Method::HEAD, "/zoo/health", Some("head")),
        (Method::GET, "/zoo/health", None),
        (Method::DELETE, "/zoo/animals", None),
    ];
    for (method, path, expected) in cases {
        let name = router
            .match_route(&method, path)
            .and_then(|m| m.route.name().map(str::to_string));
        assert_eq!(name.as_deref(), expected, "{method} {path}");
    }
}

#[test]
fn test_root_and_trailing_slashes() {
    let mut router = Router::new();
    router.get("/", echo()).unwrap().name("root");
    router.get("/about/", echo()).unwrap().name("about");

    assert_eq!(router.match_route(&Method::GET, "/").unwrap().route.name(), Some("root"));
    assert_eq!(router.match_route(&Method::GET, "").unwrap().route.name(), Some("root"));
    assert_eq!(
        router.match_route(&Method::GET, "/about").unwrap().route.name(),
        Some("about")
    );
    assert_eq!(
        router.match_route(&Method::GET, "about/").unwrap().route.name(),
        Some("about")
    );
}

#[test]
fn test_malformed_templates_rejected_at_registration() {
    let mut router = Router::new();
    for template in ["/users/{id", "/users/{}", "/users/{id}/{id}", "/users/{9lives}", r"/x/{a:(}"] {
        let result = router.get(template, echo());
        assert!(
            matches!(result, Err(RouterError::MalformedRoute { .. })),
            "{template} should be rejected"
        );
    }
    assert_eq!(router.route_count(), 0);
}

#[test]
fn test_shared_router_matches_from_threads() {
    let mut router = Router::new();
    router.get(r"/items/{id:\d+}", echo()).unwrap();
    let router = std::sync::Arc::new(router);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let router = std::sync::Arc::clone(&router);
            std::thread::spawn(move || {
                let path = format!("/items/{i}");
                let m = router.match_route(&Method::GET, &path).unwrap();
                m.get_path_param("id").map(str::to_string)
            })
        })
        .collect();

    for (i, h) in handles.into_iter().enumerate() {
        assert_eq!(h.join().unwrap(), Some(i.to_string()));
    }
}
