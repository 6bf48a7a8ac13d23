use routesync::prelude::*;

#[test]
fn test_create_store_headless() {
    let store = routesync::create_store(StoreConfig::headless().with_href("http://localhost/a/b"));
    assert_eq!(store.get().path, "/a/b");
    assert!(match_route(&store.get(), "/a/:rest", false).is_some());
}

#[test]
fn test_route_json_shape() {
    let route = Route::new("/users/42")
        .with_query("active", true)
        .with_query("page", 2)
        .with_fragment("tab", "info");

    let json = serde_json::to_value(&route).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "path": "/users/42",
            "query": { "active": true, "page": 2 },
            "fragment": { "tab": "info" }
        })
    );

    let back: Route = serde_json::from_value(json).unwrap();
    assert_eq!(back, route);
}

#[test]
fn test_serialize_with_config() {
    let config = StoreConfig::new().with_base("/app");
    let route = RouteParser::new(&config).parse("https://x.test/app/users/42?active=true#tab=info");
    assert_eq!(routesync::serialize(&route, &config), "/users/42?active=true#tab=info");
}
