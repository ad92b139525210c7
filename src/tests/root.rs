use axum::http::Method;
use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_root() {
    let mut app = helper::setup_test_app().await;

    let (status_code, body) = helper::root(&mut app, "/").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(json!({ "status": "The Journal API is running" }), body);
}

#[tokio::test]
async fn test_unknown_route() {
    let mut app = helper::setup_test_app().await;

    let (status_code, body) = helper::root(&mut app, "/api/unknown").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(json!({ "error": "Not found" }), body);

    let (status_code, body) = helper::root(&mut app, "/favicon.ico").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(json!({ "error": "Not found" }), body);
}

#[tokio::test]
async fn test_cross_origin_request() {
    let mut app = helper::setup_test_app().await;

    let (status_code, headers) = helper::headers_of(
        &mut app,
        Method::GET,
        "/api/notes",
        &[("origin", "http://localhost:5173")],
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(
        Some("*"),
        headers
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok())
    );
}

#[tokio::test]
async fn test_cross_origin_preflight() {
    let mut app = helper::setup_test_app().await;

    let (status_code, headers) = helper::headers_of(
        &mut app,
        Method::OPTIONS,
        "/api/notes/1",
        &[
            ("origin", "http://localhost:5173"),
            ("access-control-request-method", "DELETE"),
            ("access-control-request-headers", "content-type"),
        ],
    )
    .await;
    assert!(status_code.is_success());

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
    };

    assert_eq!(Some("*".to_string()), header("access-control-allow-origin"));
    assert_eq!(Some("*".to_string()), header("access-control-allow-methods"));
    assert_eq!(Some("*".to_string()), header("access-control-allow-headers"));
}
