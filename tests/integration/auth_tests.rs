//! Authentication integration tests.
//!
//! Tests verify:
//! - A valid bearer token is admitted
//! - Missing, malformed and wrong tokens are rejected in-band (HTTP 200, code -1)
//! - The gate runs before routing, including for unknown paths
//! - CORS preflight is answered without a token

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use super::test_utils::{authed_empty, send, test_router, TempUploadDir, TEST_TOKEN};

fn request_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_valid_token_is_admitted() {
    let uploads = TempUploadDir::new();
    let (status, json) = send(
        test_router(&uploads),
        authed_empty(Method::GET, "/api/v1/getselect"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["code"], 0);
}

#[tokio::test]
async fn test_missing_header_is_rejected_in_band() {
    let uploads = TempUploadDir::new();
    let (status, json) = send(
        test_router(&uploads),
        request_with_auth("/api/v1/getValue", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({"result": {"code": -1, "description": "認証が必要です"}})
    );
}

#[tokio::test]
async fn test_wrong_scheme_is_rejected_in_band() {
    let uploads = TempUploadDir::new();
    let (status, json) = send(
        test_router(&uploads),
        request_with_auth("/api/v1/getValue", Some(&format!("Token {}", TEST_TOKEN))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["code"], -1);
    assert_eq!(json["result"]["description"], "認証が必要です");
}

#[tokio::test]
async fn test_wrong_token_is_rejected_in_band() {
    let uploads = TempUploadDir::new();
    let (status, json) = send(
        test_router(&uploads),
        request_with_auth("/api/v1/master/fields", Some("Bearer not-the-token")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["code"], -1);
    assert_eq!(json["result"]["description"], "無効なトークンです");
    assert!(json.get("fields").is_none());
}

#[tokio::test]
async fn test_rejected_request_does_not_reach_handler() {
    let uploads = TempUploadDir::new();
    let (_, json) = send(
        test_router(&uploads),
        request_with_auth("/api/v1/getValue?plc_id=PLCB", Some("Bearer wrong")),
    )
    .await;

    assert!(json.get("apply").is_none());
}

#[tokio::test]
async fn test_unknown_path_without_token_gets_auth_failure() {
    let uploads = TempUploadDir::new();
    let (status, json) = send(
        test_router(&uploads),
        request_with_auth("/no/such/endpoint", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["code"], -1);
    assert_eq!(json["result"]["description"], "認証が必要です");
}

#[tokio::test]
async fn test_cors_preflight_skips_auth() {
    let uploads = TempUploadDir::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/getValue")
        .header(header::ORIGIN, "https://forms.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(test_router(&uploads), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight_grants_put_and_custom_headers() {
    let uploads = TempUploadDir::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/getValue")
        .header(header::ORIGIN, "https://forms.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-requested-with")
        .body(Body::empty())
        .unwrap();

    let response = test_router(&uploads).oneshot(request).await.unwrap();
    let allowed = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    assert!(allowed(header::ACCESS_CONTROL_ALLOW_METHODS).contains("PUT"));
    assert_eq!(allowed(header::ACCESS_CONTROL_ALLOW_HEADERS), "x-requested-with");
}
