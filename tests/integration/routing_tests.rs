//! Routing and fault integration tests.
//!
//! Tests verify:
//! - Unknown paths and wrong methods get the JSON 404 body
//! - Malformed or oversized bodies get the generic 500 fault

use axum::body::Body;
use axum::http::{header, Method, StatusCode};

use ireporter_mock::{create_router, RouterConfig};

use super::test_utils::{authed, authed_empty, send, test_router, TempUploadDir, TEST_TOKEN};

#[tokio::test]
async fn test_unknown_path_returns_404() {
    let uploads = TempUploadDir::new();
    let (status, json) = send(
        test_router(&uploads),
        authed_empty(Method::GET, "/api/v1/unknown?x=1"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json,
        serde_json::json!({
            "result": {
                "code": -1,
                "description": "エンドポイントが見つかりません: /api/v1/unknown"
            }
        })
    );
}

#[tokio::test]
async fn test_wrong_method_returns_404() {
    let uploads = TempUploadDir::new();

    for (method, uri) in [
        (Method::GET, "/api/v1/master/getrecords"),
        (Method::POST, "/api/v1/getselect"),
        (Method::DELETE, "/api/v1/master/fields"),
        (Method::PUT, "/api/v1/master/params"),
    ] {
        let (status, json) = send(test_router(&uploads), authed_empty(method.clone(), uri)).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(json["result"]["code"], -1);
        assert!(json["result"]["description"]
            .as_str()
            .unwrap()
            .ends_with(uri));
    }
}

#[tokio::test]
async fn test_get_value_accepts_any_method() {
    let uploads = TempUploadDir::new();

    for method in [Method::PUT, Method::DELETE, Method::PATCH] {
        let (status, json) = send(
            test_router(&uploads),
            authed_empty(method.clone(), "/api/v1/getValue?plc_id=PLCB"),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{}", method);
        assert_eq!(json["result"]["code"], 0);
    }
}

#[tokio::test]
async fn test_truncated_multipart_returns_fault() {
    let uploads = TempUploadDir::new();
    let body = "------ireporter-mock-boundary\r\n\
                Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
                Content-Type: text/plain\r\n\r\n\
                partial contents with no closing boundary";
    let request = authed(Method::POST, "/api/v1/getValue")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=----ireporter-mock-boundary",
        )
        .body(Body::from(body))
        .unwrap();
    let (status, json) = send(test_router(&uploads), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["result"]["code"], -1);
    assert_eq!(json["result"]["description"], "サーバーエラーが発生しました");
    assert!(json["result"]["error"].is_string());
    assert!(uploads.file_names().is_empty());
}

#[tokio::test]
async fn test_oversized_body_returns_fault() {
    let uploads = TempUploadDir::new();
    let router = create_router(
        RouterConfig::new(TEST_TOKEN)
            .with_upload_dir(uploads.path())
            .with_max_body_bytes(16)
            .with_tracing(false),
    );
    let request = authed(Method::POST, "/api/v1/master/getrecords")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("data={}", "x".repeat(64))))
        .unwrap();
    let (status, json) = send(router, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["result"]["code"], -1);
}

#[tokio::test]
async fn test_json_body_is_accepted() {
    let uploads = TempUploadDir::new();
    let request = authed(Method::POST, "/api/v1/getValue")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"plc_id":"PLCB"}"#))
        .unwrap();
    let (status, json) = send(test_router(&uploads), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        super::test_utils::apply_value(&json, "sample-spin"),
        Some("6500")
    );
}
