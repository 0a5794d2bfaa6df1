//! Test utilities for integration tests.
//!
//! Helpers for building authenticated requests, multipart bodies and
//! throwaway upload directories, and for reading JSON responses.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rand::Rng;
use tower::ServiceExt;

use ireporter_mock::{create_router, RouterConfig};

pub const TEST_TOKEN: &str = "test-token";

const BOUNDARY: &str = "----ireporter-mock-boundary";

// =============================================================================
// Upload Directories
// =============================================================================

/// A unique directory under the system temp dir, removed on drop.
pub struct TempUploadDir {
    path: PathBuf,
}

impl TempUploadDir {
    pub fn new() -> Self {
        let suffix: u64 = rand::rng().random();
        Self {
            path: std::env::temp_dir().join(format!("ireporter-mock-it-{}", suffix)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the files currently in the directory (empty if it does not exist).
    pub fn file_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.path) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TempUploadDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempUploadDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Router with the test token, uploads going to `uploads`.
pub fn test_router(uploads: &TempUploadDir) -> Router {
    create_router(
        RouterConfig::new(TEST_TOKEN)
            .with_upload_dir(uploads.path())
            .with_tracing(false),
    )
}

// =============================================================================
// Requests
// =============================================================================

/// Request builder carrying a valid bearer token.
pub fn authed(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
}

/// Authenticated request without a body.
pub fn authed_empty(method: Method, uri: &str) -> Request<Body> {
    authed(method, uri).body(Body::empty()).unwrap()
}

/// A part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

/// Encode parts as `multipart/form-data`, returning (content type, body).
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        field, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body,
    )
}

/// Authenticated multipart POST.
pub fn authed_multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let (content_type, body) = multipart_body(parts);
    authed(Method::POST, uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

/// Authenticated multipart POST with a single `data` field.
pub fn authed_data(uri: &str, data: &str) -> Request<Body> {
    authed_multipart(uri, &[Part::Text("data", data)])
}

// =============================================================================
// Responses
// =============================================================================

/// Send a request and decode the JSON response body.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Value of an `apply` entry by item name.
pub fn apply_value<'a>(json: &'a serde_json::Value, item: &str) -> Option<&'a str> {
    json["apply"]
        .as_array()?
        .iter()
        .find(|entry| entry["item"] == item)
        .and_then(|entry| entry["value"].as_str())
}

/// `product_id` (field no. 1) of every returned record.
pub fn record_ids(json: &serde_json::Value) -> Vec<String> {
    json["records"]
        .as_array()
        .map(|records| {
            records
                .iter()
                .filter_map(|record| record["fields"][0]["value"].as_str())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
