//! Router configuration for the i-Reporter App Interface mock.
//!
//! # Route Structure
//!
//! ```text
//! /api/v1/getValue            - Equipment measurements (any method)
//! /api/v1/getselect           - Equipment selector (GET)
//! /api/v1/master/fields       - Product master columns (GET)
//! /api/v1/master/params       - Product master parameters (GET)
//! /api/v1/master/getrecords   - Product records (POST)
//! *                           - 404 fallback
//! ```
//!
//! All routes, the fallback included, sit behind the bearer-token gate.
//! CORS preflight requests are answered before the gate.
//!
//! # Example
//!
//! ```ignore
//! use ireporter_mock::server::routes::{create_router, RouterConfig};
//!
//! let config = RouterConfig::new("gateway-pass").with_upload_dir("./uploads");
//! let router = create_router(config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get, post},
    Router,
};
use http::Method;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, BearerAuth};
use super::handlers::{
    get_value_handler, master_fields_handler, master_params_handler, master_records_handler,
    not_found_handler, panic_response, select_handler, AppState,
};
use crate::config::{DEFAULT_MAX_BODY_BYTES, DEFAULT_UPLOAD_DIR};
use crate::upload::UploadStore;

pub const GET_VALUE_PATH: &str = "/api/v1/getValue";
pub const GET_SELECT_PATH: &str = "/api/v1/getselect";
pub const MASTER_FIELDS_PATH: &str = "/api/v1/master/fields";
pub const MASTER_PARAMS_PATH: &str = "/api/v1/master/params";
pub const MASTER_RECORDS_PATH: &str = "/api/v1/master/getrecords";

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Bearer token every request must present
    pub api_token: String,

    /// Directory receiving uploaded files
    pub upload_dir: PathBuf,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with the given token.
    ///
    /// By default:
    /// - Uploads go to `./uploads`
    /// - CORS allows any origin
    /// - Request bodies are limited to 64 MiB
    /// - Tracing is enabled
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            cors_origins: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            enable_tracing: true,
        }
    }

    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// An empty vec disallows all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router.
///
/// Layers, innermost first: body limit, bearer auth, panic catcher, CORS,
/// and request tracing when enabled.
pub fn create_router(config: RouterConfig) -> Router {
    let app_state = AppState::new(UploadStore::new(&config.upload_dir));
    let auth = BearerAuth::new(&config.api_token);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route(GET_VALUE_PATH, any(get_value_handler))
        .route(
            GET_SELECT_PATH,
            get(select_handler).fallback(not_found_handler),
        )
        .route(
            MASTER_FIELDS_PATH,
            get(master_fields_handler).fallback(not_found_handler),
        )
        .route(
            MASTER_PARAMS_PATH,
            get(master_params_handler).fallback(not_found_handler),
        )
        .route(
            MASTER_RECORDS_PATH,
            post(master_records_handler).fallback(not_found_handler),
        )
        .fallback(not_found_handler)
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware::from_fn_with_state(auth, auth_middleware))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Methods a cross-origin caller may use.
const CORS_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// Build the CORS layer based on configuration.
///
/// Preflights are granted every method in [`CORS_METHODS`] and whatever
/// request headers the browser asks for.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(CORS_METHODS.to_vec())
        .allow_headers(AllowHeaders::mirror_request());

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
