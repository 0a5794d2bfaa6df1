//! # i-Reporter App Interface Mock
//!
//! A mock of the i-Reporter App Interface gateway: the REST service a
//! factory-floor form client calls to pull equipment measurements and
//! product master data into its sheets.
//!
//! Responses are canned. The only logic is choosing between two measurement
//! sets, equality filtering over a five-row product table, and writing
//! uploaded attachments to disk.
//!
//! ## Features
//!
//! - **Static bearer auth**: failures are reported in-band with HTTP 200
//! - **Equipment measurements**: selected by `plc_id`
//! - **Product master**: column/parameter descriptors and filtered records,
//!   falling back to the full table when a filter matches nothing
//! - **Uploads**: multipart attachments stored under unique names
//!
//! ## Architecture
//!
//! - [`apply`] - Canned measurement sets and the equipment selector
//! - [`master`] - Product master schema, records and filtering
//! - [`upload`] - Storage of uploaded files
//! - [`server`] - Axum-based HTTP server, auth and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use ireporter_mock::{create_router, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = create_router(RouterConfig::new("gateway-pass"));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod apply;
pub mod config;
pub mod error;
pub mod master;
pub mod server;
pub mod upload;

// Re-export commonly used types
pub use apply::{equipment_selector, ApplyItem, Equipment, SelectItem, PLCA_ID, PLCB_ID};
pub use config::Config;
pub use error::{ApiError, UploadError};
pub use master::{
    CustomRecord, FieldDescriptor, FieldType, FilterSet, ParamDescriptor, ProductRecord,
    Selection, SelectionMode, PRODUCTS, PRODUCT_FIELDS, PRODUCT_PARAMS,
};
pub use server::{
    create_router, AppState, AuthError, BearerAuth, FormPayload, ResultStatus, RouterConfig,
    ValueRequest,
};
pub use upload::{UploadStore, UploadedFile};
