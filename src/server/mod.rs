//! HTTP server layer for the i-Reporter App Interface mock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        /api/v1/getValue, /api/v1/getselect, /api/v1/master/*    │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌────────┐  │
//! │  │    auth     │  │   ingress   │  │  handlers   │  │ routes │  │
//! │  │  (bearer)   │  │ (body/query)│  │ (responses) │  │        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  └────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod ingress;
pub mod routes;

pub use auth::{auth_middleware, AuthError, BearerAuth};
pub use handlers::{
    get_value_handler, master_fields_handler, master_params_handler, master_records_handler,
    not_found_handler, panic_response, select_handler, AppState, ApplyResponse, FieldsResponse,
    ParamsResponse, RecordsResponse, ResultResponse, ResultStatus, CODE_FAILURE, CODE_SUCCESS,
};
pub use ingress::{parse_query, FormPayload, QueryParams, ValueRequest};
pub use routes::{create_router, RouterConfig};
