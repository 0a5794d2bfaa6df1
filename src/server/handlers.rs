//! HTTP request handlers for the i-Reporter App Interface mock.
//!
//! # Endpoints
//!
//! - `GET|POST /api/v1/getValue` - Equipment measurements (optional uploads)
//! - `GET /api/v1/getselect` - Equipment selector
//! - `GET /api/v1/master/fields` - Product master columns
//! - `GET /api/v1/master/params` - Product master parameters
//! - `POST /api/v1/master/getrecords` - Filtered product records
//!
//! Every body carries a `result` object: `code` is `0` on success and `-1`
//! on any failure.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::apply::{equipment_selector, ApplyItem, Equipment};
use crate::error::ApiError;
use crate::master::{
    default_record, CustomRecord, FieldDescriptor, FilterSet, ParamDescriptor, SelectionMode,
    PRODUCTS, PRODUCT_FIELDS, PRODUCT_PARAMS,
};
use crate::upload::UploadStore;

use super::ingress::{parse_query, FormPayload, ValueRequest};

/// `result.code` of a successful response.
pub const CODE_SUCCESS: i32 = 0;

/// `result.code` of any failed response.
pub const CODE_FAILURE: i32 = -1;

/// `result.description` of the 500 fault response.
pub const SERVER_ERROR_DESCRIPTION: &str = "サーバーエラーが発生しました";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Destination of files attached to `getValue`
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub fn new(uploads: UploadStore) -> Self {
        Self {
            uploads: Arc::new(uploads),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// The `result` object present in every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultStatus {
    pub code: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<Vec<String>>,

    /// Underlying error message, only on 500 faults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultStatus {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            code: CODE_SUCCESS,
            description: Some(description.into()),
            remarks: None,
            error: None,
        }
    }

    pub fn success_with_remarks(remarks: Vec<String>) -> Self {
        Self {
            code: CODE_SUCCESS,
            description: None,
            remarks: Some(remarks),
            error: None,
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            code: CODE_FAILURE,
            description: Some(description.into()),
            remarks: None,
            error: None,
        }
    }

    pub fn fault(description: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: CODE_FAILURE,
            description: Some(description.into()),
            remarks: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }
}

/// A body consisting of the `result` object alone.
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: ResultStatus,
}

impl ResultResponse {
    pub fn new(result: ResultStatus) -> Self {
        Self { result }
    }
}

/// Response of `getValue` and `getselect`.
#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub result: ResultStatus,
    pub apply: Vec<ApplyItem>,
}

/// Response of `master/fields`.
#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub result: ResultStatus,
    pub fields: &'static [FieldDescriptor],
}

/// Response of `master/params`.
#[derive(Debug, Serialize)]
pub struct ParamsResponse {
    pub result: ResultStatus,
    pub params: &'static [ParamDescriptor],
}

/// Response of `master/getrecords`.
#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub result: ResultStatus,
    pub fields: &'static [FieldDescriptor],
    #[serde(rename = "defaultRecord")]
    pub default_record: CustomRecord,
    pub records: Vec<CustomRecord>,
}

/// The `data` document of a `getValue` POST. Only logged.
///
/// Any valid JSON is accepted. Members that are missing or have an
/// unexpected shape are left empty.
#[derive(Debug, Default, PartialEq)]
struct ValueData {
    user_name: Option<Value>,
    clusters: Option<Vec<ValueCluster>>,
}

#[derive(Debug, PartialEq)]
struct ValueCluster {
    cluster_id: Option<Value>,
    name: Option<Value>,
    value: Option<Value>,
}

impl ValueData {
    /// Fails only when `data` is not JSON at all.
    fn parse(data: &str) -> Result<Self, serde_json::Error> {
        let document: Value = serde_json::from_str(data)?;

        let clusters = document
            .get("clusters")
            .and_then(Value::as_array)
            .map(|clusters| clusters.iter().map(ValueCluster::from_value).collect());

        Ok(Self {
            user_name: document.get("userName").cloned(),
            clusters,
        })
    }
}

impl ValueCluster {
    fn from_value(cluster: &Value) -> Self {
        Self {
            cluster_id: cluster.get("clusterId").cloned(),
            name: cluster.get("name").cloned(),
            value: cluster.get("value").cloned(),
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ApiError to the generic 500 fault response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_type = match &self {
            ApiError::Upload(_) => "upload_error",
            ApiError::Multipart(_) => "multipart_error",
            ApiError::Body(_) => "body_error",
        };

        error!(
            error_type = error_type,
            status = StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            "Server error: {}",
            self
        );

        fault_response(self.to_string())
    }
}

fn fault_response(message: String) -> Response {
    let body = ResultResponse::new(ResultStatus::fault(SERVER_ERROR_DESCRIPTION, message));
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Turn a handler panic into the generic 500 fault response.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(
        error_type = "panic",
        status = StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        "Handler panicked: {}",
        message
    );

    fault_response(message)
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle equipment value requests.
///
/// # Endpoint
///
/// `GET|POST /api/v1/getValue` (any method is accepted)
///
/// # Parameters
///
/// - `plc_id` (query, or body field on POST): `PLCB` selects the PLC-B set,
///   anything else the default PLC-A set
/// - `id` (query): logged only
/// - `data` (body field on POST): JSON document, logged only
/// - any multipart file part (POST): written to the uploads directory
///
/// # Response
///
/// - `200 OK`: `{result, apply: [4 measurements]}`
/// - `500 Internal Server Error`: an attachment could not be stored
pub async fn get_value_handler(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    payload: FormPayload,
) -> Result<Json<ApplyResponse>, ApiError> {
    let request = ValueRequest::resolve(&method, parse_query(query.as_deref()), payload);

    debug!(method = %method, query = ?request.params(), "getValue");

    if let ValueRequest::Query { params } = &request {
        debug!(id = ?params.get("id"), "getValue query request");
    }

    if let Some(data) = request.data() {
        match ValueData::parse(data) {
            Ok(parsed) => {
                debug!(user = ?parsed.user_name, "getValue POST data");
                for cluster in parsed.clusters.iter().flatten() {
                    debug!(
                        cluster_id = ?cluster.cluster_id,
                        name = ?cluster.name,
                        value = ?cluster.value,
                        "getValue cluster"
                    );
                }
            }
            Err(e) => warn!(error = %e, "Failed to parse getValue data"),
        }
    }

    for file in request.files() {
        debug!(
            field = %file.field_name,
            filename = %file.file_name,
            mimetype = ?file.content_type,
            size = %file.size_kb(),
            "Uploaded file"
        );
        state.uploads.save(file).await?;
    }

    let equipment = Equipment::from_plc_id(request.plc_id());
    info!(plc_id = equipment.id(), "Returning measurements");

    Ok(Json(ApplyResponse {
        result: ResultStatus::success("データ取得成功"),
        apply: equipment.measurements(),
    }))
}

/// Handle equipment selector requests.
///
/// `GET /api/v1/getselect`
pub async fn select_handler() -> Json<ApplyResponse> {
    Json(ApplyResponse {
        result: ResultStatus::success("選択肢設定完了"),
        apply: equipment_selector(),
    })
}

/// Handle product master column requests.
///
/// `GET /api/v1/master/fields`
pub async fn master_fields_handler(RawQuery(query): RawQuery) -> Json<FieldsResponse> {
    debug!(query = ?parse_query(query.as_deref()), "master/fields");

    Json(FieldsResponse {
        result: ResultStatus::success_with_remarks(vec!["商品フィールド取得成功".to_string()]),
        fields: &PRODUCT_FIELDS,
    })
}

/// Handle product master parameter requests.
///
/// `GET /api/v1/master/params`
pub async fn master_params_handler(RawQuery(query): RawQuery) -> Json<ParamsResponse> {
    debug!(query = ?parse_query(query.as_deref()), "master/params");

    Json(ParamsResponse {
        result: ResultStatus::success_with_remarks(vec!["パラメータ取得成功".to_string()]),
        params: &PRODUCT_PARAMS,
    })
}

/// Handle product record requests.
///
/// # Endpoint
///
/// `POST /api/v1/master/getrecords`
///
/// # Body
///
/// Field `data` holding `{"clusters": [{"parameter": ..., "value": ...}]}`.
/// Conditions are ANDed. If they match nothing, every record is returned.
/// A missing or unparseable `data` returns every record.
pub async fn master_records_handler(payload: FormPayload) -> Json<RecordsResponse> {
    let filters = match payload.data().map(FilterSet::from_json) {
        Some(Ok(filters)) => filters,
        Some(Err(e)) => {
            warn!(error = %e, "Failed to parse getrecords data");
            FilterSet::new()
        }
        None => FilterSet::new(),
    };

    let selection = filters.apply(&PRODUCTS);
    match selection.mode {
        SelectionMode::Fallback => {
            info!(filters = %filter_json(&filters), "No matching records, returning all records");
        }
        SelectionMode::Filtered => info!(
            total = PRODUCTS.len(),
            matched = selection.records.len(),
            "Filtered records"
        ),
        SelectionMode::Unfiltered => debug!("No filter conditions"),
    }

    Json(RecordsResponse {
        result: ResultStatus::success_with_remarks(record_remarks(
            selection.records.len(),
            &filters,
        )),
        fields: &PRODUCT_FIELDS,
        default_record: default_record().to_custom_record(),
        records: selection
            .records
            .iter()
            .map(|record| record.to_custom_record())
            .collect(),
    })
}

/// Handle requests that matched no route (or no method of a route).
pub async fn not_found_handler(uri: Uri) -> Response {
    debug!(path = %uri.path(), "Endpoint not found");

    let body = ResultResponse::new(ResultStatus::failure(format!(
        "エンドポイントが見つかりません: {}",
        uri.path()
    )));
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Remarks describing a record selection.
fn record_remarks(count: usize, filters: &FilterSet) -> Vec<String> {
    let condition = if filters.is_empty() {
        "全件取得".to_string()
    } else {
        format!("フィルタ条件: {}", filter_json(filters))
    };

    vec![
        "レコード取得成功".to_string(),
        format!("{}件のレコードを取得", count),
        condition,
    ]
}

fn filter_json(filters: &FilterSet) -> String {
    serde_json::to_string(filters).unwrap_or_default()
}

// =============================================================================
// Tests
// =============================================================================
