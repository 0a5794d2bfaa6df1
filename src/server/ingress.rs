//! Request decoding shared by the handlers.
//!
//! [`FormPayload`] turns whatever body the client sent into flat text fields
//! plus in-memory file attachments:
//!
//! - `multipart/form-data`: text parts become fields, parts with a file name
//!   become [`UploadedFile`]s (any field name is accepted)
//! - `application/x-www-form-urlencoded`: every pair becomes a field
//! - `application/json`: top-level object members become fields; non-string
//!   members keep their JSON text
//!
//! Any other content type, or none, yields an empty payload.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, Method},
};
use serde_json::Value;
use tracing::warn;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::upload::UploadedFile;

/// Name of the form field carrying a JSON document.
pub const DATA_FIELD: &str = "data";

/// Name of the field selecting the equipment profile.
pub const PLC_ID_FIELD: &str = "plc_id";

/// Decoded query string. Repeated keys keep their last value.
pub type QueryParams = HashMap<String, String>;

/// Parse a raw query string.
pub fn parse_query(query: Option<&str>) -> QueryParams {
    query
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Decoded request body.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    /// Text fields in the order received
    pub fields: Vec<(String, String)>,

    /// Attached files in the order received
    pub files: Vec<UploadedFile>,
}

impl FormPayload {
    /// First value of the named text field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `data` field, if present and non-empty.
    pub fn data(&self) -> Option<&str> {
        self.field(DATA_FIELD).filter(|data| !data.is_empty())
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut payload = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_owned);
                    let data = field.bytes().await?;
                    payload.files.push(UploadedFile {
                        field_name: name,
                        file_name,
                        content_type,
                        data,
                    });
                }
                None => {
                    let value = field.text().await?;
                    payload.fields.push((name, value));
                }
            }
        }

        Ok(payload)
    }

    fn from_urlencoded(body: &[u8]) -> Self {
        Self {
            fields: form_urlencoded::parse(body).into_owned().collect(),
            files: Vec::new(),
        }
    }

    fn from_json(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }

        match serde_json::from_slice::<serde_json::Map<String, Value>>(body) {
            Ok(object) => Self {
                fields: object
                    .into_iter()
                    .map(|(key, value)| match value {
                        Value::String(text) => (key, text),
                        other => (key, other.to_string()),
                    })
                    .collect(),
                files: Vec::new(),
            },
            Err(e) => {
                warn!(error = %e, "Ignoring unparseable JSON body");
                Self::default()
            }
        }
    }
}

impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let body = Bytes::from_request(req, state).await?;
            Ok(Self::from_urlencoded(&body))
        } else if content_type.starts_with("application/json") {
            let body = Bytes::from_request(req, state).await?;
            Ok(Self::from_json(&body))
        } else {
            Ok(Self::default())
        }
    }
}

/// A `getValue` request, resolved once at entry.
#[derive(Debug, Clone)]
pub enum ValueRequest {
    /// Any non-POST request: only the query string is consulted
    Query { params: QueryParams },

    /// A POST request: query string plus decoded body
    Form {
        params: QueryParams,
        payload: FormPayload,
    },
}

impl ValueRequest {
    pub fn resolve(method: &Method, params: QueryParams, payload: FormPayload) -> Self {
        if *method == Method::POST {
            ValueRequest::Form { params, payload }
        } else {
            ValueRequest::Query { params }
        }
    }

    pub fn params(&self) -> &QueryParams {
        match self {
            ValueRequest::Query { params } | ValueRequest::Form { params, .. } => params,
        }
    }

    /// The equipment discriminator: the query string wins, then the body.
    pub fn plc_id(&self) -> Option<&str> {
        let from_query = self
            .params()
            .get(PLC_ID_FIELD)
            .map(String::as_str)
            .filter(|id| !id.is_empty());

        match self {
            ValueRequest::Query { .. } => from_query,
            ValueRequest::Form { payload, .. } => {
                from_query.or_else(|| payload.field(PLC_ID_FIELD).filter(|id| !id.is_empty()))
            }
        }
    }

    /// Raw `data` JSON text. Only POST requests carry one.
    pub fn data(&self) -> Option<&str> {
        match self {
            ValueRequest::Query { .. } => None,
            ValueRequest::Form { payload, .. } => payload.data(),
        }
    }

    pub fn files(&self) -> &[UploadedFile] {
        match self {
            ValueRequest::Query { .. } => &[],
            ValueRequest::Form { payload, .. } => &payload.files,
        }
    }
}
