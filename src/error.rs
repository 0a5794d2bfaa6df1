use std::path::PathBuf;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::BytesRejection;
use thiserror::Error;

/// Errors raised while persisting an uploaded file
#[derive(Debug, Error)]
pub enum UploadError {
    /// The uploads directory could not be created
    #[error("failed to create upload directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file contents could not be written
    #[error("failed to write upload {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Faults that abort a request with the generic 500 response.
///
/// Application-level problems (bad token, unparseable `data` JSON) never end
/// up here; those are answered in-band or silently degraded.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Writing an attachment to the uploads directory failed
    #[error("{0}")]
    Upload(#[from] UploadError),

    /// The multipart stream was malformed or truncated
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// The request body could not be read (e.g. it exceeded the size limit)
    #[error("Body error: {0}")]
    Body(String),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(err: MultipartRejection) -> Self {
        ApiError::Multipart(err.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(err: BytesRejection) -> Self {
        ApiError::Body(err.body_text())
    }
}
