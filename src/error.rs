//! Typed errors and HTTP mapping.

use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Every failure a gateway handler can produce. Validation variants are raised
/// before any backend call; `Backend` wraps whatever the storage engine threw,
/// message passed through verbatim.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("malformed path: {0}")]
    MalformedPath(String),
    #[error("invalid body: {0}")]
    InvalidBody(String),
    #[error("missing required id: {0}")]
    MissingRequiredId(String),
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Backend(e.to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedPath(_)
            | ApiError::InvalidBody(_)
            | ApiError::MissingRequiredId(_)
            | ApiError::InvalidNamespace(_)
            | ApiError::EmptyInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
