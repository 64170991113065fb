//! API error type and its HTTP mapping.
//!
//! Every failure a handler can produce carries a stable machine-readable
//! code alongside its status, so the page script can react without parsing
//! messages.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use shards::cascade::CascadeError;
use shards::store::{PageKey, StoreError};

/// Stable error code reported to clients.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid page: {0}")]
    InvalidPage(StoreError),
    #[error("{0}")]
    InvalidShard(CascadeError),
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("invalid state string: {0}")]
    InvalidState(StoreError),
    #[error("stored locks for page {page} do not fit this pentagon: {source}")]
    LocksDoNotFit { page: PageKey, source: CascadeError },
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPage(_) => "E_INVALID_PAGE",
            Self::InvalidShard(_) | Self::InvalidBody(_) => "E_INVALID_ARGUMENT",
            Self::InvalidState(_) => "E_INVALID_STATE",
            Self::LocksDoNotFit { .. } => "E_LOCKS_DO_NOT_FIT",
        }
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPage(_) | Self::InvalidShard(_) | Self::InvalidBody(_) | Self::InvalidState(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::LocksDoNotFit { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { code: self.error_code(), message: self.to_string() };
        (self.status(), Json(body)).into_response()
    }
}
