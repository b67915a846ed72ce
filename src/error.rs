use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::constants::MSG_UPSTREAM_NOT_FOUND;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Blockchain RPC error: {0}")]
    BlockchainRPC(String),

    #[error("Invalid frame signature")]
    InvalidSignature,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Transaction pending: {0}")]
    PendingConfirmation(String),

    #[error("External API error: {0}")]
    ExternalAPI(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Upstream failures collapse into the same user message as a missed lookup.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::BlockchainRPC(_) | AppError::ExternalAPI(_))
    }
}

/// Frame clients surface `message` as a toast and keep the current screen.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::NotFound(ref msg) => (StatusCode::BAD_REQUEST, "NOT_FOUND", msg.clone()),
            AppError::InvalidSignature => (
                StatusCode::BAD_REQUEST,
                "INVALID_SIGNATURE",
                "Invalid frame signature".to_string(),
            ),
            AppError::PendingConfirmation(_) => (
                StatusCode::BAD_REQUEST,
                "PENDING_CONFIRMATION",
                "Transaction still pending".to_string(),
            ),
            AppError::BlockchainRPC(ref cause) | AppError::ExternalAPI(ref cause) => {
                tracing::error!("Upstream failure: {}", cause);
                (
                    StatusCode::BAD_REQUEST,
                    "UPSTREAM_ERROR",
                    MSG_UPSTREAM_NOT_FOUND.to_string(),
                )
            }
            AppError::Internal(ref cause) => {
                tracing::error!("Internal error: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Something went wrong. Please try again.".to_string(),
                )
            }
        };

        tracing::debug!(code, %status, "frame error response");
        (status, Json(ErrorResponse { message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_are_flagged() {
        assert!(AppError::ExternalAPI("graph down".into()).is_upstream());
        assert!(AppError::BlockchainRPC("timeout".into()).is_upstream());
        assert!(!AppError::NotFound("fid:1".into()).is_upstream());
    }

    #[test]
    fn user_errors_map_to_bad_request() {
        let response = AppError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::ExternalAPI("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal("bug".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
