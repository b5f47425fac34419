//! REST API endpoints.
//!
//! Axum-based HTTP API over the engine facade and roster service. Pure
//! delegation: request shapes are validated here, business rules live in
//! the engine.

pub mod routes;
pub mod state;

pub use routes::build_router;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::engine::EngineError;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InsufficientParticipants { .. }
            | EngineError::InvalidRoundNumber(_)
            | EngineError::InvalidScore(_)
            | EngineError::AlreadyRegistered { .. }
            | EngineError::UnsupportedPairingMethod(_) => ApiError::BadRequest(err.to_string()),
            EngineError::PairingNotFound(_)
            | EngineError::RoundNotFound(_)
            | EngineError::ParticipantNotFound(_) => ApiError::NotFound(err.to_string()),
            EngineError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityId;
    use crate::storage::StorageError;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            status_of(ApiError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::BadRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_engine_error_mapping() {
        let bad: ApiError = EngineError::InvalidScore(-1).into();
        assert!(matches!(bad, ApiError::BadRequest(_)));

        let insufficient: ApiError = EngineError::InsufficientParticipants { count: 1 }.into();
        assert!(matches!(insufficient, ApiError::BadRequest(_)));

        let missing: ApiError = EngineError::PairingNotFound(EntityId::from("x")).into();
        assert!(matches!(missing, ApiError::NotFound(_)));

        let storage: ApiError = EngineError::Storage(StorageError::MissingRecord(
            "x".to_string(),
        ))
        .into();
        assert!(matches!(storage, ApiError::Internal(_)));
    }
}
