use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::orchestrator::LookupError;
use crate::matching::embedding::EmbeddingError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Storage error: {0}")]
    Storage(StoreError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate { .. } => AppError::Conflict(e.to_string()),
            StoreError::NotFound { .. } => AppError::NotFound(e.to_string()),
            other => AppError::Storage(other),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::UnknownJob(_) => AppError::NotFound(e.to_string()),
            LookupError::NoCandidates(_) => AppError::UnprocessableEntity(e.to_string()),
            LookupError::Store(inner) => inner.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EMBEDDING_ERROR",
                    "The embedding backend failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_http_statuses() {
        let dup: AppError = StoreError::Duplicate {
            entity: "candidate",
            id: "7".to_string(),
        }
        .into();
        assert_eq!(dup.into_response().status(), StatusCode::CONFLICT);

        let missing: AppError = StoreError::NotFound {
            entity: "candidate",
            id: "7".to_string(),
        }
        .into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_lookup_errors_map_to_http_statuses() {
        let unknown: AppError = LookupError::UnknownJob("J9".to_string()).into();
        assert_eq!(unknown.into_response().status(), StatusCode::NOT_FOUND);

        let empty: AppError = LookupError::NoCandidates("J2".to_string()).into();
        assert_eq!(
            empty.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
