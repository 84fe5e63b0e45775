//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No row has the requested id
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The service rejected the payload itself
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound { .. } => return StatusCode::NOT_FOUND.into_response(),
            // Handlers do not map rejected payloads, so they surface as server errors
            ApiError::InvalidInput(msg) => {
                error!("Unhandled invalid input: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Database(err) if err.is_conflict() => (StatusCode::CONFLICT, err.to_string()),
            ApiError::Database(err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::NotFound {
            entity: "Apartment",
            id: 9,
        };
        assert_eq!(not_found.to_string(), "Apartment with id 9 not found");
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid = ApiError::InvalidInput("Apartment cannot be null".into());
        assert_eq!(
            invalid.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let conflict = ApiError::Database(DatabaseError::ForeignKey("bookings.user_id".into()));
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let broken = ApiError::Database(DatabaseError::Codec("bad row".into()));
        assert_eq!(
            broken.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
