//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error code.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing, forged or expired session tokens
/// - **Resource Errors**: Requested call, transcript, analysis or account not found
/// - **Validation Errors**: Invalid query parameters or request bodies
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// `sqlx::Error::RowNotFound` is reported as 404, everything else as 500.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session token is missing, malformed, forged or expired, or the
    /// mocked login was given the wrong credentials.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Unauthorized")]
    Unauthorized,

    /// Requested entity does not exist.
    ///
    /// The string is the entity name (`call`, `transcript`, ...), used to build
    /// both the error code and the message.
    #[error("{} not found", capitalize(.0))]
    NotFound(&'static str),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Unexpected server-side failure outside the database.
    ///
    /// Returns HTTP 500; the message is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, String) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            AppError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, format!("{}_not_found", entity))
            }
            AppError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request".to_string())
            }
            AppError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "not_found".to_string())
            }
            AppError::Database(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error".to_string(),
            ),
        }
    }
}

// Rejections raised while parsing a request keep axum's message but use our
// error body.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "call_not_found",
///     "message": "Call not found"
///   }
/// }
/// ```
///
/// Database failures other than "no rows" and internal errors never leak
/// their cause to the client; the cause is logged instead.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(sqlx::Error::RowNotFound) => "Resource not found".to_string(),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "An internal error occurred".to_string()
            }
            AppError::Internal(reason) => {
                tracing::error!(reason = %reason, "internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
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
    fn maps_variants_to_status_codes() {
        assert_eq!(
            AppError::Unauthorized.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidRequest("bad".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut)
                .status_and_code()
                .0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("overflow".into()).status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error".to_string())
        );
    }

    #[test]
    fn row_not_found_becomes_404() {
        let (status, code) = AppError::Database(sqlx::Error::RowNotFound).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "not_found");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = AppError::NotFound("transcript");
        assert_eq!(err.to_string(), "Transcript not found");
        assert_eq!(err.status_and_code().1, "transcript_not_found");
    }

    #[test]
    fn json_rejection_becomes_invalid_request() {
        let rejection = JsonRejection::from(axum::extract::rejection::MissingJsonContentType::default());
        let err = AppError::from(rejection);

        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "invalid_request".to_string()));
        assert!(err.to_string().contains("Content-Type"));
    }
}
