//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Ordered list of field violations, all collected before rejecting.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "validation failed".to_string(),
                Some(serde_json::json!(violations)),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            AppError::Db(e) => match classify_db_error(&e) {
                Some(DbRejection::Duplicate) => (
                    StatusCode::CONFLICT,
                    "conflict",
                    "duplicate value violates a uniqueness constraint".to_string(),
                    None,
                ),
                Some(DbRejection::MissingReference) => (
                    StatusCode::BAD_REQUEST,
                    "bad_request",
                    "referenced record does not exist".to_string(),
                    None,
                ),
                None => {
                    // Fault detail stays in the log, never in the response.
                    tracing::error!(error = %e, "database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "internal server error".to_string(),
                        None,
                    )
                }
            },
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                    None,
                )
            }
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

enum DbRejection {
    Duplicate,
    MissingReference,
}

/// Client-caused constraint failures surfaced by the storage layer: unique
/// violations and foreign-key violations. Everything else is an internal fault.
fn classify_db_error(e: &sqlx::Error) -> Option<DbRejection> {
    let db_err = match e {
        sqlx::Error::Database(d) => d,
        _ => return None,
    };
    match db_err.kind() {
        sqlx::error::ErrorKind::UniqueViolation => Some(DbRejection::Duplicate),
        sqlx::error::ErrorKind::ForeignKeyViolation => Some(DbRejection::MissingReference),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = AppError::Validation(vec![
            "username must be at least 3 characters".into(),
            "email must be a valid email address".into(),
        ]);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::NotFound("User not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let resp = AppError::Conflict("email already in use".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unexpected_db_error_maps_to_500() {
        let resp = AppError::Db(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_maps_to_500() {
        let resp = AppError::Internal("hashing failed".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_message_joins_violations() {
        let err = AppError::Validation(vec!["a is required".into(), "b is required".into()]);
        assert_eq!(
            err.to_string(),
            "validation failed: a is required; b is required"
        );
    }
}
