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

use crate::models::account::FieldError;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Storage Errors**: the persistence collaborator failed (connection, SQL, JSON decoding)
/// - **Resource Errors**: Requested account not found
/// - **Validation Errors**: creation or deletion rules were violated
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested account does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account not found")]
    AccountNotFound,

    /// One or more field rules failed.
    ///
    /// Returns HTTP 422 Unprocessable Entity with every field error.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl AppError {
    /// Human-readable messages, one per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            AppError::Validation(errors) => errors.iter().map(|e| e.message.clone()).collect(),
            AppError::InvalidRequest(msg) => vec![msg.clone()],
            AppError::Database(_) => vec!["An internal error occurred".to_string()],
            AppError::AccountNotFound => vec![self.to_string()],
        }
    }

    /// Field-tagged errors, only present for validation failures.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

// Extractor rejections keep the JSON error envelope instead of axum's plain text.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "validation_failed",
///     "message": "Validation failed"
///   },
///   "errors": ["This code is already in use"],
///   "fieldErrors": [{ "field": "code", "message": "This code is already in use" }]
/// }
/// ```
///
/// `fieldErrors` is only present for validation failures.
///
/// # Status Code Mapping
///
/// - `AccountNotFound` → 404 Not Found
/// - `Validation` → 422 Unprocessable Entity
/// - `InvalidRequest` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::AccountNotFound => {
                (StatusCode::NOT_FOUND, "account_not_found", self.to_string())
            }
            AppError::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_failed",
                self.to_string(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(ref e) => {
                tracing::error!("storage failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message
            },
            "errors": self.messages(),
        });
        if let Some(field_errors) = self.field_errors() {
            body["fieldErrors"] = json!(field_errors);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn validation_errors_render_field_errors() {
        let error = AppError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("code", "Code is required"),
        ]);
        assert_eq!(error.messages(), vec!["Name is required", "Code is required"]);

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "validation_failed");
        assert_eq!(body["fieldErrors"][1]["field"], "code");
    }

    #[test]
    fn not_found_has_no_field_errors() {
        let error = AppError::AccountNotFound;
        assert!(error.field_errors().is_none());
        assert_eq!(error.messages(), vec!["Account not found"]);
    }
}
