//!
//! # HTTP error handling
//!
//! This module defines `AppError`, the error type returned by every request
//! handler. It maps the library errors (configuration, data access, model
//! setters, token handling) and validation code lists onto HTTP responses
//! with JSON bodies.
//!
//! `AppError` implements `actix_web::error::ResponseError`, and the `From`
//! implementations below let handlers use the `?` operator on library calls.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

use crate::config::ConfigurationError;
use crate::database::DatabaseError;
use crate::models::ModelError;
use crate::validation::ValidationCode;

/// Represents all possible errors surfaced by the HTTP layer.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    Unauthorized(String),
    /// The request could not be understood (HTTP 400).
    BadRequest(String),
    /// The requested project or task does not exist (HTTP 404).
    NotFound(String),
    /// An unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// A data-access failure (HTTP 500).
    DatabaseError(String),
    /// The submission failed validation (HTTP 422). Carries every violated rule.
    ValidationError(Vec<ValidationCode>),
}

impl AppError {
    pub fn project_not_found(project_id: i32) -> Self {
        AppError::NotFound(format!("Project {} not found", project_id))
    }

    pub fn task_not_found(project_id: i32, task_id: i32) -> Self {
        AppError::NotFound(format!(
            "Task {} not found in project {}",
            task_id, project_id
        ))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(codes) => {
                let codes: Vec<&str> = codes.iter().map(ValidationCode::as_str).collect();
                write!(f, "Validation Error: {}", codes.join(", "))
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                json!({ "error": msg })
            }
            AppError::InternalServerError(msg) => {
                log::error!("Internal server error: {}", msg);
                json!({ "error": "Internal server error" })
            }
            // Backend details are logged, not sent to the client.
            AppError::DatabaseError(msg) => {
                log::error!("Database error: {}", msg);
                json!({ "error": "Database error" })
            }
            AppError::ValidationError(codes) => json!({ "errors": codes }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<ConfigurationError> for AppError {
    fn from(error: ConfigurationError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Setter rejections only happen after validation passed, so they are server faults.
impl From<ModelError> for AppError {
    fn from(error: ModelError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::project_not_found(3);
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::ValidationError(vec![ValidationCode::NameBlank]);
        assert_eq!(error.error_response().status(), 422);

        let error: AppError = DatabaseError::DataIntegrity("duplicate key".into()).into();
        assert_eq!(error.error_response().status(), 500);

        let error: AppError = ConfigurationError::MissingKey("SECRET_KEY").into();
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_status_code_matches_response() {
        let cases = [
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::task_not_found(1, 2), StatusCode::NOT_FOUND),
            (
                AppError::InternalServerError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::DatabaseError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::ValidationError(vec![ValidationCode::NameBlank]),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected);
            assert_eq!(error.error_response().status(), expected);
        }
    }

    #[test]
    fn test_middleware_errors_keep_their_status() {
        // Errors raised outside a handler are read back through `status_code`.
        let error: actix_web::Error = AppError::Unauthorized("Missing token".into()).into();
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_validation_error_display() {
        let error = AppError::ValidationError(vec![
            ValidationCode::NameBlank,
            ValidationCode::DescriptionLength,
        ]);
        assert_eq!(
            error.to_string(),
            "Validation Error: name_blank, description_length"
        );
    }

    #[actix_rt::test]
    async fn test_validation_error_body_lists_codes() {
        let error = AppError::ValidationError(vec![
            ValidationCode::NameDuplicate,
            ValidationCode::StatusInvalid,
        ]);
        let body = actix_web::body::to_bytes(error.error_response().into_body())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({"errors": ["name_duplicate", "status_invalid"]}));
    }
}
