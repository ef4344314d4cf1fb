//! Error types for the car rental server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Postgres SQLSTATE for exclusion constraint violations
const EXCLUSION_VIOLATION: &str = "23P01";
/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// One invalid request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// A business rule forbids the operation in the current state
    #[error("State conflict: {0}")]
    StateConflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation error on a single field
    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::Validation {
            message: "Invalid input data".to_string(),
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::StateConflict(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                Some(EXCLUSION_VIOLATION) => {
                    return AppError::StateConflict(
                        "Car is already booked for these dates".to_string(),
                    )
                }
                Some(UNIQUE_VIOLATION) => {
                    return AppError::StateConflict(
                        "A record with the same unique value already exists".to_string(),
                    )
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return AppError::StateConflict(
                        "Record is still referenced by other records".to_string(),
                    )
                }
                _ => {}
            }
        }
        AppError::Database(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = e
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                let field = camel_case(&field);
                list.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation {
            message: "Invalid input data".to_string(),
            errors,
        }
    }
}

/// Request structs are validated by Rust field name; clients see camelCase keys.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Error response body
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, errors) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("Internal server error".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::Validation { message, errors } => {
                tracing::debug!("Validation failed: {} field(s)", errors.len());
                (message, Some(errors))
            }
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::StateConflict(msg)
            | AppError::BadRequest(msg) => {
                tracing::debug!("Request rejected ({}): {}", status, msg);
                (msg, None)
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 0, max = 100, message = "Fuel must be between 0 and 100"))]
        fuel: i32,
        #[validate(length(min = 1, message = "Location is required"))]
        location: String,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_camel_case_field_names() {
        assert_eq!(camel_case("start_date"), "startDate");
        assert_eq!(camel_case("fuel"), "fuel");
    }

    #[test]
    fn test_status_codes_by_kind() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::StateConflict("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Authorization("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Authentication("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_are_flattened_per_field() {
        let sample = Sample {
            fuel: 140,
            location: String::new(),
        };
        let err: AppError = sample.validate().unwrap_err().into();
        match err {
            AppError::Validation { errors, .. } => {
                assert_eq!(
                    errors,
                    vec![
                        FieldError::new("fuel", "Fuel must be between 0 and 100"),
                        FieldError::new("location", "Location is required"),
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_internal_message_is_redacted() {
        let response = AppError::Internal("connection string leaked".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_validation_envelope_lists_fields() {
        let response = AppError::invalid_field("endDate", "End date must be after start date")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0]["field"], "endDate");
    }
}
