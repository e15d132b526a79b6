use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// The primary error type for the application.
///
/// Every handler returns [`AppResult`]; the `IntoResponse` impl renders the
/// `{"success": false, "error": <status>, "message": <reason>}` envelope the
/// trivia frontend expects.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or incomplete request.
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// A specific field failed validation.
    #[error("Validation error on field '{field}': {message}")]
    ValidationError { field: String, message: String },
    /// The resource does not exist, or the requested page is empty.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The path exists but not for this HTTP method.
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// The body exceeds `server.max_body_bytes`.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    /// The body is not declared as `application/json`.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    /// The request is well-formed but conflicts with stored data (duplicate question, unknown category).
    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {:?}", e);
                Some(format!("error id {}", error_id))
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                None
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                Some(msg.clone())
            }
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::UnsupportedMediaType(msg)
            | AppError::Unprocessable(msg) => Some(msg.clone()),
            AppError::ValidationError { field, message } => Some(format!("{}: {}", field, message)),
            AppError::MethodNotAllowed => None,
        };

        let mut body = json!({
            "success": false,
            "error": status.as_u16(),
            "message": status.canonical_reason().unwrap_or("Error"),
        });
        if let Some(detail) = detail {
            body["detail"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::ForeignKeyViolation => {
                    AppError::Unprocessable("Referenced category does not exist".to_string())
                }
                ErrorKind::UniqueViolation => AppError::Unprocessable(db_err.message().to_string()),
                _ => AppError::Database(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => {
                AppError::ServiceUnavailable("Database connection pool timed out".to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(rejection.body_text()),
            _ => AppError::BadRequest(rejection.body_text()),
        }
    }
}

// A non-integer id in the path means no such resource.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::NotFound(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Converts `None` into [`AppError::NotFound`].
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("{} not found", entity)))
    }
}

/// Field checks for incoming questions.
pub mod validation {
    use super::*;

    pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

    pub fn validate_not_blank(value: &str, field: &str) -> AppResult<()> {
        if value.trim().is_empty() {
            return Err(AppError::ValidationError {
                field: field.to_string(),
                message: "Value cannot be blank".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_difficulty(value: i64) -> AppResult<()> {
        if !DIFFICULTY_RANGE.contains(&value) {
            return Err(AppError::ValidationError {
                field: "difficulty".to_string(),
                message: format!(
                    "Value must be between {} and {}, got {}",
                    DIFFICULTY_RANGE.start(),
                    DIFFICULTY_RANGE.end(),
                    value
                ),
            });
        }
        Ok(())
    }
}
