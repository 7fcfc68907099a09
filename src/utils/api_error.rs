// HTTP-boundary error type
// Every handler and the auth gate return this; no driver text reaches clients

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::PoolError;
use crate::services::jwt::JwtError;
use crate::utils::password::PasswordError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Missing credential")]
    MissingCredential,

    #[error("Invalid or expired credential")]
    InvalidCredential,

    #[error("Invalid email or password")]
    InvalidLogin,

    #[error("Insufficient privileges")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    #[error("Internal server error")]
    InternalError,
}

/// Standard error response structure
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub description: String,
}

impl ApiError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingCredential => StatusCode::FORBIDDEN,
            ApiError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ApiError::InvalidLogin => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::MissingCredential => "MISSING_TOKEN",
            ApiError::InvalidCredential => "INVALID_TOKEN",
            ApiError::InvalidLogin => "INVALID_CREDENTIALS",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ApiError::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorResponse {
            success: false,
            error: ErrorDetail {
                code: self.error_code().to_string(),
                description: self.to_string(),
            },
            message: self.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

// Conversion from various error types. Details are logged here, not returned.

impl From<PoolError> for ApiError {
    fn from(error: PoolError) -> Self {
        if error.is_retryable() {
            ApiError::ServiceUnavailable
        } else {
            tracing::error!("Connection-scoped operation failed: {}", error);
            ApiError::InternalError
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match error {
            Error::NotFound => ApiError::NotFound("Resource"),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict("Resource already exists".to_string())
            },
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                ApiError::ValidationError("Referenced resource does not exist".to_string())
            },
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::InternalError
            },
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        tracing::error!("Password hashing failure: {}", error);
        ApiError::InternalError
    }
}

impl From<JwtError> for ApiError {
    fn from(error: JwtError) -> Self {
        if error.is_verification_failure() {
            ApiError::InvalidCredential
        } else {
            tracing::error!("Token signing failure: {}", error);
            ApiError::InternalError
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        messages.sort();
        ApiError::ValidationError(messages.join(", "))
    }
}
