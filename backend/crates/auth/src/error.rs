//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Request-time errors are mapped to
//! an HTTP status at the handler boundary; token rejections never tell
//! the caller which check failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::sqlx_error_kind;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login payload is missing or incomplete
    #[error("Invalid login payload: {0}")]
    InvalidLoginPayload(&'static str),

    /// No refresh token was presented
    #[error("Refresh token was not provided")]
    RefreshTokenMissing,

    /// Presented refresh token was rejected (reason withheld)
    #[error("Refresh token is not valid")]
    RefreshTokenInvalid,

    /// Presented access credential was missing or rejected
    #[error("Unauthorized")]
    Unauthorized,

    /// A user with this email already exists
    #[error("Email is already registered")]
    EmailTaken,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidLoginPayload(_) => ErrorKind::BadRequest,
            AuthError::RefreshTokenMissing | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::RefreshTokenInvalid => ErrorKind::Forbidden,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Database(e) => sqlx_error_kind(e),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::RefreshTokenInvalid => {
                tracing::warn!("Refresh token rejected");
            }
            AuthError::Unauthorized => {
                tracing::debug!("Access token missing or rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
