//! Error conversions and boundary integrations
//!
//! Classification of infrastructure errors into [`ErrorKind`] and the
//! HTTP response rendering for [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// SQLx classification (feature-gated)
// ============================================================================

/// Classify a sqlx error into an [`ErrorKind`].
///
/// PostgreSQL error codes:
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
#[cfg(feature = "sqlx")]
pub fn sqlx_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => ErrorKind::ServiceUnavailable,
        sqlx::Error::Io(_) => ErrorKind::ServiceUnavailable,
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            // Class 23 - Integrity Constraint Violation
            Some("23505") => ErrorKind::Conflict,
            Some("23502") | Some("23514") => ErrorKind::BadRequest,
            Some("23000") | Some("23503") => ErrorKind::Conflict,
            // Class 53 - Insufficient Resources, Class 57 - Operator Intervention
            Some(code) if code.starts_with("53") || code.starts_with("57") => {
                ErrorKind::ServiceUnavailable
            }
            _ => ErrorKind::InternalServerError,
        },
        _ => ErrorKind::InternalServerError,
    }
}

/// True when the sqlx error is a unique-constraint violation (23505).
///
/// Used by repositories to turn "duplicate key" into a domain-level
/// conflict the caller can recover from.
#[cfg(feature = "sqlx")]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

// ============================================================================
// Axum response rendering (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
        });

        (status, Json(body)).into_response()
    }
}
