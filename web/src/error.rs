//! Error types for web handlers.
//!
//! Bridges the domain error taxonomy to HTTP responses via Axum's
//! `IntoResponse`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use packstation_core::ReservationError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps domain errors and produces `{code, message}` JSON bodies with the
/// matching HTTP status. Authorization failures additionally carry the
/// role-specific login prompt URL the original UI redirected to.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Login prompt for authorization failures
    login_url: Option<String>,
    /// Internal error (for logging, not exposed to client)
    #[allow(dead_code)]
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            login_url: None,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach the login prompt URL for the role this operation requires.
    #[must_use]
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = Some(login_url.into());
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::Validation { reason } => Self::validation(reason),
            ReservationError::NotFound { key } => Self::not_found("Reservation", key),
            ReservationError::Conflict { reason } => Self::conflict(reason),
            ReservationError::Persistence { reason } => {
                Self::internal("Could not persist reservation")
                    .with_source(anyhow::anyhow!(reason))
            }
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
    /// Role-specific login prompt, present on authorization failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    login_url: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            login_url: self.login_url,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Reservation", "R123456");
        assert_eq!(
            err.to_string(),
            "[NOT_FOUND] Reservation with id R123456 not found"
        );
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn domain_errors_map_to_http_statuses() {
        let err: AppError = ReservationError::validation("itemDescription required").into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err: AppError = ReservationError::not_found("R1").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: AppError = ReservationError::conflict("Already claimed").into();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err: AppError = ReservationError::persistence("disk full").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn login_url_round_trips() {
        let err = AppError::unauthorized("frontdesk role required")
            .with_login_url("/login?role=frontdesk");
        assert_eq!(err.login_url.as_deref(), Some("/login?role=frontdesk"));
    }
}
