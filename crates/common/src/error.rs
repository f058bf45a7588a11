//! Error types for univan.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Trip not found: {0}")]
    TripNotFound(String),

    #[error("Poll not found: {0}")]
    PollNotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Domain Errors ===
    #[error("Duplicate trip: {0}")]
    DuplicateTrip(String),

    #[error("Invalid trip state: {0}")]
    InvalidState(String),

    #[error("No stops: {0}")]
    NoStops(String),

    #[error("Stop not found: {0}")]
    StopNotFound(String),

    #[error("Missing position pointer: {0}")]
    MissingPointer(String),

    #[error("Already voted on this poll")]
    AlreadyVoted,

    #[error("Voting closed: {0}")]
    VotingClosed(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) | Self::TripNotFound(_) | Self::PollNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_)
            | Self::Validation(_)
            | Self::InvalidState(_)
            | Self::NoStops(_)
            | Self::VotingClosed(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_)
            | Self::DuplicateTrip(_)
            | Self::StopNotFound(_)
            | Self::AlreadyVoted => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::MissingPointer(_) | Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::TripNotFound(_) => "TRIP_NOT_FOUND",
            Self::PollNotFound(_) => "POLL_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::DuplicateTrip(_) => "DUPLICATE_TRIP",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::NoStops(_) => "NO_STOPS",
            Self::StopNotFound(_) => "STOP_NOT_FOUND",
            Self::MissingPointer(_) => "MISSING_POINTER",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::VotingClosed(_) => "VOTING_CLOSED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_client_statuses() {
        assert_eq!(
            AppError::DuplicateTrip("outbound".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidState("trip is not in progress".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NoStops("no boarding points for this trip".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::StopNotFound("bp1".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::AlreadyVoted.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_missing_pointer_is_server_error() {
        assert!(AppError::MissingPointer("outbound trip".to_string()).is_server_error());
        assert!(!AppError::AlreadyVoted.is_server_error());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            AppError::DuplicateTrip(String::new()).error_code(),
            "DUPLICATE_TRIP"
        );
        assert_eq!(
            AppError::VotingClosed(String::new()).error_code(),
            "VOTING_CLOSED"
        );
    }
}
