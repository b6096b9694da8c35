//! Custom error types and handling
//!
//! This module defines the application's error types and implements
//! conversion to HTTP responses for the Axum framework.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A concurrent writer won the race at commit time; the caller may retry
    #[error("Conflict: {0}")]
    Conflict(String),

    // Registration outcomes
    #[error("Cannot register for past events.")]
    PastEvent,

    #[error("You are already registered for this event.")]
    AlreadyRegistered,

    #[error("This event is already full.")]
    EventFull,

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::Conflict(_) => "CONFLICT",
            Self::PastEvent => "PAST_EVENT",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::EventFull => "EVENT_FULL",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PastEvent | Self::AlreadyRegistered | Self::EventFull => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether repeating the whole operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Map a commit-time storage failure of a registration write.
    ///
    /// Unique violations, serialization failures and deadlocks all mean another
    /// writer got there first; everything else goes through the generic mapping.
    pub fn from_registration_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let lost_race = db_err.is_unique_violation()
                || matches!(db_err.code().as_deref(), Some("40001") | Some("40P01"));
            if lost_race {
                return AppError::Conflict(
                    "Registration changed concurrently, please retry".to_string(),
                );
            }
        }
        err.into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

// Implement From for common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Check for unique constraint violations
                if db_err.is_unique_violation() {
                    AppError::AlreadyExists("Resource already exists".to_string())
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct StubDbError {
        code: &'static str,
        unique: bool,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "stub database error {}", self.code)
        }
    }

    impl std::error::Error for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "stub database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    fn db_error(code: &'static str, unique: bool) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { code, unique }))
    }

    #[test]
    fn test_registration_outcomes_are_unprocessable() {
        for err in [AppError::PastEvent, AppError::AlreadyRegistered, AppError::EventFull] {
            assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_registration_messages() {
        assert_eq!(AppError::PastEvent.to_string(), "Cannot register for past events.");
        assert_eq!(
            AppError::AlreadyRegistered.to_string(),
            "You are already registered for this event."
        );
        assert_eq!(AppError::EventFull.to_string(), "This event is already full.");
    }

    #[test]
    fn test_conflict_is_retryable() {
        let err = AppError::Conflict("lost race".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_lost_registration_races_map_to_conflict() {
        for err in [
            db_error("23505", true),
            db_error("40001", false),
            db_error("40P01", false),
        ] {
            let mapped = AppError::from_registration_write(err);
            assert!(matches!(mapped, AppError::Conflict(_)), "{mapped:?}");
            assert!(mapped.is_retryable());
            assert_eq!(mapped.status_code(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_other_write_failures_are_not_retryable() {
        let mapped = AppError::from_registration_write(db_error("23503", false));
        assert!(matches!(mapped, AppError::Database(_)));
        assert!(!mapped.is_retryable());

        let mapped = AppError::from_registration_write(sqlx::Error::PoolTimedOut);
        assert!(matches!(mapped, AppError::Database(_)));
    }
}
