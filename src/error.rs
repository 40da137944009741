//! Error types for Biblioteca server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::policy::{PolicyError, Severity};

/// Numeric error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NotFound = 4,
    BadValue = 5,
    Duplicate = 6,
    InvalidCredentials = 10,
    WrongRole = 11,
    PermissionDenied = 12,
    AlreadyRenewed = 13,
    AlreadyReturned = 14,
    NoFineDue = 15,
    BookAvailable = 16,
    BookUnavailable = 17,
    CannotDeleteAdministrator = 18,
    PasswordMismatch = 19,
    InvalidDueDate = 20,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// A rule violation shown to the user, with the page to go back to
    #[error("{error}")]
    Policy {
        error: PolicyError,
        redirect: Option<&'static str>,
    },
}

impl AppError {
    /// Attach the page the client should return to. Only policy errors
    /// carry one.
    pub fn redirect_to(self, path: &'static str) -> Self {
        match self {
            AppError::Policy { error, .. } => AppError::Policy {
                error,
                redirect: Some(path),
            },
            other => other,
        }
    }
}

/// Map a unique-constraint violation to `conflict`, any other database
/// error to `AppError::Database`.
pub fn or_conflict(error: sqlx::Error, conflict: PolicyError) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => conflict.into(),
        _ => AppError::Database(error),
    }
}

impl From<PolicyError> for AppError {
    fn from(error: PolicyError) -> Self {
        AppError::Policy {
            error,
            redirect: None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    pub level: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

fn policy_status(error: &PolicyError) -> (StatusCode, ErrorCode) {
    match error {
        PolicyError::InvalidCredentials => (StatusCode::UNAUTHORIZED, ErrorCode::InvalidCredentials),
        PolicyError::WrongRole(_) => (StatusCode::FORBIDDEN, ErrorCode::WrongRole),
        PolicyError::PermissionDenied => (StatusCode::FORBIDDEN, ErrorCode::PermissionDenied),
        PolicyError::CannotDeleteAdministrator => {
            (StatusCode::FORBIDDEN, ErrorCode::CannotDeleteAdministrator)
        }
        PolicyError::AlreadyRenewed => (StatusCode::CONFLICT, ErrorCode::AlreadyRenewed),
        PolicyError::AlreadyReturned => (StatusCode::CONFLICT, ErrorCode::AlreadyReturned),
        PolicyError::NoFineDue => (StatusCode::CONFLICT, ErrorCode::NoFineDue),
        PolicyError::BookAvailable(_) => (StatusCode::CONFLICT, ErrorCode::BookAvailable),
        PolicyError::BookUnavailable(_) => (StatusCode::CONFLICT, ErrorCode::BookUnavailable),
        PolicyError::DuplicateIsbn(_) | PolicyError::DuplicateUsername(_) => {
            (StatusCode::CONFLICT, ErrorCode::Duplicate)
        }
        PolicyError::PasswordMismatch => (StatusCode::BAD_REQUEST, ErrorCode::PasswordMismatch),
        PolicyError::InvalidDueDate { .. } => (StatusCode::BAD_REQUEST, ErrorCode::InvalidDueDate),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Policy { error, redirect } => {
                let (status, code) = policy_status(&error);
                tracing::warn!("{}: {}", error.kind(), error);
                let body = ErrorResponse {
                    code: code as u32,
                    error: error.kind().to_string(),
                    message: error.to_string(),
                    level: error.severity(),
                    redirect: redirect.map(str::to_string),
                };
                (status, body)
            }
            AppError::Authentication(msg) => {
                error_body(StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg)
            }
            AppError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
            AppError::Validation(msg) => error_body(StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn error_body(status: StatusCode, code: ErrorCode, message: String) -> (StatusCode, ErrorResponse) {
    let body = ErrorResponse {
        code: code as u32,
        error: format!("{:?}", code),
        message,
        level: Severity::Error,
        redirect: None,
    };
    (status, body)
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
