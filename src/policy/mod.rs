//! Loan, reservation and access rules.
//!
//! Everything in here is a pure function over model records: no database,
//! no clock. Callers pass `today` and the authenticated role explicitly and
//! persist whatever the rules hand back.

pub mod access;
pub mod accounts;
pub mod loans;
pub mod reservations;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Length of a loan period, also the length of its single renewal.
pub const LOAN_DAYS: i64 = 7;

/// Fine charged per day past the due date.
pub const FINE_PER_DAY: i64 = 100;

/// How a rejected action is presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// User-facing rule violations. None of these is fatal: the caller is sent
/// back to a safe page with the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("The user does not have the {0} role")]
    WrongRole(String),

    #[error("You do not have permission to access this page")]
    PermissionDenied,

    #[error("This loan has already been renewed once")]
    AlreadyRenewed,

    #[error("This loan has already been returned")]
    AlreadyReturned,

    #[error("This loan has no fine")]
    NoFineDue,

    #[error("The book '{0}' is available, no reservation needed")]
    BookAvailable(String),

    #[error("The book '{0}' is currently on loan")]
    BookUnavailable(String),

    #[error("You cannot delete another administrator")]
    CannotDeleteAdministrator,

    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    #[error("The username {0} is already taken")]
    DuplicateUsername(String),

    #[error("The passwords do not match")]
    PasswordMismatch,

    #[error("Due date {due} is before loan date {loaned}")]
    InvalidDueDate { loaned: String, due: String },
}

impl PolicyError {
    pub fn severity(&self) -> Severity {
        match self {
            PolicyError::PermissionDenied
            | PolicyError::AlreadyRenewed
            | PolicyError::NoFineDue
            | PolicyError::BookAvailable(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable identifier used in error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            PolicyError::InvalidCredentials => "InvalidCredentials",
            PolicyError::WrongRole(_) => "WrongRole",
            PolicyError::PermissionDenied => "PermissionDenied",
            PolicyError::AlreadyRenewed => "AlreadyRenewed",
            PolicyError::AlreadyReturned => "AlreadyReturned",
            PolicyError::NoFineDue => "NoFineDue",
            PolicyError::BookAvailable(_) => "BookAvailable",
            PolicyError::BookUnavailable(_) => "BookUnavailable",
            PolicyError::CannotDeleteAdministrator => "CannotDeleteAdministrator",
            PolicyError::DuplicateIsbn(_) => "DuplicateIsbn",
            PolicyError::DuplicateUsername(_) => "DuplicateUsername",
            PolicyError::PasswordMismatch => "PasswordMismatch",
            PolicyError::InvalidDueDate { .. } => "InvalidDueDate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_and_errors() {
        assert_eq!(PolicyError::AlreadyRenewed.severity(), Severity::Warning);
        assert_eq!(PolicyError::BookAvailable("Dune".into()).severity(), Severity::Warning);
        assert_eq!(PolicyError::PermissionDenied.severity(), Severity::Warning);
        assert_eq!(PolicyError::CannotDeleteAdministrator.severity(), Severity::Error);
        assert_eq!(PolicyError::InvalidCredentials.severity(), Severity::Error);
    }

    #[test]
    fn test_messages_name_the_subject() {
        let err = PolicyError::BookAvailable("Rayuela".into());
        assert_eq!(err.to_string(), "The book 'Rayuela' is available, no reservation needed");
        assert_eq!(err.kind(), "BookAvailable");
    }
}
