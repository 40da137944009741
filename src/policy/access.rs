//! Role-based access gate
//!
//! One table keyed by (role, action). Handlers ask [`authorize`] before doing
//! anything; a denial is a warning that sends the user back to `/`.

use serde::Serialize;
use utoipa::ToSchema;

use super::PolicyError;
use crate::models::user::Role;

/// Landing surface for denied requests
pub const NEUTRAL_LANDING: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    StudentDashboard,
    ProfessorDashboard,
    LibrarianDashboard,
    AdminPanel,
    ManageUsers,
    ManageBooks,
    DeleteUser,
    ManageSettings,
    ReserveBook,
    RenewLoan,
    CheckoutLoan,
    ReturnLoan,
    PayFine,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::StudentDashboard,
        Action::ProfessorDashboard,
        Action::LibrarianDashboard,
        Action::AdminPanel,
        Action::ManageUsers,
        Action::ManageBooks,
        Action::DeleteUser,
        Action::ManageSettings,
        Action::ReserveBook,
        Action::RenewLoan,
        Action::CheckoutLoan,
        Action::ReturnLoan,
        Action::PayFine,
    ];

    /// Roles allowed to perform this action
    pub fn allowed_roles(self) -> &'static [Role] {
        use Role::*;
        match self {
            Action::StudentDashboard => &[Student],
            Action::ProfessorDashboard => &[Professor],
            Action::LibrarianDashboard => &[Librarian],
            Action::AdminPanel
            | Action::ManageUsers
            | Action::ManageBooks
            | Action::DeleteUser
            | Action::ManageSettings => &[Administrator],
            Action::ReserveBook | Action::RenewLoan => &[Administrator, Librarian, Professor, Student],
            Action::CheckoutLoan | Action::ReturnLoan | Action::PayFine => &[Librarian],
        }
    }
}

pub fn is_allowed(role: Role, action: Action) -> bool {
    action.allowed_roles().contains(&role)
}

pub fn authorize(role: Role, action: Action) -> Result<(), PolicyError> {
    if is_allowed(role, action) {
        Ok(())
    } else {
        tracing::warn!("Access denied: role {} attempted {:?}", role, action);
        Err(PolicyError::PermissionDenied)
    }
}
