//! Context handed to the presentation layer for each dashboard

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{book::Book, loan::LoanDetails, reservation::ReservationDetails, user::User};

/// Librarian dashboard context
#[derive(Debug, Serialize, ToSchema)]
pub struct LibrarianDashboard {
    pub available_books: Vec<Book>,
    pub loaned_books: Vec<Book>,
    pub loans: Vec<LoanDetails>,
    /// Loans past their due date and not returned
    pub overdue_loans: Vec<LoanDetails>,
    /// Students and professors
    pub members: Vec<User>,
}

/// Student and professor dashboard context
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberDashboard {
    pub available_books: Vec<Book>,
    pub reservations: Vec<ReservationDetails>,
    pub loans: Vec<LoanDetails>,
}

/// Administrator panel sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminSection {
    Dashboard,
    Users,
    Books,
    Loans,
    Reservations,
}

impl AdminSection {
    /// Unknown sections fall back to the dashboard
    pub fn from_path(section: Option<&str>) -> Self {
        match section {
            Some("users") => AdminSection::Users,
            Some("books") => AdminSection::Books,
            Some("loans") => AdminSection::Loans,
            Some("reservations") => AdminSection::Reservations,
            _ => AdminSection::Dashboard,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminStats {
    pub users: i64,
    pub books: i64,
    pub loans: i64,
    pub reservations: i64,
}

/// Administrator panel context. Lists are filled in per section.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminPanel {
    pub active_section: AdminSection,
    pub stats: AdminStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<Book>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loans: Option<Vec<LoanDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservations: Option<Vec<ReservationDetails>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_fallback() {
        assert_eq!(AdminSection::from_path(Some("users")), AdminSection::Users);
        assert_eq!(AdminSection::from_path(Some("reservations")), AdminSection::Reservations);
        assert_eq!(AdminSection::from_path(Some("nonsense")), AdminSection::Dashboard);
        assert_eq!(AdminSection::from_path(None), AdminSection::Dashboard);
    }
}
