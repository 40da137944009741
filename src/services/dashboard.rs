//! Dashboard and administrator panel context

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{
        dashboard::{AdminPanel, AdminSection, AdminStats, LibrarianDashboard, MemberDashboard},
        loan::LoanDetails,
        user::Role,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Everything the front desk works with
    pub async fn librarian(&self, today: NaiveDate) -> AppResult<LibrarianDashboard> {
        let loans: Vec<LoanDetails> = self
            .repository
            .loans
            .list()
            .await?
            .into_iter()
            .map(|row| LoanDetails::new(row, today))
            .collect();
        let overdue_loans = loans.iter().filter(|l| l.days_overdue > 0).cloned().collect();

        Ok(LibrarianDashboard {
            available_books: self.repository.books.list_by_availability(true).await?,
            loaned_books: self.repository.books.list_by_availability(false).await?,
            loans,
            overdue_loans,
            members: self
                .repository
                .users
                .list_by_roles(&[Role::Student, Role::Professor])
                .await?,
        })
    }

    /// Student or professor view of their own loans and reservations
    pub async fn member(&self, user_id: i32, today: NaiveDate) -> AppResult<MemberDashboard> {
        let loans = self
            .repository
            .loans
            .list_for_user(user_id)
            .await?
            .into_iter()
            .map(|row| LoanDetails::new(row, today))
            .collect();

        Ok(MemberDashboard {
            available_books: self.repository.books.list_by_availability(true).await?,
            reservations: self.repository.reservations.list_for_user(user_id).await?,
            loans,
        })
    }

    /// Administrator panel for one section
    pub async fn admin(&self, section: AdminSection, today: NaiveDate) -> AppResult<AdminPanel> {
        let stats = AdminStats {
            users: self.repository.users.count().await?,
            books: self.repository.books.count().await?,
            loans: self.repository.loans.count().await?,
            reservations: self.repository.reservations.count().await?,
        };

        let mut panel = AdminPanel {
            active_section: section,
            stats,
            users: None,
            books: None,
            loans: None,
            reservations: None,
        };

        let all = section == AdminSection::Dashboard;
        if all || section == AdminSection::Users {
            panel.users = Some(self.repository.users.list().await?);
        }
        if all || section == AdminSection::Books {
            panel.books = Some(self.repository.books.search(&Default::default()).await?);
        }
        if all || section == AdminSection::Loans {
            let rows = self.repository.loans.list().await?;
            panel.loans = Some(rows.into_iter().map(|row| LoanDetails::new(row, today)).collect());
        }
        if all || section == AdminSection::Reservations {
            panel.reservations = Some(self.repository.reservations.list().await?);
        }

        Ok(panel)
    }
}
