//! Loan management service

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{
        loan::{CreateLoan, FinePayment, LoanDetails},
        user::UserClaims,
    },
    policy::{loans, PolicyError},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend a book (librarian checkout). The book is claimed inside the
    /// insert transaction; a checkout that loses the race gets
    /// `BookUnavailable`.
    pub async fn checkout(&self, request: CreateLoan, today: NaiveDate) -> AppResult<LoanDetails> {
        let user = self.repository.users.get_by_id(request.user_id).await?;
        let book = self.repository.books.get_by_id(request.book_id).await?;

        let new_loan = loans::checkout(&user, &book, today, request.due_date)?;
        let loan = self
            .repository
            .loans
            .create(&new_loan)
            .await?
            .ok_or_else(|| PolicyError::BookUnavailable(book.title.clone()))?;

        tracing::info!(
            "Loan {}: '{}' lent to {} until {}",
            loan.id, book.title, user.username, loan.due_date
        );
        self.details(loan.id, today).await
    }

    /// Return a borrowed book. Reservations on it are left as they are.
    pub async fn return_loan(&self, loan_id: i32, today: NaiveDate) -> AppResult<LoanDetails> {
        let mut loan = self.repository.loans.get_by_id(loan_id).await?;
        loans::mark_returned(&mut loan)?;
        self.repository.loans.save_return(&loan).await?;

        tracing::info!("Loan {} returned", loan_id);
        self.details(loan_id, today).await
    }

    /// Renew one of the caller's own loans by another loan period
    pub async fn renew_loan(
        &self,
        borrower: &UserClaims,
        loan_id: i32,
        today: NaiveDate,
    ) -> AppResult<LoanDetails> {
        let mut loan = self.repository.loans.get_owned(loan_id, borrower.user_id).await?;
        loans::renew(&mut loan)?;
        self.repository.loans.save_renewal(&loan).await?;

        tracing::info!("Loan {} renewed by {} until {}", loan_id, borrower.sub, loan.due_date);
        self.details(loan_id, today).await
    }

    /// Issue a payment code for the fine of an overdue loan
    pub async fn pay_fine(&self, loan_id: i32, today: NaiveDate) -> AppResult<(FinePayment, LoanDetails)> {
        let mut loan = self.repository.loans.get_by_id(loan_id).await?;
        let payment = loans::pay_fine(&mut loan, today)?;
        self.repository.loans.save_fine_generated(&loan).await?;

        tracing::info!(
            "Fine for loan {}: code {} amount {}",
            loan_id, payment.payment_code, payment.amount
        );
        Ok((payment, self.details(loan_id, today).await?))
    }

    async fn details(&self, loan_id: i32, today: NaiveDate) -> AppResult<LoanDetails> {
        let row = self.repository.loans.get_row(loan_id).await?;
        Ok(LoanDetails::new(row, today))
    }
}
