//! Loans repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanRow, NewLoan},
};

const LOAN_ROW_SELECT: &str = r#"
    SELECT l.id, l.user_id, l.book_id, l.loan_date, l.due_date,
           l.renewed, l.returned, l.fine_generated,
           b.title AS book_title, u.username
    FROM loans l
    JOIN books b ON b.id = l.book_id
    JOIN users u ON u.id = l.user_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get a loan only if it belongs to the given user
    pub async fn get_owned(&self, id: i32, user_id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get a loan with its book title and borrower name
    pub async fn get_row(&self, id: i32) -> AppResult<LoanRow> {
        sqlx::query_as::<_, LoanRow>(&format!("{} WHERE l.id = $1", LOAN_ROW_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// All loans, most recent first
    pub async fn list(&self) -> AppResult<Vec<LoanRow>> {
        let loans = sqlx::query_as::<_, LoanRow>(&format!(
            "{} ORDER BY l.loan_date DESC, l.id DESC",
            LOAN_ROW_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Loans of one user, most recent first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<LoanRow>> {
        let loans = sqlx::query_as::<_, LoanRow>(&format!(
            "{} WHERE l.user_id = $1 ORDER BY l.loan_date DESC, l.id DESC",
            LOAN_ROW_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Take the book off the shelf and insert the loan in one transaction.
    ///
    /// Returns `None` when the book was no longer available, in which case
    /// nothing is written.
    pub async fn create(&self, loan: &NewLoan) -> AppResult<Option<Loan>> {
        let mut tx = self.pool.begin().await?;

        let claimed: Option<i32> = sqlx::query_scalar(
            "UPDATE books SET available = FALSE WHERE id = $1 AND available RETURNING id",
        )
        .bind(loan.book_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let inserted = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id, loan_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(loan.user_id)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .fetch_one(&mut *tx)
        .await;

        // idx_loans_open_book: the book already has an open loan
        let created = match inserted {
            Ok(created) => created,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                tx.rollback().await?;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(Some(created))
    }

    /// Persist the renewal state of a loan
    pub async fn save_renewal(&self, loan: &Loan) -> AppResult<()> {
        sqlx::query("UPDATE loans SET due_date = $2, renewed = $3 WHERE id = $1")
            .bind(loan.id)
            .bind(loan.due_date)
            .bind(loan.renewed)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Persist the fine flag of a loan
    pub async fn save_fine_generated(&self, loan: &Loan) -> AppResult<()> {
        sqlx::query("UPDATE loans SET fine_generated = $2 WHERE id = $1")
            .bind(loan.id)
            .bind(loan.fine_generated)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Mark the loan returned and its book available again
    pub async fn save_return(&self, loan: &Loan) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE loans SET returned = $2 WHERE id = $1")
            .bind(loan.id)
            .bind(loan.returned)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE books SET available = TRUE WHERE id = $1")
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
