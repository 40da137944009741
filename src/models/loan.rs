//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::policy::loans;

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    /// At most one renewal per loan
    pub renewed: bool,
    pub returned: bool,
    pub fine_generated: bool,
}

/// Loan joined with the names shown next to it
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    #[sqlx(flatten)]
    pub loan: Loan,
    pub book_title: String,
    pub username: String,
}

/// Loan with computed overdue context for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanDetails {
    #[serde(flatten)]
    pub loan: Loan,
    pub book_title: String,
    pub username: String,
    pub days_overdue: i64,
    pub fine_amount: i64,
    pub is_overdue: bool,
}

impl LoanDetails {
    pub fn new(row: LoanRow, today: NaiveDate) -> Self {
        let days_overdue = loans::days_overdue(&row.loan, today);
        Self {
            fine_amount: loans::fine_amount(&row.loan, today),
            is_overdue: days_overdue > 0,
            days_overdue,
            loan: row.loan,
            book_title: row.book_title,
            username: row.username,
        }
    }
}

/// Loan ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub user_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Checkout request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    /// Borrower
    pub user_id: i32,
    pub book_id: i32,
    /// Defaults to seven days after today
    pub due_date: Option<NaiveDate>,
}

/// Outcome of a fine payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FinePayment {
    pub loan_id: i32,
    /// Eight uppercase characters
    pub payment_code: String,
    pub amount: i64,
    pub days_overdue: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_compute_overdue_context() {
        let row = LoanRow {
            loan: Loan {
                id: 4,
                user_id: 2,
                book_id: 9,
                loan_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                renewed: false,
                returned: false,
                fine_generated: false,
            },
            book_title: "Rayuela".to_string(),
            username: "sofia".to_string(),
        };

        let details = LoanDetails::new(row.clone(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(details.days_overdue, 2);
        assert_eq!(details.fine_amount, 200);
        assert!(details.is_overdue);

        let on_time = LoanDetails::new(row, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert!(!on_time.is_overdue);
        assert_eq!(on_time.fine_amount, 0);

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["book_id"], 9);
        assert_eq!(json["fine_amount"], 200);
    }
}
