//! Loan lifecycle: checkout, overdue days, fines, renewal, payment, return.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use super::{PolicyError, FINE_PER_DAY, LOAN_DAYS};
use crate::models::{
    book::Book,
    loan::{FinePayment, Loan, NewLoan},
    user::User,
};

/// Due date for a loan starting on `loan_date`. An explicit date may be
/// given but never earlier than the loan date.
pub fn due_date_for(loan_date: NaiveDate, requested: Option<NaiveDate>) -> Result<NaiveDate, PolicyError> {
    match requested {
        Some(due) if due < loan_date => Err(PolicyError::InvalidDueDate {
            loaned: loan_date.to_string(),
            due: due.to_string(),
        }),
        Some(due) => Ok(due),
        None => Ok(loan_date + Duration::days(LOAN_DAYS)),
    }
}

/// Build a new loan of `book` to `user` starting `today`.
pub fn checkout(
    user: &User,
    book: &Book,
    today: NaiveDate,
    due_date: Option<NaiveDate>,
) -> Result<NewLoan, PolicyError> {
    if !book.available {
        return Err(PolicyError::BookUnavailable(book.title.clone()));
    }

    Ok(NewLoan {
        user_id: user.id,
        book_id: book.id,
        loan_date: today,
        due_date: due_date_for(today, due_date)?,
    })
}

/// Whole days past the due date, zero once returned.
pub fn days_overdue(loan: &Loan, today: NaiveDate) -> i64 {
    if loan.returned {
        return 0;
    }
    (today - loan.due_date).num_days().max(0)
}

pub fn fine_amount(loan: &Loan, today: NaiveDate) -> i64 {
    days_overdue(loan, today) * FINE_PER_DAY
}

/// Extend the due date by one loan period. A loan can be renewed once.
pub fn renew(loan: &mut Loan) -> Result<(), PolicyError> {
    if loan.renewed {
        return Err(PolicyError::AlreadyRenewed);
    }
    loan.due_date += Duration::days(LOAN_DAYS);
    loan.renewed = true;
    Ok(())
}

/// Flag the fine as generated and hand out a payment code.
///
/// The amount is only reported; nothing keeps a ledger of payments.
pub fn pay_fine(loan: &mut Loan, today: NaiveDate) -> Result<FinePayment, PolicyError> {
    let amount = fine_amount(loan, today);
    if amount == 0 {
        return Err(PolicyError::NoFineDue);
    }
    loan.fine_generated = true;

    Ok(FinePayment {
        loan_id: loan.id,
        payment_code: payment_code(),
        amount,
        days_overdue: days_overdue(loan, today),
    })
}

pub fn mark_returned(loan: &mut Loan) -> Result<(), PolicyError> {
    if loan.returned {
        return Err(PolicyError::AlreadyReturned);
    }
    loan.returned = true;
    Ok(())
}

/// First group of a random v4 UUID, upper-cased: eight hex characters.
/// Not checked against previously issued codes.
pub fn payment_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_uppercase()
}
