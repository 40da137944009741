//! Reservation eligibility

use chrono::NaiveDate;

use super::PolicyError;
use crate::models::{book::Book, reservation::NewReservation, user::User};

/// A reservation only makes sense for a book that is out on loan. There is
/// no queue: any number of reservations may exist for the same book.
pub fn reserve(user: &User, book: &Book, today: NaiveDate) -> Result<NewReservation, PolicyError> {
    if book.available {
        return Err(PolicyError::BookAvailable(book.title.clone()));
    }

    Ok(NewReservation {
        user_id: user.id,
        book_id: book.id,
        reservation_date: today,
    })
}
