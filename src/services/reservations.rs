//! Reservation service

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{
        book::Book,
        reservation::Reservation,
        user::UserClaims,
    },
    policy::reservations,
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Reserve a book that is currently on loan
    pub async fn reserve(
        &self,
        caller: &UserClaims,
        book_id: i32,
        today: NaiveDate,
    ) -> AppResult<(Reservation, Book)> {
        let user = self.repository.users.get_by_id(caller.user_id).await?;
        let book = self.repository.books.get_by_id(book_id).await?;

        let new_reservation = reservations::reserve(&user, &book, today)?;
        let reservation = self.repository.reservations.create(&new_reservation).await?;

        tracing::info!("{} reserved '{}'", user.username, book.title);
        Ok((reservation, book))
    }
}
