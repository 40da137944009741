//! Reservations repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::reservation::{NewReservation, Reservation, ReservationDetails},
};

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.user_id, r.book_id, r.reservation_date, r.fulfilled,
           b.title AS book_title, u.username
    FROM reservations r
    JOIN books b ON b.id = r.book_id
    JOIN users u ON u.id = r.user_id
"#;

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a reservation
    pub async fn create(&self, reservation: &NewReservation) -> AppResult<Reservation> {
        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, book_id, reservation_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(reservation.user_id)
        .bind(reservation.book_id)
        .bind(reservation.reservation_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// All reservations, most recent first
    pub async fn list(&self) -> AppResult<Vec<ReservationDetails>> {
        let reservations = sqlx::query_as::<_, ReservationDetails>(&format!(
            "{} ORDER BY r.reservation_date DESC, r.id DESC",
            DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// Reservations made by one user
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<ReservationDetails>> {
        let reservations = sqlx::query_as::<_, ReservationDetails>(&format!(
            "{} WHERE r.user_id = $1 ORDER BY r.reservation_date DESC, r.id DESC",
            DETAILS_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
