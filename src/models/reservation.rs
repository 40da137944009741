//! Reservation model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Reservation model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub reservation_date: NaiveDate,
    /// Never set automatically; only tracked by hand
    pub fulfilled: bool,
}

/// Reservation joined with book title and username
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReservationDetails {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub reservation: Reservation,
    pub book_title: String,
    pub username: String,
}

/// Reservation ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub user_id: i32,
    pub book_id: i32,
    pub reservation_date: NaiveDate,
}
