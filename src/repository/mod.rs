//! Repository layer for database operations

pub mod books;
pub mod loans;
pub mod reservations;
pub mod settings;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
    pub reservations: reservations::ReservationsRepository,
    pub settings: settings::SettingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            settings: settings::SettingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
