//! Settings repository for database operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::setting::Setting};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Postgres>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>("SELECT name, value FROM settings ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(settings)
    }

    /// Insert or replace settings by name in one transaction
    pub async fn upsert(&self, settings: &[Setting]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for setting in settings {
            sqlx::query(
                r#"
                INSERT INTO settings (name, value) VALUES ($1, $2)
                ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value
                "#,
            )
            .bind(&setting.name)
            .bind(&setting.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
