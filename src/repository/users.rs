//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{or_conflict, AppError, AppResult},
    models::user::{NewUser, Role, User},
    policy::PolicyError,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check if username already exists
    pub async fn username_exists(&self, username: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1) AND id != $2)",
            )
            .bind(username)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))")
                .bind(username)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// List all users
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// List users holding one of the given roles
    pub async fn list_by_roles(&self, roles: &[Role]) -> AppResult<Vec<User>> {
        let roles: Vec<&str> = roles.iter().map(Role::as_str).collect();
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = ANY($1) ORDER BY username",
        )
        .bind(&roles)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn count_administrators(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'administrator'")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a new user
    pub async fn create(&self, user: &NewUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, first_name, last_name, role, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.is_staff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| or_conflict(e, PolicyError::DuplicateUsername(user.username.clone())))?;

        Ok(created)
    }

    /// Persist every editable column of an existing user
    pub async fn update(&self, user: &User) -> AppResult<User> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, email = $4, first_name = $5,
                last_name = $6, role = $7, is_staff = $8, is_active = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.is_staff)
        .bind(user.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| or_conflict(e, PolicyError::DuplicateUsername(user.username.clone())))?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user.id)))?;

        Ok(updated)
    }

    /// Delete a user. Loans and reservations go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
