//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{AuthConfig, BootstrapAdminConfig},
    error::{AppError, AppResult},
    models::user::{CreateUser, NewUser, Role, UpdateUser, User, UserClaims},
    policy::{accounts, PolicyError},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password and return a JWT token.
    ///
    /// When `expected_role` is given (role-specific login page), a user with
    /// another role is turned away even with valid credentials.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        expected_role: Option<Role>,
    ) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .filter(|user| user.is_active)
            .ok_or(PolicyError::InvalidCredentials)?;

        if !self.verify_password(&user, password)? {
            return Err(PolicyError::InvalidCredentials.into());
        }

        if let Some(role) = expected_role {
            if user.role != role {
                return Err(PolicyError::WrongRole(role.to_string()).into());
            }
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in as {}", user.username, user.role);
        Ok((token, user))
    }

    /// Token lifetime in seconds
    pub fn token_lifetime(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + self.token_lifetime(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Create a new user from the administrator form
    pub async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        request.validate()?;
        let password = accounts::confirm_password(&request.password1, &request.password2)?;

        if self.repository.users.username_exists(&request.username, None).await? {
            return Err(PolicyError::DuplicateUsername(request.username).into());
        }

        let mut user = NewUser::new(
            request.username,
            request.email,
            request.role,
            self.hash_password(password)?,
        );
        user.first_name = request.first_name;
        user.last_name = request.last_name;

        let created = self.repository.users.create(&user).await?;
        tracing::info!("Created user {} with role {}", created.username, created.role);
        Ok(created)
    }

    /// Update an existing user. The staff flag follows the role.
    pub async fn update_user(&self, id: i32, request: UpdateUser) -> AppResult<User> {
        request.validate()?;
        let new_password =
            accounts::confirm_new_password(request.password1.as_deref(), request.password2.as_deref())?;

        let mut user = self.repository.users.get_by_id(id).await?;

        if let Some(username) = request.username {
            if self.repository.users.username_exists(&username, Some(id)).await? {
                return Err(PolicyError::DuplicateUsername(username).into());
            }
            user.username = username;
        }
        if let Some(email) = request.email {
            user.email = email;
        }
        if request.first_name.is_some() {
            user.first_name = request.first_name;
        }
        if request.last_name.is_some() {
            user.last_name = request.last_name;
        }
        if let Some(is_active) = request.is_active {
            user.is_active = is_active;
        }
        if let Some(password) = new_password {
            user.password_hash = self.hash_password(password)?;
        }
        user.set_role(request.role.unwrap_or(user.role));

        self.repository.users.update(&user).await
    }

    /// Delete a user. Administrators cannot be deleted.
    pub async fn delete_user(&self, actor: &UserClaims, id: i32) -> AppResult<User> {
        let target = self.repository.users.get_by_id(id).await?;
        accounts::can_delete_user(actor.role, &target)?;

        self.repository.users.delete(id).await?;
        tracing::info!("User {} deleted by {}", target.username, actor.sub);
        Ok(target)
    }

    /// Create the configured administrator if there is no administrator yet
    pub async fn ensure_administrator(&self, admin: &BootstrapAdminConfig) -> AppResult<()> {
        if self.repository.users.count_administrators().await? > 0 {
            return Ok(());
        }

        let user = NewUser::new(
            admin.username.clone(),
            admin.email.clone(),
            Role::Administrator,
            self.hash_password(&admin.password)?,
        );
        self.repository.users.create(&user).await?;
        tracing::info!("Created bootstrap administrator {}", admin.username);
        Ok(())
    }
}
