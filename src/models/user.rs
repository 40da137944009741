//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppError,
    policy::{
        access::{self, Action},
        PolicyError,
    },
};

/// User role. Stored as its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Librarian,
    Professor,
    Student,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Administrator, Role::Librarian, Role::Professor, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Librarian => "librarian",
            Role::Professor => "professor",
            Role::Student => "student",
        }
    }

    /// Librarians are staff; nobody else is.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Librarian)
    }

    /// Page a user of this role lands on after login or an action
    pub fn landing(&self) -> &'static str {
        match self {
            Role::Administrator => "/admin/panel",
            Role::Librarian => "/dashboard/librarian",
            Role::Professor => "/dashboard/professor",
            Role::Student => "/dashboard/student",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "administrator" => Ok(Role::Administrator),
            "librarian" => Ok(Role::Librarian),
            "professor" => Ok(Role::Professor),
            "student" => Ok(Role::Student),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// SQLx conversion for Role
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub is_staff: bool,
    /// Inactive accounts cannot log in, and their issued tokens are refused
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Change the role and keep the staff flag in line with it.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.is_staff = role.is_staff();
    }
}

#[cfg(test)]
impl User {
    pub(crate) fn fixture(id: i32, username: &str, role: Role) -> Self {
        User {
            id,
            username: username.to_string(),
            password_hash: String::new(),
            email: format!("{}@example.org", username),
            first_name: None,
            last_name: None,
            role,
            is_staff: role.is_staff(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// User ready to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub is_staff: bool,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(username: String, email: String, role: Role, password_hash: String) -> Self {
        Self {
            username,
            email,
            first_name: None,
            last_name: None,
            role,
            is_staff: role.is_staff(),
            password_hash,
        }
    }
}

/// Create user request (administrator form)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 150, message = "Username must be 3 to 150 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password1: String,
    pub password2: String,
}

/// Update user request (administrator form)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 150, message = "Username must be 3 to 150 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    /// New password, left empty to keep the current one
    pub password1: Option<String>,
    pub password2: Option<String>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Bring the token's identity in line with the stored account.
    ///
    /// Tokens outlive role changes and deactivation; the stored account
    /// wins, and a deactivated account is refused.
    pub fn sync_with(&mut self, user: &User) -> Result<(), AppError> {
        if user.id != self.user_id || !user.is_active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }
        self.sub = user.username.clone();
        self.role = user.role;
        Ok(())
    }

    /// Check the access table for this identity
    pub fn require(&self, action: Action) -> Result<(), AppError> {
        access::authorize(self.role, action)
            .map_err(|e: PolicyError| AppError::from(e).redirect_to(access::NEUTRAL_LANDING))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_role_keeps_staff_flag() {
        let mut user = User::fixture(7, "pilar", Role::Student);
        assert!(!user.is_staff);

        user.set_role(Role::Librarian);
        assert!(user.is_staff);

        user.set_role(Role::Professor);
        assert!(!user.is_staff);

        user.set_role(Role::Administrator);
        assert!(!user.is_staff);
    }

    #[test]
    fn test_new_user_staff_flag() {
        let librarian = NewUser::new("lib".into(), "lib@example.org".into(), Role::Librarian, "h".into());
        assert!(librarian.is_staff);
        let student = NewUser::new("stu".into(), "stu@example.org".into(), Role::Student, "h".into());
        assert!(!student.is_staff);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Librarian".parse::<Role>(), Ok(Role::Librarian));
        assert!("bibliotecario".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Student);
        assert_eq!(serde_json::to_string(&Role::Professor).unwrap(), "\"professor\"");
    }

    #[test]
    fn test_token_roundtrip_keeps_role() {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: "ana".to_string(),
            user_id: 3,
            role: Role::Librarian,
            exp: now + 3600,
            iat: now,
        };
        let token = claims.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 3);
        assert_eq!(parsed.role, Role::Librarian);
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_stored_account_overrides_token() {
        let now = Utc::now().timestamp();
        let mut claims = UserClaims {
            sub: "ana".to_string(),
            user_id: 3,
            role: Role::Librarian,
            exp: now + 3600,
            iat: now,
        };

        let mut user = User::fixture(3, "ana.r", Role::Student);
        claims.sync_with(&user).unwrap();
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.sub, "ana.r");
        assert!(claims.require(Action::CheckoutLoan).is_err());

        user.is_active = false;
        assert!(matches!(claims.sync_with(&user), Err(AppError::Authentication(_))));

        let other = User::fixture(4, "eva", Role::Administrator);
        assert!(matches!(claims.sync_with(&other), Err(AppError::Authentication(_))));
        assert_eq!(claims.role, Role::Student);
    }

    #[test]
    fn test_require_denies_with_neutral_redirect() {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: "ana".to_string(),
            user_id: 3,
            role: Role::Student,
            exp: now + 3600,
            iat: now,
        };
        assert!(claims.require(Action::StudentDashboard).is_ok());
        match claims.require(Action::AdminPanel) {
            Err(AppError::Policy { error, redirect }) => {
                assert_eq!(error, PolicyError::PermissionDenied);
                assert_eq!(redirect, Some("/"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
