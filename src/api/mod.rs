//! API handlers for Biblioteca REST endpoints

pub mod admin;
pub mod auth;
pub mod books;
pub mod dashboards;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let mut claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        // Role and active flag come from the stored account, not the token
        let user = state
            .services
            .users
            .get_by_id(claims.user_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::Authentication("Account no longer exists".to_string()),
                other => other,
            })?;
        claims.sync_with(&user)?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Plain acknowledgement with the page to continue on
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    pub redirect: String,
}

/// Date used for due dates and fines
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
