//! Authentication endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{Role, User},
    policy::access::NEUTRAL_LANDING,
};

use super::{AuthenticatedUser, MessageResponse};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
    /// Dashboard of the user's role
    pub redirect: String,
}

async fn login_with_role(
    state: &crate::AppState,
    request: LoginRequest,
    expected_role: Option<Role>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.username, &request.password, expected_role)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.services.users.token_lifetime(),
        redirect: user.role.landing().to_string(),
        user,
    }))
}

/// Log in with any role
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    login_with_role(&state, request, None).await
}

/// Log in on a role-specific page
#[utoipa::path(
    post,
    path = "/auth/login/{role}",
    tag = "auth",
    params(
        ("role" = Role, Path, description = "Role the user must hold")
    ),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
        (status = 403, description = "User does not hold this role", body = crate::error::ErrorResponse)
    )
)]
pub async fn login_as(
    State(state): State<crate::AppState>,
    Path(role): Path<Role>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    login_with_role(&state, request, Some(role)).await
}

/// Log out. Tokens are stateless; the client drops its copy.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout(AuthenticatedUser(claims): AuthenticatedUser) -> Json<MessageResponse> {
    tracing::info!("User {} logged out", claims.sub);
    Json(MessageResponse {
        message: "You have been logged out".to_string(),
        redirect: NEUTRAL_LANDING.to_string(),
    })
}

/// Current user profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}
