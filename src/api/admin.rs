//! Administrator panel endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook, UpdateBook},
        dashboard::{AdminPanel, AdminSection},
        setting::{Setting, UpdateSettings},
        user::{CreateUser, UpdateUser, User},
    },
    policy::access::Action,
};

use super::{today, AuthenticatedUser, MessageResponse};

const USERS_SECTION: &str = "/admin/panel/users";
const BOOKS_SECTION: &str = "/admin/panel/books";

/// Administrator panel overview
#[utoipa::path(
    get,
    path = "/admin/panel",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Panel with counters", body = AdminPanel),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn panel(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AdminPanel>> {
    claims.require(Action::AdminPanel)?;
    let panel = state.services.dashboard.admin(AdminSection::Dashboard, today()).await?;
    Ok(Json(panel))
}

/// Administrator panel section. Unknown sections show the overview.
#[utoipa::path(
    get,
    path = "/admin/panel/{section}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("section" = String, Path, description = "users, books, loans or reservations")
    ),
    responses(
        (status = 200, description = "Panel with the section's list", body = AdminPanel),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn panel_section(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(section): Path<String>,
) -> AppResult<Json<AdminPanel>> {
    claims.require(Action::AdminPanel)?;
    let section = AdminSection::from_path(Some(&section));
    let panel = state.services.dashboard.admin(section, today()).await?;
    Ok(Json(panel))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid form or passwords do not match", body = crate::error::ErrorResponse),
        (status = 409, description = "Username taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    claims.require(Action::ManageUsers)?;
    let user = state
        .services
        .users
        .create_user(request)
        .await
        .map_err(|e| e.redirect_to(USERS_SECTION))?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid form or passwords do not match", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    claims.require(Action::ManageUsers)?;
    let user = state
        .services
        .users
        .update_user(id, request)
        .await
        .map_err(|e| e.redirect_to(USERS_SECTION))?;
    Ok(Json(user))
}

/// Delete a user. Administrator accounts cannot be deleted.
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Target is an administrator", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    claims.require(Action::DeleteUser)?;
    let user = state
        .services
        .users
        .delete_user(&claims, id)
        .await
        .map_err(|e| e.redirect_to(USERS_SECTION))?;

    Ok(Json(MessageResponse {
        message: format!("User {} deleted", user.username),
        redirect: USERS_SECTION.to_string(),
    }))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 409, description = "ISBN already in the catalog", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require(Action::ManageBooks)?;
    let book = state
        .services
        .catalog
        .create_book(request)
        .await
        .map_err(|e| e.redirect_to(BOOKS_SECTION))?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    put,
    path = "/admin/books/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found"),
        (status = 409, description = "ISBN already in the catalog", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require(Action::ManageBooks)?;
    let book = state
        .services
        .catalog
        .update_book(id, request)
        .await
        .map_err(|e| e.redirect_to(BOOKS_SECTION))?;
    Ok(Json(book))
}

/// Remove a book along with its loans and reservations
#[utoipa::path(
    delete,
    path = "/admin/books/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require(Action::ManageBooks)?;
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stored settings", body = Vec<Setting>)
    )
)]
pub async fn get_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Setting>>> {
    claims.require(Action::ManageSettings)?;
    let settings = state.services.settings.get_settings().await?;
    Ok(Json(settings))
}

/// Create or overwrite settings by name
#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings after the update", body = Vec<Setting>),
        (status = 400, description = "Invalid setting", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<UpdateSettings>,
) -> AppResult<Json<Vec<Setting>>> {
    claims.require(Action::ManageSettings)?;
    let settings = state.services.settings.update_settings(request).await?;
    Ok(Json(settings))
}
