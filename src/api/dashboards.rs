//! Role dashboards

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::dashboard::{LibrarianDashboard, MemberDashboard},
    policy::access::Action,
};

use super::{today, AuthenticatedUser};

#[utoipa::path(
    get,
    path = "/dashboard/student",
    tag = "dashboards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student dashboard", body = MemberDashboard),
        (status = 403, description = "Not a student", body = crate::error::ErrorResponse)
    )
)]
pub async fn student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MemberDashboard>> {
    claims.require(Action::StudentDashboard)?;
    let dashboard = state.services.dashboard.member(claims.user_id, today()).await?;
    Ok(Json(dashboard))
}

#[utoipa::path(
    get,
    path = "/dashboard/professor",
    tag = "dashboards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Professor dashboard", body = MemberDashboard),
        (status = 403, description = "Not a professor", body = crate::error::ErrorResponse)
    )
)]
pub async fn professor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MemberDashboard>> {
    claims.require(Action::ProfessorDashboard)?;
    let dashboard = state.services.dashboard.member(claims.user_id, today()).await?;
    Ok(Json(dashboard))
}

/// Front desk view: stock, all loans, overdue loans and members
#[utoipa::path(
    get,
    path = "/dashboard/librarian",
    tag = "dashboards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Librarian dashboard", body = LibrarianDashboard),
        (status = 403, description = "Not a librarian", body = crate::error::ErrorResponse)
    )
)]
pub async fn librarian(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<LibrarianDashboard>> {
    claims.require(Action::LibrarianDashboard)?;
    let dashboard = state.services.dashboard.librarian(today()).await?;
    Ok(Json(dashboard))
}
