//! Catalog browsing and reservation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery},
        reservation::Reservation,
    },
    policy::access::Action,
};

use super::{today, AuthenticatedUser};

/// Reservation outcome
#[derive(Serialize, ToSchema)]
pub struct ReservationResponse {
    pub reservation: Reservation,
    pub message: String,
    pub redirect: String,
}

/// List books, optionally filtered by availability or a title/author search
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Reserve a book that is out on loan.
///
/// An available book cannot be reserved; the caller is sent back to their
/// dashboard with a warning.
#[utoipa::path(
    post,
    path = "/books/{id}/reserve",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is available, borrow it instead", body = crate::error::ErrorResponse)
    )
)]
pub async fn reserve_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    claims.require(Action::ReserveBook)?;
    let landing = claims.role.landing();

    let (reservation, book) = state
        .services
        .reservations
        .reserve(&claims, book_id, today())
        .await
        .map_err(|e| e.redirect_to(landing))?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse {
            reservation,
            message: format!("Reservation for '{}' created", book.title),
            redirect: landing.to_string(),
        }),
    ))
}
