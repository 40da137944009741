//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        loan::{CreateLoan, FinePayment, LoanDetails},
        user::Role,
    },
    policy::access::Action,
};

use super::{today, AuthenticatedUser};

/// Loan after an action, with a status message
#[derive(Serialize, ToSchema)]
pub struct LoanActionResponse {
    pub loan: LoanDetails,
    pub message: String,
    pub redirect: String,
}

/// Payment code handed to the borrower
#[derive(Serialize, ToSchema)]
pub struct FinePaymentResponse {
    pub payment: FinePayment,
    /// Borrower of the loan
    pub username: String,
    pub message: String,
    pub redirect: String,
}

/// Lend a book to a user
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanActionResponse),
        (status = 400, description = "Due date before loan date", body = crate::error::ErrorResponse),
        (status = 403, description = "Not a librarian", body = crate::error::ErrorResponse),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "Book already on loan", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanActionResponse>)> {
    claims.require(Action::CheckoutLoan)?;
    let landing = Role::Librarian.landing();

    let loan = state
        .services
        .loans
        .checkout(request, today())
        .await
        .map_err(|e| e.redirect_to(landing))?;

    Ok((
        StatusCode::CREATED,
        Json(LoanActionResponse {
            message: format!("'{}' lent to {} until {}", loan.book_title, loan.username, loan.loan.due_date),
            loan,
            redirect: landing.to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = LoanActionResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<LoanActionResponse>> {
    claims.require(Action::ReturnLoan)?;
    let landing = Role::Librarian.landing();

    let loan = state
        .services
        .loans
        .return_loan(loan_id, today())
        .await
        .map_err(|e| e.redirect_to(landing))?;

    Ok(Json(LoanActionResponse {
        message: format!("'{}' returned", loan.book_title),
        loan,
        redirect: landing.to_string(),
    }))
}

/// Renew one of your own loans for another seven days
#[utoipa::path(
    post,
    path = "/loans/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan renewed", body = LoanActionResponse),
        (status = 404, description = "Loan not found among the caller's loans"),
        (status = 409, description = "Loan already renewed", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<LoanActionResponse>> {
    claims.require(Action::RenewLoan)?;
    let landing = claims.role.landing();

    let loan = state
        .services
        .loans
        .renew_loan(&claims, loan_id, today())
        .await
        .map_err(|e| e.redirect_to(landing))?;

    Ok(Json(LoanActionResponse {
        message: format!("Loan renewed until {}", loan.loan.due_date),
        loan,
        redirect: landing.to_string(),
    }))
}

/// Generate the payment code for an overdue loan's fine
#[utoipa::path(
    post,
    path = "/loans/{id}/pay-fine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Payment code generated", body = FinePaymentResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "No fine due on this loan", body = crate::error::ErrorResponse)
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<FinePaymentResponse>> {
    claims.require(Action::PayFine)?;
    let landing = Role::Librarian.landing();

    let (payment, loan) = state
        .services
        .loans
        .pay_fine(loan_id, today())
        .await
        .map_err(|e| e.redirect_to(landing))?;

    Ok(Json(FinePaymentResponse {
        message: format!(
            "Payment code {} for {} ({} days overdue)",
            payment.payment_code, payment.amount, payment.days_overdue
        ),
        payment,
        username: loan.username,
        redirect: landing.to_string(),
    }))
}
