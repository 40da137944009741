//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, books, dashboards, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "1.0.0",
        description = "Library loan management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::login_as,
        auth::logout,
        auth::me,
        // Dashboards
        dashboards::student,
        dashboards::professor,
        dashboards::librarian,
        // Books
        books::list_books,
        books::get_book,
        books::reserve_book,
        // Loans
        loans::create_loan,
        loans::return_loan,
        loans::renew_loan,
        loans::pay_fine,
        // Admin
        admin::panel,
        admin::panel_section,
        admin::create_user,
        admin::update_user,
        admin::delete_user,
        admin::create_book,
        admin::update_book,
        admin::delete_book,
        admin::get_settings,
        admin::update_settings,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::api::MessageResponse,
            // Users
            crate::models::user::Role,
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            books::ReservationResponse,
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationDetails,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            crate::models::loan::FinePayment,
            loans::LoanActionResponse,
            loans::FinePaymentResponse,
            // Dashboards
            crate::models::dashboard::MemberDashboard,
            crate::models::dashboard::LibrarianDashboard,
            crate::models::dashboard::AdminPanel,
            crate::models::dashboard::AdminSection,
            crate::models::dashboard::AdminStats,
            // Settings
            crate::models::setting::Setting,
            crate::models::setting::UpdateSettings,
            crate::models::setting::SettingInput,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::policy::Severity,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "dashboards", description = "Role dashboards"),
        (name = "books", description = "Catalog and reservations"),
        (name = "loans", description = "Loan management"),
        (name = "admin", description = "Administrator panel")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
