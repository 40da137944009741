//! Biblioteca Server - library loan management
//!
//! REST API server for catalog, loans, fines and reservations.

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca_server::{
    api,
    config::{AppConfig, LogFormat},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblioteca_server={},tower_http=debug", config.logging.level).into());

    let (pretty, json) = match config.logging.format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();

    tracing::info!("Starting Biblioteca Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    if let Some(admin) = &config.auth.bootstrap_admin {
        services
            .users
            .ensure_administrator(admin)
            .await
            .context("Failed to create bootstrap administrator")?;
    }

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/login/:role", post(api::auth::login_as))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        // Dashboards
        .route("/dashboard/student", get(api::dashboards::student))
        .route("/dashboard/professor", get(api::dashboards::professor))
        .route("/dashboard/librarian", get(api::dashboards::librarian))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id/reserve", post(api::books::reserve_book))
        // Loans
        .route("/loans", post(api::loans::create_loan))
        .route("/loans/:id/renew", post(api::loans::renew_loan))
        .route("/loans/:id/return", post(api::loans::return_loan))
        .route("/loans/:id/pay-fine", post(api::loans::pay_fine))
        // Administrator panel
        .route("/admin/panel", get(api::admin::panel))
        .route("/admin/panel/:section", get(api::admin::panel_section))
        .route("/admin/users", post(api::admin::create_user))
        .route(
            "/admin/users/:id",
            axum::routing::put(api::admin::update_user).delete(api::admin::delete_user),
        )
        .route("/admin/books", post(api::admin::create_book))
        .route(
            "/admin/books/:id",
            axum::routing::put(api::admin::update_book).delete(api::admin::delete_book),
        )
        .route(
            "/admin/settings",
            get(api::admin::get_settings).put(api::admin::update_settings),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
