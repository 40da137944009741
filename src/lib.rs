//! Biblioteca library loan management
//!
//! REST JSON server for a small library: catalog, loans with fines,
//! reservations and role dashboards for students, professors, librarians
//! and administrators.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
