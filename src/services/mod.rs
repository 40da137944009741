//! Business logic services

pub mod catalog;
pub mod dashboard;
pub mod loans;
pub mod reservations;
pub mod settings;
pub mod users;

use crate::{config::AuthConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub reservations: reservations::ReservationsService,
    pub dashboard: dashboard::DashboardService,
    pub settings: settings::SettingsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            dashboard: dashboard::DashboardService::new(repository.clone()),
            settings: settings::SettingsService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn check_database(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
