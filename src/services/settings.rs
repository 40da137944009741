//! Settings service

use validator::Validate;

use crate::{
    error::AppResult,
    models::setting::{Setting, UpdateSettings},
    repository::Repository,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
}

impl SettingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get current settings
    pub async fn get_settings(&self) -> AppResult<Vec<Setting>> {
        self.repository.settings.list().await
    }

    /// Insert or update the given settings, return the full list
    pub async fn update_settings(&self, request: UpdateSettings) -> AppResult<Vec<Setting>> {
        request.validate()?;

        let settings: Vec<Setting> = request
            .settings
            .into_iter()
            .map(|s| Setting {
                name: s.name,
                value: s.value,
            })
            .collect();
        self.repository.settings.upsert(&settings).await?;

        self.get_settings().await
    }
}
