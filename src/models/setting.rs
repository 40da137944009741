//! Named configuration values kept in the database

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

/// Settings update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSettings {
    #[validate(nested)]
    pub settings: Vec<SettingInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SettingInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 200))]
    pub value: String,
}
