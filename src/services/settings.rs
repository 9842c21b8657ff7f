use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::entities::setting::{self, Entity as SettingEntity};
use crate::errors::ServiceError;

/// Service for kiosk-level key-value settings
#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertSettingInput {
    #[validate(length(max = 2000, message = "Setting value cannot exceed 2000 characters"))]
    pub value: String,
}

impl SettingsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_settings(&self) -> Result<Vec<setting::Model>, ServiceError> {
        let db = &*self.db;

        let settings = SettingEntity::find()
            .order_by_asc(setting::Column::Key)
            .all(db)
            .await?;

        Ok(settings)
    }

    #[instrument(skip(self))]
    pub async fn get_setting(&self, key: &str) -> Result<setting::Model, ServiceError> {
        let db = &*self.db;

        SettingEntity::find_by_id(key.to_string())
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Setting {} not found", key)))
    }

    /// Creates the setting when the key is new, overwrites it otherwise
    #[instrument(skip(self, input))]
    pub async fn upsert_setting(
        &self,
        key: &str,
        input: UpsertSettingInput,
    ) -> Result<setting::Model, ServiceError> {
        input.validate()?;
        if key.is_empty() || key.len() > 100 {
            return Err(ServiceError::ValidationError(
                "Setting key must be between 1 and 100 characters".to_string(),
            ));
        }

        let db = &*self.db;

        let existing = SettingEntity::find_by_id(key.to_string()).one(db).await?;

        let saved = match existing {
            Some(model) => {
                let mut active_model: setting::ActiveModel = model.into();
                active_model.value = Set(input.value);
                active_model.update(db).await?
            }
            None => {
                let model = setting::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(input.value),
                    updated_at: Set(Utc::now()),
                };
                model.insert(db).await?
            }
        };

        info!(key = %saved.key, "Setting saved");
        Ok(saved)
    }
}
