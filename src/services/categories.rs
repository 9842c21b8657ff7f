use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::category::{self, Entity as CategoryEntity};
use crate::errors::ServiceError;

/// Service for managing product categories
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategoryInput {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;

        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            color: Set(input.color),
            icon: Set(input.icon),
            ..Default::default()
        };

        let created = model.insert(db).await.map_err(|e| {
            error!("Failed to create category: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        info!(category_id = %created.id, "Category created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;

        let existing = CategoryEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))?;

        let mut active_model = existing.into_active_model();
        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if input.color.is_some() {
            active_model.color = Set(input.color);
        }
        if input.icon.is_some() {
            active_model.icon = Set(input.icon);
        }

        let updated = active_model.update(db).await?;

        info!(category_id = %updated.id, "Category updated");
        Ok(updated)
    }

    /// Deletes a category. Products that referenced it are left in place
    /// with their category cleared by the schema's SET NULL rule.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;

        let result = CategoryEntity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Category {} not found", id)));
        }

        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> Result<category::Model, ServiceError> {
        let db = &*self.db;

        CategoryEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        let db = &*self.db;

        let categories = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(db)
            .await?;

        Ok(categories)
    }
}
