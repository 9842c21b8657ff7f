use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::supplier::{self, Entity as SupplierEntity};
use crate::errors::ServiceError;

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSupplierInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(max = 20, message = "RUC cannot exceed 20 characters"))]
    pub ruc: Option<String>,
    #[validate(length(max = 30, message = "Phone cannot exceed 30 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Email must be valid"))]
    pub email: Option<String>,
    #[validate(length(max = 500, message = "Address cannot exceed 500 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSupplierInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 20, message = "RUC cannot exceed 20 characters"))]
    pub ruc: Option<String>,
    #[validate(length(max = 30, message = "Phone cannot exceed 30 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Email must be valid"))]
    pub email: Option<String>,
    #[validate(length(max = 500, message = "Address cannot exceed 500 characters"))]
    pub address: Option<String>,
    pub active: Option<bool>,
}

impl SupplierService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;

        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            ruc: Set(input.ruc),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            ..Default::default()
        };

        let created = model.insert(db).await.map_err(|e| {
            error!("Failed to create supplier: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        info!(supplier_id = %created.id, name = %created.name, "Supplier created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update_supplier(
        &self,
        id: Uuid,
        input: UpdateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;

        let existing = SupplierEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))?;

        let mut active_model = existing.into_active_model();
        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if input.ruc.is_some() {
            active_model.ruc = Set(input.ruc);
        }
        if input.phone.is_some() {
            active_model.phone = Set(input.phone);
        }
        if input.email.is_some() {
            active_model.email = Set(input.email);
        }
        if input.address.is_some() {
            active_model.address = Set(input.address);
        }
        if let Some(active) = input.active {
            active_model.active = Set(active);
        }

        let updated = active_model.update(db).await?;

        info!(supplier_id = %updated.id, "Supplier updated");
        Ok(updated)
    }

    /// Suppliers are never hard-deleted; purchases keep pointing at them.
    /// Deactivation removes them from pickers and rejects new purchases.
    #[instrument(skip(self))]
    pub async fn deactivate_supplier(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;

        let existing = SupplierEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))?;

        let mut active_model = existing.into_active_model();
        active_model.active = Set(false);
        active_model.update(db).await?;

        info!(supplier_id = %id, "Supplier deactivated");
        Ok(())
    }

    /// Puts a previously deactivated supplier back into pickers
    #[instrument(skip(self))]
    pub async fn reactivate_supplier(&self, id: Uuid) -> Result<supplier::Model, ServiceError> {
        let db = &*self.db;

        let existing = SupplierEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))?;

        let mut active_model = existing.into_active_model();
        active_model.active = Set(true);
        let updated = active_model.update(db).await?;

        info!(supplier_id = %id, "Supplier reactivated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: Uuid) -> Result<supplier::Model, ServiceError> {
        let db = &*self.db;

        SupplierEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        search: Option<&str>,
        active_only: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let db = &*self.db;

        let mut query = SupplierEntity::find();
        if let Some(search) = search {
            query = query.filter(
                Condition::any()
                    .add(supplier::Column::Name.contains(search))
                    .add(supplier::Column::Ruc.eq(search)),
            );
        }
        if active_only {
            query = query.filter(supplier::Column::Active.eq(true));
        }

        let paginator = query
            .order_by_asc(supplier::Column::Name)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!("Failed to count suppliers: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let suppliers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((suppliers, total))
    }
}
