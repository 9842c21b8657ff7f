use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::category::Entity as CategoryEntity;
use crate::entities::product::{self, Entity as ProductEntity};
use crate::entities::purchase_item::{self, Entity as PurchaseItemEntity};
use crate::entities::sale_item::{self, Entity as SaleItemEntity};
use crate::errors::ServiceError;

/// Service for the product catalog
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "Barcode must be between 1 and 64 characters"))]
    pub barcode: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Decimal,
    pub cost: Decimal,
    pub stock: Option<i32>,
    pub min_stock: Option<i32>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64, message = "Barcode must be between 1 and 64 characters"))]
    pub barcode: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub min_stock: Option<i32>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    pub active: Option<bool>,
}

/// Filters accepted by the product listing
#[derive(Debug, Clone, Default)]
pub struct ProductListParams {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub active_only: bool,
    pub page: u64,
    pub per_page: u64,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        if input.price < Decimal::ZERO || input.cost < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price and cost must not be negative".to_string(),
            ));
        }

        let db = &*self.db;

        if let Some(category_id) = input.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        if let Some(barcode) = &input.barcode {
            let existing = ProductEntity::find()
                .filter(product::Column::Barcode.eq(barcode.clone()))
                .one(db)
                .await?;
            if existing.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "A product with barcode {} already exists",
                    barcode
                )));
            }
        }

        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            barcode: Set(input.barcode),
            category_id: Set(input.category_id),
            price: Set(input.price),
            cost: Set(input.cost),
            stock: Set(input.stock.unwrap_or(0)),
            min_stock: Set(input.min_stock.unwrap_or(0)),
            image_url: Set(input.image_url),
            ..Default::default()
        };

        let created = model.insert(db).await.map_err(|e| {
            error!("Failed to create product: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %created.id, name = %created.name, "Product created");
        Ok(created)
    }

    /// Updates catalog fields. Stock is deliberately not updatable here;
    /// every stock change goes through the inventory service so it leaves
    /// a movement row behind.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;

        let existing = ProductEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        if let Some(category_id) = input.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        if let Some(barcode) = &input.barcode {
            let clash = ProductEntity::find()
                .filter(product::Column::Barcode.eq(barcode.clone()))
                .filter(product::Column::Id.ne(id))
                .one(db)
                .await?;
            if clash.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "A product with barcode {} already exists",
                    barcode
                )));
            }
        }

        let mut active_model = existing.into_active_model();
        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if input.barcode.is_some() {
            active_model.barcode = Set(input.barcode);
        }
        if input.category_id.is_some() {
            active_model.category_id = Set(input.category_id);
        }
        if let Some(price) = input.price {
            active_model.price = Set(price);
        }
        if let Some(cost) = input.cost {
            active_model.cost = Set(cost);
        }
        if let Some(min_stock) = input.min_stock {
            active_model.min_stock = Set(min_stock);
        }
        if input.image_url.is_some() {
            active_model.image_url = Set(input.image_url);
        }
        if let Some(active) = input.active {
            active_model.active = Set(active);
        }

        let updated = active_model.update(db).await?;

        info!(product_id = %updated.id, "Product updated");
        Ok(updated)
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> Result<(), ServiceError> {
        let found = CategoryEntity::find_by_id(category_id).one(&*self.db).await?;
        if found.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "Category {} does not exist",
                category_id
            )));
        }
        Ok(())
    }

    /// Hard-deletes a product that was never sold or purchased. A product
    /// with sale or purchase history must be deactivated instead, so the
    /// rows behind old receipts keep resolving.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;

        let existing = ProductEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        let sale_refs = SaleItemEntity::find()
            .filter(sale_item::Column::ProductId.eq(id))
            .count(db)
            .await?;
        let purchase_refs = PurchaseItemEntity::find()
            .filter(purchase_item::Column::ProductId.eq(id))
            .count(db)
            .await?;

        if sale_refs > 0 || purchase_refs > 0 {
            return Err(ServiceError::Conflict(
                "Product has sale or purchase history and cannot be deleted; deactivate it instead"
                    .to_string(),
            ));
        }

        ProductEntity::delete_by_id(existing.id).exec(db).await?;

        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        let db = &*self.db;

        ProductEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    /// Barcode lookup used by the POS scanner path
    #[instrument(skip(self))]
    pub async fn get_product_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db;

        ProductEntity::find()
            .filter(product::Column::Barcode.eq(barcode))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No product with barcode {}", barcode))
            })
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        params: ProductListParams,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let db = &*self.db;

        let mut query = ProductEntity::find();

        if let Some(search) = &params.search {
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.contains(search))
                    .add(product::Column::Barcode.eq(search.clone())),
            );
        }
        if let Some(category_id) = params.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if params.active_only {
            query = query.filter(product::Column::Active.eq(true));
        }

        let paginator = query
            .order_by_asc(product::Column::Name)
            .paginate(db, params.per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!("Failed to count products: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let products = paginator.fetch_page(params.page.saturating_sub(1)).await?;

        Ok((products, total))
    }

    /// Active products at or below their minimum stock threshold
    #[instrument(skip(self))]
    pub async fn low_stock_products(&self) -> Result<Vec<product::Model>, ServiceError> {
        let db = &*self.db;

        let products = ProductEntity::find()
            .filter(product::Column::Active.eq(true))
            .filter(
                Expr::col(product::Column::Stock).lte(Expr::col(product::Column::MinStock)),
            )
            .order_by_asc(product::Column::Stock)
            .all(db)
            .await?;

        Ok(products)
    }
}
