use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Product entity
///
/// `stock` is a denormalized on-hand count. Every write path that changes it
/// also appends a `stock_movements` row in the same transaction, so the
/// column and the audit log cannot drift.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Scannable barcode (EAN/UPC), unique when present
    #[sea_orm(nullable)]
    #[validate(length(max = 64, message = "Barcode cannot exceed 64 characters"))]
    pub barcode: Option<String>,

    /// Owning category; cleared when the category is deleted
    #[sea_orm(nullable)]
    pub category_id: Option<Uuid>,

    /// Sale price per unit
    #[serde(serialize_with = "super::money::serialize")]
    pub price: Decimal,

    /// Purchase cost per unit (used for profit calculations)
    #[serde(serialize_with = "super::money::serialize")]
    pub cost: Decimal,

    /// Units on hand
    pub stock: i32,

    /// Threshold at which the product shows up in low-stock alerts
    pub min_stock: i32,

    /// URL to the product image
    #[sea_orm(nullable)]
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    /// Inactive products are hidden from the POS and cannot be sold
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::sale_item::Entity")]
    SaleItems,
    #[sea_orm(has_many = "super::purchase_item::Entity")]
    PurchaseItems,
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::sale_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl Related<super::purchase_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseItems.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.active {
                active_model.active = Set(true);
            }
            if let ActiveValue::NotSet = active_model.stock {
                active_model.stock = Set(0);
            }
            if let ActiveValue::NotSet = active_model.min_stock {
                active_model.min_stock = Set(0);
            }
            active_model.created_at = Set(Utc::now());
        }

        active_model.updated_at = Set(Some(Utc::now()));

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }

        if model.price < Decimal::ZERO || model.cost < Decimal::ZERO {
            return Err(DbErr::Custom(
                "Validation error: price and cost must not be negative".to_string(),
            ));
        }
        if model.stock < 0 || model.min_stock < 0 {
            return Err(DbErr::Custom(
                "Validation error: stock and min_stock must not be negative".to_string(),
            ));
        }

        Ok(active_model)
    }
}
