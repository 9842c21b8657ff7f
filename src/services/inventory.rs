use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::product::{self, Entity as ProductEntity};
use crate::entities::stock_movement::{self, Entity as StockMovementEntity, MovementType};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Service for stock adjustments and the movement audit trail
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdjustStockInput {
    pub movement_type: MovementType,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    pub reason: String,
}

/// The adjustment vocabulary used on the shop floor. These are the values
/// clients send; the movement log normalizes them to add/subtract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    /// Goods received outside a purchase order
    Entrada,
    /// Customer return back onto the shelf
    Devolucion,
    /// Goods leaving outside a sale
    Salida,
    /// Downward count correction
    Ajuste,
    /// Shrinkage, breakage, expiry
    Merma,
}

impl AdjustmentKind {
    pub fn movement_type(self) -> MovementType {
        match self {
            AdjustmentKind::Entrada | AdjustmentKind::Devolucion => MovementType::Add,
            AdjustmentKind::Salida | AdjustmentKind::Ajuste | AdjustmentKind::Merma => {
                MovementType::Subtract
            }
        }
    }
}

/// Applies a movement to an on-hand count. Subtractions clamp at zero so a
/// miscounted shrinkage entry can never drive stock negative.
pub fn apply_movement(stock: i32, movement_type: MovementType, quantity: i32) -> i32 {
    match movement_type {
        MovementType::Add => stock.saturating_add(quantity),
        MovementType::Subtract => (stock - quantity).max(0),
    }
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Adjusts a product's stock and records the movement in one
    /// transaction. The movement row keeps the requested quantity even when
    /// the stock update clamps at zero.
    #[instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        product_id: Uuid,
        input: AdjustStockInput,
        created_by: Option<Uuid>,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;
        let txn = db.begin().await?;

        let product = ProductEntity::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let old_stock = product.stock;
        let new_stock = apply_movement(old_stock, input.movement_type, input.quantity);

        let mut active_model = product.into_active_model();
        active_model.stock = Set(new_stock);
        let updated = active_model.update(&txn).await?;

        let movement = stock_movement::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            movement_type: Set(input.movement_type),
            quantity: Set(input.quantity),
            reason: Set(input.reason.clone()),
            created_by: Set(created_by),
            ..Default::default()
        };
        movement.insert(&txn).await.map_err(|e| {
            error!("Failed to record stock movement: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::StockAdjusted {
                product_id,
                movement_type: input.movement_type,
                quantity: input.quantity,
                old_stock,
                new_stock,
            })
            .await;

        if updated.active && new_stock <= updated.min_stock {
            self.event_sender
                .send_or_log(Event::LowStock {
                    product_id,
                    stock: new_stock,
                    min_stock: updated.min_stock,
                })
                .await;
        }

        info!(
            product_id = %product_id,
            old_stock,
            new_stock,
            reason = %input.reason,
            "Stock adjusted"
        );

        Ok(updated)
    }

    /// Movement history, most recent first, optionally scoped to a product
    /// and direction
    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        product_id: Option<Uuid>,
        movement_type: Option<MovementType>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<stock_movement::Model>, u64), ServiceError> {
        let db = &*self.db;

        let mut query = StockMovementEntity::find();
        if let Some(product_id) = product_id {
            query = query.filter(stock_movement::Column::ProductId.eq(product_id));
        }
        if let Some(movement_type) = movement_type {
            query = query.filter(stock_movement::Column::MovementType.eq(movement_type));
        }

        let paginator = query
            .order_by_desc(stock_movement::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!("Failed to count stock movements: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let movements = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((movements, total))
    }
}
