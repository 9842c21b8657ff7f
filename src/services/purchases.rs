use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::product::Entity as ProductEntity;
use crate::entities::purchase::{self, Entity as PurchaseEntity, PurchaseStatus};
use crate::entities::purchase_item::{self, Entity as PurchaseItemEntity};
use crate::entities::stock_movement::{self, MovementType};
use crate::entities::supplier::Entity as SupplierEntity;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Service for supplier purchase orders
#[derive(Clone)]
pub struct PurchaseService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PurchaseItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub unit_cost: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePurchaseInput {
    pub supplier_id: Uuid,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    #[validate]
    pub items: Vec<PurchaseItemInput>,
}

/// Purchase header together with its lines
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseDetails {
    #[serde(flatten)]
    pub purchase: purchase::Model,
    pub items: Vec<purchase_item::Model>,
}

/// Order total from the requested lines. Unit costs must not be negative;
/// quantities are validated upstream.
pub fn purchase_total(items: &[PurchaseItemInput]) -> Result<Decimal, ServiceError> {
    let mut total = Decimal::ZERO;
    for item in items {
        if item.unit_cost < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Unit cost must not be negative".to_string(),
            ));
        }
        total += item.unit_cost * Decimal::from(item.quantity);
    }
    Ok(total)
}

impl PurchaseService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Creates a pending purchase order. The stored total is always derived
    /// from the lines, never taken from the request.
    #[instrument(skip(self, input), fields(supplier_id = %input.supplier_id, items = input.items.len()))]
    pub async fn create_purchase(
        &self,
        input: CreatePurchaseInput,
    ) -> Result<PurchaseDetails, ServiceError> {
        input.validate()?;
        if input.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A purchase needs at least one item".to_string(),
            ));
        }
        let total = purchase_total(&input.items)?;

        let db = &*self.db;
        let txn = db.begin().await?;

        let supplier = SupplierEntity::find_by_id(input.supplier_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", input.supplier_id))
            })?;
        if !supplier.active {
            return Err(ServiceError::InvalidOperation(format!(
                "Supplier {} is inactive",
                supplier.name
            )));
        }

        for item in &input.items {
            let exists = ProductEntity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .is_some();
            if !exists {
                return Err(ServiceError::NotFound(format!(
                    "Product {} not found",
                    item.product_id
                )));
            }
        }

        let purchase_id = Uuid::new_v4();
        let header = purchase::ActiveModel {
            id: Set(purchase_id),
            supplier_id: Set(input.supplier_id),
            total: Set(total),
            status: Set(PurchaseStatus::Pending),
            notes: Set(input.notes),
            received_at: Set(None),
            ..Default::default()
        };
        let created = header.insert(&txn).await.map_err(|e| {
            error!("Failed to create purchase: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in input.items {
            let subtotal = item.unit_cost * Decimal::from(item.quantity);
            let line = purchase_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_id: Set(purchase_id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                unit_cost: Set(item.unit_cost),
                subtotal: Set(subtotal),
            };
            items.push(line.insert(&txn).await?);
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PurchaseCreated(purchase_id))
            .await;

        info!(purchase_id = %purchase_id, total = %created.total, "Purchase created");

        Ok(PurchaseDetails {
            purchase: created,
            items,
        })
    }

    /// Receives a pending order: every line's quantity is added to the
    /// product's stock with a movement row, then the order flips to
    /// received. All of it commits or none of it does.
    #[instrument(skip(self))]
    pub async fn receive_purchase(&self, id: Uuid) -> Result<PurchaseDetails, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await?;

        let purchase = PurchaseEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase {} not found", id)))?;

        if purchase.status != PurchaseStatus::Pending {
            return Err(ServiceError::InvalidOperation(format!(
                "Purchase {} is {:?} and cannot be received",
                id, purchase.status
            )));
        }

        let items = PurchaseItemEntity::find()
            .filter(purchase_item::Column::PurchaseId.eq(id))
            .all(&txn)
            .await?;

        for item in &items {
            let product = ProductEntity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Product {} not found", item.product_id))
                })?;

            let new_stock = product.stock.saturating_add(item.quantity);
            let mut product_model = product.into_active_model();
            product_model.stock = Set(new_stock);
            product_model.update(&txn).await?;

            let movement = stock_movement::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(item.product_id),
                movement_type: Set(MovementType::Add),
                quantity: Set(item.quantity),
                reason: Set(format!("Compra {} recibida", id)),
                created_by: Set(None),
                ..Default::default()
            };
            movement.insert(&txn).await?;
        }

        let mut active_model = purchase.into_active_model();
        active_model.status = Set(PurchaseStatus::Received);
        active_model.received_at = Set(Some(Utc::now()));
        let updated = active_model.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PurchaseReceived {
                purchase_id: id,
                item_count: items.len(),
            })
            .await;

        info!(purchase_id = %id, items = items.len(), "Purchase received into stock");

        Ok(PurchaseDetails {
            purchase: updated,
            items,
        })
    }

    /// Cancels an order that has not been received yet
    #[instrument(skip(self))]
    pub async fn cancel_purchase(&self, id: Uuid) -> Result<purchase::Model, ServiceError> {
        let db = &*self.db;

        let purchase = PurchaseEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase {} not found", id)))?;

        if purchase.status != PurchaseStatus::Pending {
            return Err(ServiceError::InvalidOperation(format!(
                "Purchase {} is {:?} and cannot be cancelled",
                id, purchase.status
            )));
        }

        let mut active_model = purchase.into_active_model();
        active_model.status = Set(PurchaseStatus::Cancelled);
        let updated = active_model.update(db).await?;

        self.event_sender
            .send_or_log(Event::PurchaseCancelled(id))
            .await;

        info!(purchase_id = %id, "Purchase cancelled");
        Ok(updated)
    }

    /// Removes a pending or cancelled order and its lines. Received orders
    /// have already moved stock and stay on record.
    #[instrument(skip(self))]
    pub async fn delete_purchase(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await?;

        let purchase = PurchaseEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase {} not found", id)))?;

        if purchase.status == PurchaseStatus::Received {
            return Err(ServiceError::InvalidOperation(format!(
                "Purchase {} has been received and cannot be deleted",
                id
            )));
        }

        PurchaseItemEntity::delete_many()
            .filter(purchase_item::Column::PurchaseId.eq(id))
            .exec(&txn)
            .await?;
        PurchaseEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(purchase_id = %id, "Purchase deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_purchase(&self, id: Uuid) -> Result<PurchaseDetails, ServiceError> {
        let db = &*self.db;

        let purchase = PurchaseEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase {} not found", id)))?;

        let items = PurchaseItemEntity::find()
            .filter(purchase_item::Column::PurchaseId.eq(id))
            .all(db)
            .await?;

        Ok(PurchaseDetails { purchase, items })
    }

    #[instrument(skip(self))]
    pub async fn list_purchases(
        &self,
        status: Option<PurchaseStatus>,
        supplier_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase::Model>, u64), ServiceError> {
        let db = &*self.db;

        let mut query = PurchaseEntity::find();
        if let Some(status) = status {
            query = query.filter(purchase::Column::Status.eq(status));
        }
        if let Some(supplier_id) = supplier_id {
            query = query.filter(purchase::Column::SupplierId.eq(supplier_id));
        }

        let paginator = query
            .order_by_desc(purchase::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!("Failed to count purchases: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let purchases = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((purchases, total))
    }
}
