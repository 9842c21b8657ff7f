use chrono::{DateTime, Utc};
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

use crate::entities::cash_register::{self, Entity as CashRegisterEntity, RegisterStatus};
use crate::entities::product::{self, Entity as ProductEntity};
use crate::entities::sale::{self, Entity as SaleEntity, PaymentMethod};
use crate::entities::sale_item::{self, Entity as SaleItemEntity};
use crate::entities::stock_movement::{self, MovementType};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Service for POS checkout and sale history
#[derive(Clone)]
pub struct SalesService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutInput {
    #[validate]
    pub items: Vec<CheckoutItemInput>,
    pub payment_method: PaymentMethod,
}

/// Sale header together with its lines
#[derive(Debug, Clone, Serialize)]
pub struct SaleDetails {
    #[serde(flatten)]
    pub sale: sale::Model,
    pub items: Vec<sale_item::Model>,
}

/// Filters accepted by the sale listing
#[derive(Debug, Clone, Default)]
pub struct SaleListParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
    pub cashier_id: Option<Uuid>,
    pub cash_register_id: Option<Uuid>,
    pub page: u64,
    pub per_page: u64,
}

impl SalesService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Rings up a sale. Prices come from the catalog at this instant, stock
    /// is decremented with a movement row per line, and the sale attaches to
    /// the open register session, which must exist. Any failed line (unknown
    /// product, inactive product, not enough stock) rolls the whole checkout
    /// back.
    #[instrument(skip(self, input), fields(cashier_id = %cashier_id, items = input.items.len()))]
    pub async fn checkout(
        &self,
        input: CheckoutInput,
        cashier_id: Uuid,
    ) -> Result<SaleDetails, ServiceError> {
        input.validate()?;
        if input.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A sale needs at least one item".to_string(),
            ));
        }

        let db = &*self.db;
        let txn = db.begin().await?;

        // Resolve every line against the catalog before writing anything
        let mut resolved: Vec<(product::Model, i32)> = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let product = ProductEntity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Product {} not found", item.product_id))
                })?;

            if !product.active {
                return Err(ServiceError::InvalidOperation(format!(
                    "Product {} is inactive and cannot be sold",
                    product.name
                )));
            }
            if product.stock < item.quantity {
                return Err(ServiceError::InsufficientStock(format!(
                    "Not enough stock for {}: requested {}, available {}",
                    product.name, item.quantity, product.stock
                )));
            }

            resolved.push((product, item.quantity));
        }

        let total: Decimal = resolved
            .iter()
            .map(|(product, quantity)| product.price * Decimal::from(*quantity))
            .sum();

        // Sales are always attributed to a register session for drawer
        // reconciliation; ringing up without one is a till-discipline error.
        let open_register = CashRegisterEntity::find()
            .filter(cash_register::Column::Status.eq(RegisterStatus::Open))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidOperation(
                    "No register session is open; open the register before selling".to_string(),
                )
            })?;

        let sale_id = Uuid::new_v4();
        let header = sale::ActiveModel {
            id: Set(sale_id),
            total: Set(total),
            payment_method: Set(input.payment_method),
            cashier_id: Set(cashier_id),
            cash_register_id: Set(Some(open_register.id)),
            ..Default::default()
        };
        let created = header.insert(&txn).await.map_err(|e| {
            error!("Failed to create sale: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let mut items = Vec::with_capacity(resolved.len());
        let mut low_stock = Vec::new();
        for (product, quantity) in resolved {
            let subtotal = product.price * Decimal::from(quantity);
            let line = sale_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale_id),
                product_id: Set(product.id),
                quantity: Set(quantity),
                unit_price: Set(product.price),
                subtotal: Set(subtotal),
            };
            items.push(line.insert(&txn).await?);

            let new_stock = product.stock - quantity;
            if new_stock <= product.min_stock {
                low_stock.push((product.id, new_stock, product.min_stock));
            }

            let product_id = product.id;
            let mut product_model = product.into_active_model();
            product_model.stock = Set(new_stock);
            product_model.update(&txn).await?;

            let movement = stock_movement::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(product_id),
                movement_type: Set(MovementType::Subtract),
                quantity: Set(quantity),
                reason: Set(format!("Venta {}", sale_id)),
                created_by: Set(Some(cashier_id)),
                ..Default::default()
            };
            movement.insert(&txn).await?;
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::SaleCompleted {
                sale_id,
                total,
                payment_method: input.payment_method,
                item_count: items.len(),
            })
            .await;

        for (product_id, stock, min_stock) in low_stock {
            self.event_sender
                .send_or_log(Event::LowStock {
                    product_id,
                    stock,
                    min_stock,
                })
                .await;
        }

        info!(
            sale_id = %sale_id,
            total = %total,
            payment_method = ?created.payment_method,
            "Sale completed"
        );

        Ok(SaleDetails {
            sale: created,
            items,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: Uuid) -> Result<SaleDetails, ServiceError> {
        let db = &*self.db;

        let sale = SaleEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale {} not found", id)))?;

        let items = SaleItemEntity::find()
            .filter(sale_item::Column::SaleId.eq(id))
            .all(db)
            .await?;

        Ok(SaleDetails { sale, items })
    }

    #[instrument(skip(self))]
    pub async fn list_sales(
        &self,
        params: SaleListParams,
    ) -> Result<(Vec<sale::Model>, u64), ServiceError> {
        let db = &*self.db;

        let mut query = SaleEntity::find();
        if let Some(from) = params.from {
            query = query.filter(sale::Column::CreatedAt.gte(from));
        }
        if let Some(to) = params.to {
            query = query.filter(sale::Column::CreatedAt.lt(to));
        }
        if let Some(payment_method) = params.payment_method {
            query = query.filter(sale::Column::PaymentMethod.eq(payment_method));
        }
        if let Some(cashier_id) = params.cashier_id {
            query = query.filter(sale::Column::CashierId.eq(cashier_id));
        }
        if let Some(cash_register_id) = params.cash_register_id {
            query = query.filter(sale::Column::CashRegisterId.eq(cash_register_id));
        }

        let paginator = query
            .order_by_desc(sale::Column::CreatedAt)
            .paginate(db, params.per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!("Failed to count sales: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let sales = paginator.fetch_page(params.page.saturating_sub(1)).await?;

        Ok((sales, total))
    }
}
