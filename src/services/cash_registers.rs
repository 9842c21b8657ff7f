use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::cash_movement::{self, CashMovementKind, Entity as CashMovementEntity};
use crate::entities::cash_register::{self, Entity as CashRegisterEntity, RegisterStatus};
use crate::entities::sale::{self, Entity as SaleEntity, PaymentMethod};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Service for cash register sessions and drawer movements
#[derive(Clone)]
pub struct CashRegisterService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OpenRegisterInput {
    pub opening_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CloseRegisterInput {
    pub closing_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordMovementInput {
    pub kind: CashMovementKind,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    pub reason: String,
}

/// Cash attributable to a register session so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawerTotals {
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub cash_sales: Decimal,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub deposits: Decimal,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub withdrawals: Decimal,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub expected: Decimal,
}

/// Open session with its running drawer totals
#[derive(Debug, Clone, Serialize)]
pub struct RegisterSummary {
    #[serde(flatten)]
    pub register: cash_register::Model,
    pub totals: DrawerTotals,
}

/// What the drawer should hold: the float it opened with, plus cash taken
/// in sales, plus deposits, minus withdrawals. Card and transfer sales
/// never touch the drawer.
pub fn expected_in_drawer(
    opening: Decimal,
    cash_sales: Decimal,
    deposits: Decimal,
    withdrawals: Decimal,
) -> Decimal {
    opening + cash_sales + deposits - withdrawals
}

impl CashRegisterService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Opens a register session. Exactly one session may be open at a time;
    /// the check and the insert run in the same transaction so two
    /// concurrent opens cannot both succeed.
    #[instrument(skip(self))]
    pub async fn open_register(
        &self,
        input: OpenRegisterInput,
        opened_by: Uuid,
    ) -> Result<cash_register::Model, ServiceError> {
        if input.opening_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Opening amount must not be negative".to_string(),
            ));
        }

        let db = &*self.db;
        let txn = db.begin().await?;

        let already_open = CashRegisterEntity::find()
            .filter(cash_register::Column::Status.eq(RegisterStatus::Open))
            .one(&txn)
            .await?;
        if already_open.is_some() {
            return Err(ServiceError::Conflict(
                "A register session is already open".to_string(),
            ));
        }

        let model = cash_register::ActiveModel {
            id: Set(Uuid::new_v4()),
            opened_by: Set(opened_by),
            opening_amount: Set(input.opening_amount),
            closing_amount: Set(None),
            expected_amount: Set(None),
            difference: Set(None),
            status: Set(RegisterStatus::Open),
            closed_at: Set(None),
            ..Default::default()
        };
        let created = model.insert(&txn).await.map_err(|e| {
            error!("Failed to open register: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::RegisterOpened {
                register_id: created.id,
                opened_by,
            })
            .await;

        info!(register_id = %created.id, opening_amount = %created.opening_amount, "Register opened");
        Ok(created)
    }

    /// Closes the open session. The expected amount is reconstructed from
    /// this session's cash sales and movements inside the closing
    /// transaction, and the difference against the counted amount is stored
    /// with the row.
    #[instrument(skip(self))]
    pub async fn close_register(
        &self,
        input: CloseRegisterInput,
    ) -> Result<cash_register::Model, ServiceError> {
        if input.closing_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Closing amount must not be negative".to_string(),
            ));
        }

        let db = &*self.db;
        let txn = db.begin().await?;

        let register = CashRegisterEntity::find()
            .filter(cash_register::Column::Status.eq(RegisterStatus::Open))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidOperation("No register session is open".to_string())
            })?;

        let totals = self.drawer_totals(&txn, &register).await?;
        let difference = input.closing_amount - totals.expected;

        let register_id = register.id;
        let mut active_model = register.into_active_model();
        active_model.closing_amount = Set(Some(input.closing_amount));
        active_model.expected_amount = Set(Some(totals.expected));
        active_model.difference = Set(Some(difference));
        active_model.status = Set(RegisterStatus::Closed);
        active_model.closed_at = Set(Some(Utc::now()));
        let closed = active_model.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::RegisterClosed {
                register_id,
                difference,
            })
            .await;

        info!(
            register_id = %register_id,
            expected = %totals.expected,
            counted = %input.closing_amount,
            difference = %difference,
            "Register closed"
        );

        Ok(closed)
    }

    /// Records a deposit or withdrawal against the open session
    #[instrument(skip(self))]
    pub async fn record_movement(
        &self,
        input: RecordMovementInput,
        created_by: Uuid,
    ) -> Result<cash_movement::Model, ServiceError> {
        input.validate()?;
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Movement amount must be positive".to_string(),
            ));
        }

        let db = &*self.db;
        let txn = db.begin().await?;

        let register = CashRegisterEntity::find()
            .filter(cash_register::Column::Status.eq(RegisterStatus::Open))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidOperation("No register session is open".to_string())
            })?;

        let model = cash_movement::ActiveModel {
            id: Set(Uuid::new_v4()),
            cash_register_id: Set(register.id),
            kind: Set(input.kind),
            amount: Set(input.amount),
            reason: Set(input.reason),
            created_by: Set(created_by),
            ..Default::default()
        };
        let created = model.insert(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CashMovementRecorded {
                register_id: register.id,
                kind: created.kind,
                amount: created.amount,
            })
            .await;

        info!(
            register_id = %register.id,
            kind = ?created.kind,
            amount = %created.amount,
            "Cash movement recorded"
        );

        Ok(created)
    }

    /// The open session with live drawer totals, or None when the register
    /// is closed
    #[instrument(skip(self))]
    pub async fn current_register(&self) -> Result<Option<RegisterSummary>, ServiceError> {
        let db = &*self.db;

        let register = CashRegisterEntity::find()
            .filter(cash_register::Column::Status.eq(RegisterStatus::Open))
            .one(db)
            .await?;

        match register {
            Some(register) => {
                let totals = self.drawer_totals(db, &register).await?;
                Ok(Some(RegisterSummary { register, totals }))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_register(&self, id: Uuid) -> Result<cash_register::Model, ServiceError> {
        let db = &*self.db;

        CashRegisterEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Register session {} not found", id)))
    }

    /// Session history, newest first
    #[instrument(skip(self))]
    pub async fn list_registers(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<cash_register::Model>, u64), ServiceError> {
        let db = &*self.db;

        let paginator = CashRegisterEntity::find()
            .order_by_desc(cash_register::Column::OpenedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!("Failed to count register sessions: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let registers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((registers, total))
    }

    /// Movements recorded against one session
    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        register_id: Uuid,
    ) -> Result<Vec<cash_movement::Model>, ServiceError> {
        let db = &*self.db;

        let movements = CashMovementEntity::find()
            .filter(cash_movement::Column::CashRegisterId.eq(register_id))
            .order_by_asc(cash_movement::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(movements)
    }

    async fn drawer_totals<C: ConnectionTrait>(
        &self,
        conn: &C,
        register: &cash_register::Model,
    ) -> Result<DrawerTotals, ServiceError> {
        let cash_sales: Decimal = SaleEntity::find()
            .filter(sale::Column::CashRegisterId.eq(register.id))
            .filter(sale::Column::PaymentMethod.eq(PaymentMethod::Cash))
            .all(conn)
            .await?
            .iter()
            .map(|s| s.total)
            .sum();

        let movements = CashMovementEntity::find()
            .filter(cash_movement::Column::CashRegisterId.eq(register.id))
            .all(conn)
            .await?;

        let mut deposits = Decimal::ZERO;
        let mut withdrawals = Decimal::ZERO;
        for movement in movements {
            match movement.kind {
                CashMovementKind::Deposit => deposits += movement.amount,
                CashMovementKind::Withdrawal => withdrawals += movement.amount,
            }
        }

        let expected = expected_in_drawer(register.opening_amount, cash_sales, deposits, withdrawals);

        Ok(DrawerTotals {
            cash_sales,
            deposits,
            withdrawals,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::all_flows(dec!(100.00), dec!(55.50), dec!(20.00), dec!(30.00), dec!(145.50))]
    #[case::no_activity(dec!(75.25), dec!(0), dec!(0), dec!(0), dec!(75.25))]
    #[case::withdrawal_below_opening(dec!(50.00), dec!(0), dec!(0), dec!(80.00), dec!(-30.00))]
    fn expected_in_drawer_arithmetic(
        #[case] opening: Decimal,
        #[case] cash_sales: Decimal,
        #[case] deposits: Decimal,
        #[case] withdrawals: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(
            expected_in_drawer(opening, cash_sales, deposits, withdrawals),
            expected
        );
    }
}
