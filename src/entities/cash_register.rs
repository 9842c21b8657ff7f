use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Register session state. At most one `Open` session exists at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Cash register session.
///
/// `expected_amount` and `difference` stay NULL while the session is open and
/// are written once at close: expected is the opening float plus cash sales
/// plus deposits minus withdrawals, difference is counted minus expected.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_registers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// User who opened the session
    pub opened_by: Uuid,

    /// Cash placed in the drawer at open time
    #[serde(serialize_with = "super::money::serialize")]
    pub opening_amount: Decimal,

    /// Cash counted in the drawer at close time
    #[sea_orm(nullable)]
    #[serde(serialize_with = "super::money::serialize_opt")]
    pub closing_amount: Option<Decimal>,

    #[sea_orm(nullable)]
    #[serde(serialize_with = "super::money::serialize_opt")]
    pub expected_amount: Option<Decimal>,

    #[sea_orm(nullable)]
    #[serde(serialize_with = "super::money::serialize_opt")]
    pub difference: Option<Decimal>,

    pub status: RegisterStatus,

    pub opened_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OpenedBy",
        to = "super::user::Column::Id"
    )]
    OpenedByUser,
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
    #[sea_orm(has_many = "super::cash_movement::Entity")]
    CashMovements,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpenedByUser.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::cash_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashMovements.def()
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
            if let ActiveValue::NotSet = active_model.status {
                active_model.status = Set(RegisterStatus::Open);
            }
            if let ActiveValue::NotSet = active_model.opened_at {
                active_model.opened_at = Set(Utc::now());
            }
        }

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if model.opening_amount < Decimal::ZERO {
            return Err(DbErr::Custom(
                "Validation error: opening amount must not be negative".to_string(),
            ));
        }

        Ok(active_model)
    }
}
