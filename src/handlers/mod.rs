pub mod auth;
pub mod cash_registers;
pub mod categories;
pub mod common;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod products;
pub mod purchases;
pub mod sales;
pub mod settings;
pub mod suppliers;
pub mod users;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: crate::services::categories::CategoryService,
    pub products: crate::services::products::ProductService,
    pub inventory: crate::services::inventory::InventoryService,
    pub suppliers: crate::services::suppliers::SupplierService,
    pub purchases: crate::services::purchases::PurchaseService,
    pub sales: crate::services::sales::SalesService,
    pub cash_registers: crate::services::cash_registers::CashRegisterService,
    pub dashboard: crate::services::dashboard::DashboardService,
    pub users: crate::services::users::UserService,
    pub settings: crate::services::settings::SettingsService,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        auth_service: Arc<crate::auth::AuthService>,
        config: &AppConfig,
    ) -> Self {
        Self {
            categories: crate::services::categories::CategoryService::new(db_pool.clone()),
            products: crate::services::products::ProductService::new(db_pool.clone()),
            inventory: crate::services::inventory::InventoryService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            suppliers: crate::services::suppliers::SupplierService::new(db_pool.clone()),
            purchases: crate::services::purchases::PurchaseService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            sales: crate::services::sales::SalesService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            cash_registers: crate::services::cash_registers::CashRegisterService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
            dashboard: crate::services::dashboard::DashboardService::new(
                db_pool.clone(),
                config.business_day_offset_minutes,
            ),
            users: crate::services::users::UserService::new(
                db_pool.clone(),
                auth_service,
                event_sender,
            ),
            settings: crate::services::settings::SettingsService::new(db_pool),
        }
    }
}
