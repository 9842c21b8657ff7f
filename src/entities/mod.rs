//! Database entities for the KioskPro domain.
//!
//! One module per table, plus shared serde helpers for money amounts.
//! String-backed enums live next to the entity that stores them.

pub mod cash_movement;
pub mod cash_register;
pub mod category;
pub mod money;
pub mod product;
pub mod purchase;
pub mod purchase_item;
pub mod sale;
pub mod sale_item;
pub mod setting;
pub mod stock_movement;
pub mod supplier;
pub mod user;

pub use cash_movement::Entity as CashMovement;
pub use cash_register::Entity as CashRegister;
pub use category::Entity as Category;
pub use product::Entity as Product;
pub use purchase::Entity as Purchase;
pub use purchase_item::Entity as PurchaseItem;
pub use sale::Entity as Sale;
pub use sale_item::Entity as SaleItem;
pub use setting::Entity as Setting;
pub use stock_movement::Entity as StockMovement;
pub use supplier::Entity as Supplier;
pub use user::Entity as User;
