// Catalog
pub mod categories;
pub mod products;

// Inventory
pub mod inventory;

// Purchasing
pub mod purchases;
pub mod suppliers;

// Point of sale
pub mod cash_registers;
pub mod sales;

// Reporting
pub mod dashboard;

// Administration
pub mod settings;
pub mod users;
