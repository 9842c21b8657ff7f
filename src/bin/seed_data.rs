//! Seed data script - populates the database with demo data for a kiosk.
//!
//! Run with: cargo run --bin seed-data [-- --fresh]
//!
//! This creates:
//! - 4 categories and 12 products with barcodes and stock
//! - 3 suppliers
//! - Store settings (name, currency, tax rate, receipt footer)
//! - An admin account (admin@kioskpro.local / admin12345)

use clap::Parser;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use uuid::Uuid;

use kioskpro::auth::{AuthConfig, AuthService};
use kioskpro::config;
use kioskpro::entities::{category, product, setting, supplier, user};
use kioskpro::migrator::Migrator;

#[derive(Parser)]
#[command(name = "seed-data", about = "Populate the KioskPro database with demo data")]
struct Cli {
    /// Drop all tables and re-run migrations before seeding
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("Connecting to {}", cfg.database_url());
    let db = kioskpro::db::establish_connection_from_app_config(&cfg).await?;

    if cli.fresh {
        info!("Recreating schema from scratch");
        Migrator::fresh(&db).await?;
    } else {
        Migrator::up(&db, None).await?;
    }

    let categories = seed_categories(&db).await?;
    info!("Created {} categories", categories.len());

    let products = seed_products(&db, &categories).await?;
    info!("Created {} products", products.len());

    let suppliers = seed_suppliers(&db).await?;
    info!("Created {} suppliers", suppliers.len());

    seed_settings(&db).await?;
    info!("Created store settings");

    let auth = AuthService::new(AuthConfig::from(&cfg));
    seed_admin(&db, &auth).await?;
    info!("Created admin account admin@kioskpro.local (password: admin12345)");

    info!("Seed complete");
    Ok(())
}

async fn seed_categories(db: &DatabaseConnection) -> anyhow::Result<Vec<category::Model>> {
    let specs = [
        ("Bebidas", "#3b82f6", "cup"),
        ("Snacks", "#f59e0b", "cookie"),
        ("Limpieza", "#10b981", "spray"),
        ("Abarrotes", "#8b5cf6", "basket"),
    ];

    let mut created = Vec::with_capacity(specs.len());
    for (name, color, icon) in specs {
        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            color: Set(Some(color.to_string())),
            icon: Set(Some(icon.to_string())),
            ..Default::default()
        };
        created.push(model.insert(db).await?);
    }
    Ok(created)
}

async fn seed_products(
    db: &DatabaseConnection,
    categories: &[category::Model],
) -> anyhow::Result<Vec<product::Model>> {
    // (name, barcode, category index, price, cost, stock, min_stock)
    let specs = [
        ("Agua mineral 600ml", "7790001000011", 0, dec!(1.50), dec!(0.80), 48, 12),
        ("Gaseosa cola 500ml", "7790001000028", 0, dec!(2.50), dec!(1.40), 36, 12),
        ("Jugo de naranja 1L", "7790001000035", 0, dec!(3.80), dec!(2.10), 20, 6),
        ("Cerveza rubia 473ml", "7790001000042", 0, dec!(4.20), dec!(2.60), 24, 8),
        ("Papas fritas 150g", "7790002000010", 1, dec!(3.20), dec!(1.80), 30, 10),
        ("Maní salado 200g", "7790002000027", 1, dec!(2.80), dec!(1.50), 25, 8),
        ("Galletas surtidas", "7790002000034", 1, dec!(2.20), dec!(1.20), 40, 10),
        ("Detergente 750ml", "7790003000019", 2, dec!(5.50), dec!(3.20), 15, 5),
        ("Lavandina 1L", "7790003000026", 2, dec!(2.90), dec!(1.60), 18, 5),
        ("Arroz 1kg", "7790004000018", 3, dec!(4.50), dec!(2.80), 35, 10),
        ("Fideos 500g", "7790004000025", 3, dec!(2.60), dec!(1.50), 42, 10),
        ("Aceite girasol 900ml", "7790004000032", 3, dec!(7.80), dec!(5.10), 12, 4),
    ];

    let mut created = Vec::with_capacity(specs.len());
    for (name, barcode, cat_idx, price, cost, stock, min_stock) in specs {
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            barcode: Set(Some(barcode.to_string())),
            category_id: Set(categories.get(cat_idx).map(|c| c.id)),
            price: Set(price),
            cost: Set(cost),
            stock: Set(stock),
            min_stock: Set(min_stock),
            image_url: Set(None),
            active: Set(true),
            ..Default::default()
        };
        created.push(model.insert(db).await?);
    }
    Ok(created)
}

async fn seed_suppliers(db: &DatabaseConnection) -> anyhow::Result<Vec<supplier::Model>> {
    let specs = [
        ("Distribuidora El Sol", "20100200301", "+51 1 555 0101", "ventas@elsol.example"),
        ("Comercial Andina", "20100200402", "+51 1 555 0202", "pedidos@andina.example"),
        ("Mayorista Central", "20100200503", "+51 1 555 0303", "contacto@central.example"),
    ];

    let mut created = Vec::with_capacity(specs.len());
    for (name, ruc, phone, email) in specs {
        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            ruc: Set(Some(ruc.to_string())),
            phone: Set(Some(phone.to_string())),
            email: Set(Some(email.to_string())),
            address: Set(None),
            active: Set(true),
            ..Default::default()
        };
        created.push(model.insert(db).await?);
    }
    Ok(created)
}

async fn seed_settings(db: &DatabaseConnection) -> anyhow::Result<()> {
    let defaults = [
        ("store_name", "KioskPro Demo"),
        ("currency", "PEN"),
        ("tax_rate", "18"),
        ("receipt_footer", "¡Gracias por su compra!"),
    ];

    for (key, value) in defaults {
        let model = setting::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            ..Default::default()
        };
        model.insert(db).await?;
    }
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection, auth: &AuthService) -> anyhow::Result<()> {
    let password_hash = auth
        .hash_password("admin12345")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;

    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Administrator".to_string()),
        email: Set("admin@kioskpro.local".to_string()),
        password_hash: Set(Some(password_hash)),
        role: Set(user::UserRole::Admin),
        active: Set(true),
        ..Default::default()
    };
    model.insert(db).await?;
    Ok(())
}
