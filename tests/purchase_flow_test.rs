mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use common::TestApp;
use kioskpro::entities::purchase::PurchaseStatus;
use kioskpro::entities::purchase_item::{self, Entity as PurchaseItemEntity};
use kioskpro::entities::stock_movement::{self, Entity as StockMovementEntity, MovementType};
use kioskpro::errors::ServiceError;
use kioskpro::services::purchases::{CreatePurchaseInput, PurchaseItemInput};

#[tokio::test]
async fn purchase_is_created_pending_with_derived_total() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Distribuidora Norte").await;
    let rice = app.seed_product("Arroz 1kg", dec!(4.50), dec!(2.80), 10, 5).await;
    let oil = app.seed_product("Aceite 900ml", dec!(7.80), dec!(5.10), 4, 2).await;

    let details = app
        .state
        .services
        .purchases
        .create_purchase(CreatePurchaseInput {
            supplier_id: supplier.id,
            notes: Some("Reposición semanal".to_string()),
            items: vec![
                PurchaseItemInput {
                    product_id: rice.id,
                    quantity: 20,
                    unit_cost: dec!(2.60),
                },
                PurchaseItemInput {
                    product_id: oil.id,
                    quantity: 6,
                    unit_cost: dec!(4.90),
                },
            ],
        })
        .await
        .expect("create purchase");

    // 20 * 2.60 + 6 * 4.90
    assert_eq!(details.purchase.total, dec!(81.40));
    assert_eq!(details.purchase.status, PurchaseStatus::Pending);
    assert!(details.purchase.received_at.is_none());

    assert_eq!(details.items.len(), 2);
    let rice_line = details
        .items
        .iter()
        .find(|i| i.product_id == rice.id)
        .expect("rice line");
    assert_eq!(rice_line.subtotal, dec!(52.00));
    assert_eq!(rice_line.unit_cost, dec!(2.60));
}

#[tokio::test]
async fn receiving_raises_stock_and_records_movements() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Comercial Sur").await;
    let product = app.seed_product("Fideos 500g", dec!(2.60), dec!(1.50), 8, 5).await;

    let details = app
        .state
        .services
        .purchases
        .create_purchase(CreatePurchaseInput {
            supplier_id: supplier.id,
            notes: None,
            items: vec![PurchaseItemInput {
                product_id: product.id,
                quantity: 30,
                unit_cost: dec!(1.40),
            }],
        })
        .await
        .expect("create purchase");

    let received = app
        .state
        .services
        .purchases
        .receive_purchase(details.purchase.id)
        .await
        .expect("receive purchase");

    assert_eq!(received.purchase.status, PurchaseStatus::Received);
    assert!(received.purchase.received_at.is_some());
    assert!(received.purchase.updated_at.is_some());

    let refreshed = app
        .state
        .services
        .products
        .get_product(product.id)
        .await
        .expect("reload product");
    assert_eq!(refreshed.stock, 38);

    let movements = StockMovementEntity::find()
        .filter(stock_movement::Column::ProductId.eq(product.id))
        .all(&*app.state.db)
        .await
        .expect("load movements");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].movement_type, MovementType::Add);
    assert_eq!(movements[0].quantity, 30);
}

#[tokio::test]
async fn a_purchase_cannot_be_received_twice() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Mayorista Este").await;
    let product = app.seed_product("Lavandina 1L", dec!(2.90), dec!(1.60), 0, 3).await;

    let details = app
        .state
        .services
        .purchases
        .create_purchase(CreatePurchaseInput {
            supplier_id: supplier.id,
            notes: None,
            items: vec![PurchaseItemInput {
                product_id: product.id,
                quantity: 12,
                unit_cost: dec!(1.55),
            }],
        })
        .await
        .expect("create purchase");

    app.state
        .services
        .purchases
        .receive_purchase(details.purchase.id)
        .await
        .expect("first receive");

    let err = app
        .state
        .services
        .purchases
        .receive_purchase(details.purchase.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    // Stock moved exactly once
    let refreshed = app
        .state
        .services
        .products
        .get_product(product.id)
        .await
        .expect("reload product");
    assert_eq!(refreshed.stock, 12);
}

#[tokio::test]
async fn cancelled_purchase_never_touches_stock() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Proveedor Uno").await;
    let product = app.seed_product("Galletas", dec!(2.20), dec!(1.20), 7, 3).await;

    let details = app
        .state
        .services
        .purchases
        .create_purchase(CreatePurchaseInput {
            supplier_id: supplier.id,
            notes: None,
            items: vec![PurchaseItemInput {
                product_id: product.id,
                quantity: 50,
                unit_cost: dec!(1.00),
            }],
        })
        .await
        .expect("create purchase");

    let cancelled = app
        .state
        .services
        .purchases
        .cancel_purchase(details.purchase.id)
        .await
        .expect("cancel purchase");
    assert_eq!(cancelled.status, PurchaseStatus::Cancelled);

    let err = app
        .state
        .services
        .purchases
        .receive_purchase(details.purchase.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    let refreshed = app
        .state
        .services
        .products
        .get_product(product.id)
        .await
        .expect("reload product");
    assert_eq!(refreshed.stock, 7);
}

#[tokio::test]
async fn deleting_a_pending_purchase_removes_its_lines() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Proveedor Dos").await;
    let product = app.seed_product("Detergente", dec!(5.50), dec!(3.20), 2, 2).await;

    let details = app
        .state
        .services
        .purchases
        .create_purchase(CreatePurchaseInput {
            supplier_id: supplier.id,
            notes: None,
            items: vec![PurchaseItemInput {
                product_id: product.id,
                quantity: 5,
                unit_cost: dec!(3.00),
            }],
        })
        .await
        .expect("create purchase");

    app.state
        .services
        .purchases
        .delete_purchase(details.purchase.id)
        .await
        .expect("delete pending purchase");

    let err = app
        .state
        .services
        .purchases
        .get_purchase(details.purchase.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let orphans = PurchaseItemEntity::find()
        .filter(purchase_item::Column::PurchaseId.eq(details.purchase.id))
        .all(&*app.state.db)
        .await
        .expect("load lines");
    assert!(orphans.is_empty());
}

#[tokio::test]
async fn a_received_purchase_cannot_be_deleted() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Proveedor Tres").await;
    let product = app.seed_product("Agua 600ml", dec!(1.50), dec!(0.80), 0, 6).await;

    let details = app
        .state
        .services
        .purchases
        .create_purchase(CreatePurchaseInput {
            supplier_id: supplier.id,
            notes: None,
            items: vec![PurchaseItemInput {
                product_id: product.id,
                quantity: 24,
                unit_cost: dec!(0.75),
            }],
        })
        .await
        .expect("create purchase");

    app.state
        .services
        .purchases
        .receive_purchase(details.purchase.id)
        .await
        .expect("receive purchase");

    let err = app
        .state
        .services
        .purchases
        .delete_purchase(details.purchase.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn inactive_suppliers_and_unknown_products_are_rejected() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Proveedor Dormido").await;
    let product = app.seed_product("Maní 200g", dec!(2.80), dec!(1.50), 1, 1).await;

    app.state
        .services
        .suppliers
        .deactivate_supplier(supplier.id)
        .await
        .expect("deactivate supplier");

    let err = app
        .state
        .services
        .purchases
        .create_purchase(CreatePurchaseInput {
            supplier_id: supplier.id,
            notes: None,
            items: vec![PurchaseItemInput {
                product_id: product.id,
                quantity: 1,
                unit_cost: dec!(1.50),
            }],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    app.state
        .services
        .suppliers
        .reactivate_supplier(supplier.id)
        .await
        .expect("reactivate supplier");

    let err = app
        .state
        .services
        .purchases
        .create_purchase(CreatePurchaseInput {
            supplier_id: supplier.id,
            notes: None,
            items: vec![PurchaseItemInput {
                product_id: Uuid::new_v4(),
                quantity: 1,
                unit_cost: dec!(1.00),
            }],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}
