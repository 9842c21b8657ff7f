mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::TestApp;
use kioskpro::entities::stock_movement::MovementType;
use kioskpro::entities::user::UserRole;
use kioskpro::errors::ServiceError;
use kioskpro::services::inventory::{AdjustStockInput, AdjustmentKind};

#[tokio::test]
async fn receipt_adjustment_raises_stock_and_leaves_a_movement() {
    let app = TestApp::new().await;
    let manager = app
        .seed_user("Encargado", "encargado@kioskpro.local", UserRole::Manager)
        .await;
    let product = app.seed_product("Azúcar 1kg", dec!(3.90), dec!(2.40), 10, 5).await;

    let updated = app
        .state
        .services
        .inventory
        .adjust_stock(
            product.id,
            AdjustStockInput {
                movement_type: AdjustmentKind::Entrada.movement_type(),
                quantity: 15,
                reason: "Entrega directa sin orden".to_string(),
            },
            Some(manager.id),
        )
        .await
        .expect("adjust stock");

    assert_eq!(updated.stock, 25);

    let (movements, total) = app
        .state
        .services
        .inventory
        .list_movements(Some(product.id), None, 1, 10)
        .await
        .expect("list movements");
    assert_eq!(total, 1);
    assert_eq!(movements[0].movement_type, MovementType::Add);
    assert_eq!(movements[0].quantity, 15);
    assert_eq!(movements[0].created_by, Some(manager.id));
}

#[tokio::test]
async fn shrinkage_clamps_at_zero_but_keeps_the_requested_quantity() {
    let app = TestApp::new().await;
    let product = app.seed_product("Yogur 1L", dec!(4.10), dec!(2.70), 3, 2).await;

    let updated = app
        .state
        .services
        .inventory
        .adjust_stock(
            product.id,
            AdjustStockInput {
                movement_type: AdjustmentKind::Merma.movement_type(),
                quantity: 10,
                reason: "Lote vencido".to_string(),
            },
            None,
        )
        .await
        .expect("adjust stock");

    assert_eq!(updated.stock, 0);

    // The audit trail records what was claimed, not what was clamped
    let (movements, _) = app
        .state
        .services
        .inventory
        .list_movements(Some(product.id), None, 1, 10)
        .await
        .expect("list movements");
    assert_eq!(movements[0].quantity, 10);
    assert_eq!(movements[0].movement_type, MovementType::Subtract);
}

#[tokio::test]
async fn movement_history_is_scoped_per_product() {
    let app = TestApp::new().await;
    let first = app.seed_product("Sal 500g", dec!(1.20), dec!(0.60), 20, 5).await;
    let second = app.seed_product("Pimienta 100g", dec!(2.40), dec!(1.30), 8, 2).await;

    for (product_id, kind, quantity) in [
        (first.id, AdjustmentKind::Entrada, 5),
        (first.id, AdjustmentKind::Salida, 2),
        (second.id, AdjustmentKind::Ajuste, 1),
    ] {
        app.state
            .services
            .inventory
            .adjust_stock(
                product_id,
                AdjustStockInput {
                    movement_type: kind.movement_type(),
                    quantity,
                    reason: "Conteo de inventario".to_string(),
                },
                None,
            )
            .await
            .expect("adjust stock");
    }

    let (_, first_total) = app
        .state
        .services
        .inventory
        .list_movements(Some(first.id), None, 1, 10)
        .await
        .expect("list movements");
    assert_eq!(first_total, 2);

    let (_, all_total) = app
        .state
        .services
        .inventory
        .list_movements(None, None, 1, 10)
        .await
        .expect("list all movements");
    assert_eq!(all_total, 3);

    // entrada adds; salida and ajuste subtract
    let (_, subtract_total) = app
        .state
        .services
        .inventory
        .list_movements(None, Some(MovementType::Subtract), 1, 10)
        .await
        .expect("list subtract movements");
    assert_eq!(subtract_total, 2);
}

#[tokio::test]
async fn adjusting_an_unknown_product_is_not_found() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .inventory
        .adjust_stock(
            Uuid::new_v4(),
            AdjustStockInput {
                movement_type: MovementType::Add,
                quantity: 1,
                reason: "no existe".to_string(),
            },
            None,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}
