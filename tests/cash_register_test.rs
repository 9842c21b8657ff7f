mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;

use common::TestApp;
use kioskpro::entities::cash_movement::CashMovementKind;
use kioskpro::entities::cash_register::RegisterStatus;
use kioskpro::entities::sale::PaymentMethod;
use kioskpro::entities::user::UserRole;
use kioskpro::errors::ServiceError;
use kioskpro::services::cash_registers::{
    CloseRegisterInput, OpenRegisterInput, RecordMovementInput,
};
use kioskpro::services::sales::{CheckoutInput, CheckoutItemInput};

#[tokio::test]
async fn only_one_register_session_can_be_open() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;

    app.state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(100.00) }, cashier.id)
        .await
        .expect("first open");

    let err = app
        .state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(50.00) }, cashier.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn close_reconciles_cash_sales_and_movements() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;
    let product = app.seed_product("Jugo 1L", dec!(3.80), dec!(2.10), 20, 6).await;

    app.state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(100.00) }, cashier.id)
        .await
        .expect("open register");

    // Two cash sales and one card sale; the card sale never enters the drawer
    for _ in 0..2 {
        app.state
            .services
            .sales
            .checkout(
                CheckoutInput {
                    items: vec![CheckoutItemInput {
                        product_id: product.id,
                        quantity: 1,
                    }],
                    payment_method: PaymentMethod::Cash,
                },
                cashier.id,
            )
            .await
            .expect("cash sale");
    }
    app.state
        .services
        .sales
        .checkout(
            CheckoutInput {
                items: vec![CheckoutItemInput {
                    product_id: product.id,
                    quantity: 2,
                }],
                payment_method: PaymentMethod::Card,
            },
            cashier.id,
        )
        .await
        .expect("card sale");

    app.state
        .services
        .cash_registers
        .record_movement(
            RecordMovementInput {
                kind: CashMovementKind::Deposit,
                amount: dec!(20.00),
                reason: "Cambio traído del banco".to_string(),
            },
            cashier.id,
        )
        .await
        .expect("deposit");
    app.state
        .services
        .cash_registers
        .record_movement(
            RecordMovementInput {
                kind: CashMovementKind::Withdrawal,
                amount: dec!(30.00),
                reason: "Pago a proveedor".to_string(),
            },
            cashier.id,
        )
        .await
        .expect("withdrawal");

    let summary = app
        .state
        .services
        .cash_registers
        .current_register()
        .await
        .expect("current register")
        .expect("a session is open");
    assert_eq!(summary.totals.cash_sales, dec!(7.60));
    assert_eq!(summary.totals.deposits, dec!(20.00));
    assert_eq!(summary.totals.withdrawals, dec!(30.00));
    // 100 + 7.60 + 20 - 30
    assert_eq!(summary.totals.expected, dec!(97.60));

    let closed = app
        .state
        .services
        .cash_registers
        .close_register(CloseRegisterInput { closing_amount: dec!(95.00) })
        .await
        .expect("close register");

    assert_eq!(closed.status, RegisterStatus::Closed);
    assert_eq!(closed.expected_amount, Some(dec!(97.60)));
    assert_eq!(closed.closing_amount, Some(dec!(95.00)));
    assert_eq!(closed.difference, Some(dec!(-2.60)));
    assert!(closed.closed_at.is_some());

    let current = app
        .state
        .services
        .cash_registers
        .current_register()
        .await
        .expect("current register");
    assert!(current.is_none());
}

#[tokio::test]
async fn movements_require_an_open_session() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;

    let err = app
        .state
        .services
        .cash_registers
        .record_movement(
            RecordMovementInput {
                kind: CashMovementKind::Deposit,
                amount: dec!(10.00),
                reason: "Fondo inicial".to_string(),
            },
            cashier.id,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    let err = app
        .state
        .services
        .cash_registers
        .close_register(CloseRegisterInput { closing_amount: dec!(0.00) })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn movement_amounts_must_be_positive() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;

    app.state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(10.00) }, cashier.id)
        .await
        .expect("open register");

    let err = app
        .state
        .services
        .cash_registers
        .record_movement(
            RecordMovementInput {
                kind: CashMovementKind::Withdrawal,
                amount: dec!(-5.00),
                reason: "negativo".to_string(),
            },
            cashier.id,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn a_new_session_starts_a_fresh_drawer() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;
    let product = app.seed_product("Chicles", dec!(1.00), dec!(0.40), 100, 10).await;

    app.state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(50.00) }, cashier.id)
        .await
        .expect("open first session");
    app.state
        .services
        .sales
        .checkout(
            CheckoutInput {
                items: vec![CheckoutItemInput {
                    product_id: product.id,
                    quantity: 5,
                }],
                payment_method: PaymentMethod::Cash,
            },
            cashier.id,
        )
        .await
        .expect("cash sale");
    app.state
        .services
        .cash_registers
        .close_register(CloseRegisterInput { closing_amount: dec!(55.00) })
        .await
        .expect("close first session");

    // Yesterday's sales must not leak into today's drawer
    app.state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(30.00) }, cashier.id)
        .await
        .expect("open second session");

    let summary = app
        .state
        .services
        .cash_registers
        .current_register()
        .await
        .expect("current register")
        .expect("a session is open");
    assert_eq!(summary.totals.cash_sales, dec!(0));
    assert_eq!(summary.totals.expected, dec!(30.00));

    let (sessions, total) = app
        .state
        .services
        .cash_registers
        .list_registers(1, 10)
        .await
        .expect("list sessions");
    assert_eq!(total, 2);
    assert_eq!(sessions.len(), 2);
}
