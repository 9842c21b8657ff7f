mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::TestApp;
use kioskpro::entities::sale::{Entity as SaleEntity, PaymentMethod};
use kioskpro::entities::stock_movement::{self, Entity as StockMovementEntity, MovementType};
use kioskpro::entities::user::UserRole;
use kioskpro::errors::ServiceError;
use kioskpro::services::cash_registers::OpenRegisterInput;
use kioskpro::services::sales::{CheckoutInput, CheckoutItemInput};

#[tokio::test]
async fn checkout_without_an_open_register_is_refused() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;
    let product = app.seed_product("Gaseosa 500ml", dec!(2.50), dec!(1.40), 10, 2).await;

    let err = app
        .state
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
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    // Nothing written
    let refreshed = app
        .state
        .services
        .products
        .get_product(product.id)
        .await
        .expect("reload product");
    assert_eq!(refreshed.stock, 10);
    let sales = SaleEntity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(sales, 0);
}

#[tokio::test]
async fn checkout_prices_from_the_catalog_and_moves_stock() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;
    let water = app.seed_product("Agua 600ml", dec!(1.50), dec!(0.80), 48, 12).await;
    let snacks = app.seed_product("Papas 150g", dec!(3.20), dec!(1.80), 30, 10).await;

    let register = app
        .state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(100.00) }, cashier.id)
        .await
        .expect("open register");

    let details = app
        .state
        .services
        .sales
        .checkout(
            CheckoutInput {
                items: vec![
                    CheckoutItemInput {
                        product_id: water.id,
                        quantity: 2,
                    },
                    CheckoutItemInput {
                        product_id: snacks.id,
                        quantity: 1,
                    },
                ],
                payment_method: PaymentMethod::Cash,
            },
            cashier.id,
        )
        .await
        .expect("checkout");

    assert_eq!(details.sale.total, dec!(6.20));
    assert_eq!(details.sale.cashier_id, cashier.id);
    assert_eq!(details.sale.cash_register_id, Some(register.id));
    assert_eq!(details.items.len(), 2);

    let water_line = details
        .items
        .iter()
        .find(|i| i.product_id == water.id)
        .expect("water line");
    assert_eq!(water_line.unit_price, dec!(1.50));
    assert_eq!(water_line.subtotal, dec!(3.00));

    let refreshed = app
        .state
        .services
        .products
        .get_product(water.id)
        .await
        .expect("reload product");
    assert_eq!(refreshed.stock, 46);

    let movements = StockMovementEntity::find()
        .filter(stock_movement::Column::ProductId.eq(water.id))
        .all(&*app.state.db)
        .await
        .expect("load movements");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].movement_type, MovementType::Subtract);
    assert_eq!(movements[0].quantity, 2);
}

#[tokio::test]
async fn insufficient_stock_rolls_the_whole_sale_back() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;
    let plenty = app.seed_product("Arroz 1kg", dec!(4.50), dec!(2.80), 35, 10).await;
    let scarce = app.seed_product("Aceite 900ml", dec!(7.80), dec!(5.10), 2, 4).await;

    app.state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(50.00) }, cashier.id)
        .await
        .expect("open register");

    let err = app
        .state
        .services
        .sales
        .checkout(
            CheckoutInput {
                items: vec![
                    CheckoutItemInput {
                        product_id: plenty.id,
                        quantity: 3,
                    },
                    CheckoutItemInput {
                        product_id: scarce.id,
                        quantity: 5,
                    },
                ],
                payment_method: PaymentMethod::Cash,
            },
            cashier.id,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(_));

    // The line that would have succeeded must not have moved either
    let refreshed = app
        .state
        .services
        .products
        .get_product(plenty.id)
        .await
        .expect("reload product");
    assert_eq!(refreshed.stock, 35);

    let sales = SaleEntity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(sales, 0);
    let movements = StockMovementEntity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(movements, 0);
}

#[tokio::test]
async fn inactive_products_cannot_be_sold() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;
    let product = app.seed_product("Cerveza 473ml", dec!(4.20), dec!(2.60), 24, 8).await;

    app.state
        .services
        .cash_registers
        .open_register(OpenRegisterInput { opening_amount: dec!(0.00) }, cashier.id)
        .await
        .expect("open register");

    app.state
        .services
        .products
        .update_product(
            product.id,
            kioskpro::services::products::UpdateProductInput {
                name: None,
                barcode: None,
                category_id: None,
                price: None,
                cost: None,
                min_stock: None,
                image_url: None,
                active: Some(false),
            },
        )
        .await
        .expect("deactivate product");

    let err = app
        .state
        .services
        .sales
        .checkout(
            CheckoutInput {
                items: vec![CheckoutItemInput {
                    product_id: product.id,
                    quantity: 1,
                }],
                payment_method: PaymentMethod::Card,
            },
            cashier.id,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn a_sale_needs_at_least_one_item() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja Uno", "caja1@kioskpro.local", UserRole::Cashier)
        .await;

    let err = app
        .state
        .services
        .sales
        .checkout(
            CheckoutInput {
                items: vec![],
                payment_method: PaymentMethod::Cash,
            },
            cashier.id,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}
