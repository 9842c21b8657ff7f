mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::TestApp;
use kioskpro::errors::ServiceError;
use kioskpro::services::products::{CreateProductInput, UpdateProductInput};

fn product_input(name: &str, category_id: Option<Uuid>) -> CreateProductInput {
    CreateProductInput {
        name: name.to_string(),
        barcode: None,
        category_id,
        price: dec!(2.50),
        cost: dec!(1.25),
        stock: Some(10),
        min_stock: Some(2),
        image_url: None,
    }
}

#[tokio::test]
async fn creating_a_product_in_an_unknown_category_is_rejected() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .products
        .create_product(product_input("Huérfano", Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn moving_a_product_to_an_unknown_category_is_rejected() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("Caramelos", dec!(0.50), dec!(0.20), 30, 5)
        .await;

    let err = app
        .state
        .services
        .products
        .update_product(
            product.id,
            UpdateProductInput {
                name: None,
                barcode: None,
                category_id: Some(Uuid::new_v4()),
                price: None,
                cost: None,
                min_stock: None,
                image_url: None,
                active: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn a_real_category_is_accepted() {
    let app = TestApp::new().await;
    let category = app.seed_category("Golosinas").await;

    let product = app
        .state
        .services
        .products
        .create_product(product_input("Chicles", Some(category.id)))
        .await
        .expect("create product");
    assert_eq!(product.category_id, Some(category.id));
}
