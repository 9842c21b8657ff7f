mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{body_json, TestApp, TEST_PASSWORD};
use kioskpro::entities::user::UserRole;

#[tokio::test]
async fn health_is_reachable_without_a_token() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/products", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, "/api/v1/products", None, Some("not.a.jwt"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_a_usable_bearer_token() {
    let app = TestApp::new().await;
    app.seed_user("Ana", "ana@kioskpro.local", UserRole::Cashier)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({
                "email": "ana@kioskpro.local",
                "password": TEST_PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let token = body["data"]["access_token"]
        .as_str()
        .expect("access token in login response")
        .to_string();
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user"]["email"], "ana@kioskpro.local");

    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "ana@kioskpro.local");
}

#[tokio::test]
async fn bad_credentials_do_not_reveal_which_part_was_wrong() {
    let app = TestApp::new().await;
    app.seed_user("Ana", "ana@kioskpro.local", UserRole::Cashier)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({
                "email": "ana@kioskpro.local",
                "password": "wrong-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_administration_is_admin_only() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja", "caja@kioskpro.local", UserRole::Cashier)
        .await;
    let admin = app
        .seed_user("Admin", "admin@kioskpro.local", UserRole::Admin)
        .await;

    let cashier_token = app.token_for(&cashier);
    let admin_token = app.token_for(&admin);

    let response = app
        .request(Method::GET, "/api/v1/users", None, Some(&cashier_token))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(Method::GET, "/api/v1/users", None, Some(&admin_token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn settings_writes_are_admin_only_but_reads_are_not() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja", "caja@kioskpro.local", UserRole::Cashier)
        .await;
    let admin = app
        .seed_user("Admin", "admin@kioskpro.local", UserRole::Admin)
        .await;

    let cashier_token = app.token_for(&cashier);
    let admin_token = app.token_for(&admin);

    let response = app
        .request(
            Method::PUT,
            "/api/v1/settings/store_name",
            Some(json!({ "value": "Kiosco Central" })),
            Some(&cashier_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::PUT,
            "/api/v1/settings/store_name",
            Some(json!({ "value": "Kiosco Central" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::GET,
            "/api/v1/settings/store_name",
            None,
            Some(&cashier_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["value"], "Kiosco Central");
}

#[tokio::test]
async fn product_crud_round_trips_through_the_api() {
    let app = TestApp::new().await;
    let manager = app
        .seed_user("Encargado", "encargado@kioskpro.local", UserRole::Manager)
        .await;
    let token = app.token_for(&manager);

    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Agua mineral 600ml",
                "barcode": "7790001000011",
                "price": "1.50",
                "cost": "0.80",
                "stock": 48,
                "min_stock": 12,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let id = body["data"]["id"].as_str().expect("product id").to_string();

    // Duplicate barcode conflicts
    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Otra agua",
                "barcode": "7790001000011",
                "price": "1.60",
                "cost": "0.90",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(
            Method::GET,
            "/api/v1/products/barcode/7790001000011",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], id.as_str());

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/products/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn checkout_requires_an_open_register_over_http_too() {
    let app = TestApp::new().await;
    let cashier = app
        .seed_user("Caja", "caja@kioskpro.local", UserRole::Cashier)
        .await;
    let token = app.token_for(&cashier);
    let product = app.seed_product("Agua 600ml", dec!(1.50), dec!(0.80), 5, 1).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/sales/checkout",
            Some(json!({
                "items": [{ "product_id": product.id, "quantity": 1 }],
                "payment_method": "cash",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/v1/cash-registers/open",
            Some(json!({ "opening_amount": "100.00" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::POST,
            "/api/v1/sales/checkout",
            Some(json!({
                "items": [{ "product_id": product.id, "quantity": 1 }],
                "payment_method": "cash",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], "1.50");
}
