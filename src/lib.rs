//! KioskPro API Library
//!
//! Point-of-sale and inventory backend for a small retail kiosk: product
//! catalog, checkout, cash-register sessions, purchasing, stock movements,
//! dashboard analytics and user administration over HTTP/JSON.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod observability;
pub mod services;

use std::sync::Arc;

use axum::{extract::State, middleware, response::Json, routing::get, Extension, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};

use crate::entities::user::UserRole;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub auth: Arc<auth::AuthService>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let auth = Arc::new(auth::AuthService::new(auth::AuthConfig::from(&config)));
        let services =
            handlers::AppServices::new(db.clone(), event_sender.clone(), auth.clone(), &config);

        Self {
            db,
            config,
            event_sender,
            auth,
            services,
        }
    }
}

/// Standard success envelope for API responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: observability::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Assembles the full HTTP surface.
///
/// `/health` and `/api/v1/auth/login` are reachable without a token; every
/// other `/api/v1` route requires a valid bearer token, and user
/// administration additionally requires the admin role.
pub fn app_router(state: AppState) -> Router {
    let admin = Router::new()
        .nest("/users", handlers::users::routes())
        .layer(middleware::from_fn_with_state(
            UserRole::Admin,
            auth::role_middleware,
        ));

    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .nest("/categories", handlers::categories::routes())
        .nest("/products", handlers::products::routes())
        .nest("/suppliers", handlers::suppliers::routes())
        .nest("/purchases", handlers::purchases::routes())
        .nest("/sales", handlers::sales::routes())
        .nest("/cash-registers", handlers::cash_registers::routes())
        .nest("/inventory", handlers::inventory::routes())
        .nest("/dashboard", handlers::dashboard::routes())
        .nest("/settings", handlers::settings::routes())
        .merge(admin)
        .layer(middleware::from_fn(auth::auth_middleware));

    let api = Router::new()
        .route("/status", get(api_status))
        .route("/auth/login", axum::routing::post(handlers::auth::login))
        .merge(protected);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api)
        .layer(Extension(state.auth.clone()))
        .layer(middleware::from_fn(observability::request_id_middleware))
        .with_state(state)
}

async fn api_status(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let status_data = json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
    });

    Json(ApiResponse::success(status_data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_carries_data_and_meta() {
        let response = ApiResponse::success("ok");

        assert!(response.success);
        assert_eq!(response.data, Some("ok"));
        assert!(response.message.is_none());
        assert!(response.meta.is_some());
    }

    #[test]
    fn success_with_message_keeps_both() {
        let response = ApiResponse::success_with_message(7, "created");

        assert!(response.success);
        assert_eq!(response.data, Some(7));
        assert_eq!(response.message.as_deref(), Some("created"));
    }

    #[test]
    fn envelope_serializes_without_empty_fields() {
        let response = ApiResponse {
            success: true,
            data: Some(1),
            message: None,
            meta: None,
        };
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 1);
        assert!(body.get("message").is_none());
        assert!(body.get("meta").is_none());
    }
}
