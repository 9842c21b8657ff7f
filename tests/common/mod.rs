use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use kioskpro::{
    config::AppConfig,
    db,
    entities::{category, product, supplier, user::{self, UserRole}},
    events::{self, EventSender},
    AppState,
};

const TEST_JWT_SECRET: &str =
    "kioskpro_test_secret_that_is_definitely_longer_than_sixty_four_characters_0123";

pub const TEST_PASSWORD: &str = "hunter2hunter2";

/// Helper harness that spins up application state backed by a throwaway
/// SQLite database, with the full router for HTTP-level tests.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with a fresh database.
    pub async fn new() -> Self {
        let db_dir = TempDir::new().expect("create temp dir for test database");
        let db_path = db_dir.path().join("kioskpro_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            TEST_JWT_SECRET.to_string(),
            3600,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("create test database");
        db::run_migrations(&pool)
            .await
            .expect("run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(Arc::new(pool), cfg, event_sender);
        let router = kioskpro::app_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Insert a user with a real password hash and return the row.
    #[allow(dead_code)]
    pub async fn seed_user(&self, name: &str, email: &str, role: UserRole) -> user::Model {
        let password_hash = self
            .state
            .auth
            .hash_password(TEST_PASSWORD)
            .await
            .expect("hash test password");

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(Some(password_hash)),
            role: Set(role),
            active: Set(true),
            ..Default::default()
        };
        model.insert(&*self.state.db).await.expect("seed user")
    }

    /// Insert a user that has no stored credentials at all.
    #[allow(dead_code)]
    pub async fn seed_user_without_password(&self, email: &str, role: UserRole) -> user::Model {
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("No Credentials".to_string()),
            email: Set(email.to_string()),
            password_hash: Set(None),
            role: Set(role),
            active: Set(true),
            ..Default::default()
        };
        model.insert(&*self.state.db).await.expect("seed user")
    }

    /// A bearer token for an already-seeded user.
    #[allow(dead_code)]
    pub fn token_for(&self, user: &user::Model) -> String {
        self.state
            .auth
            .generate_token(user)
            .expect("generate test token")
            .access_token
    }

    #[allow(dead_code)]
    pub async fn seed_category(&self, name: &str) -> category::Model {
        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            color: Set(None),
            icon: Set(None),
            ..Default::default()
        };
        model.insert(&*self.state.db).await.expect("seed category")
    }

    #[allow(dead_code)]
    pub async fn seed_product(
        &self,
        name: &str,
        price: Decimal,
        cost: Decimal,
        stock: i32,
        min_stock: i32,
    ) -> product::Model {
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            barcode: Set(None),
            category_id: Set(None),
            price: Set(price),
            cost: Set(cost),
            stock: Set(stock),
            min_stock: Set(min_stock),
            image_url: Set(None),
            active: Set(true),
            ..Default::default()
        };
        model.insert(&*self.state.db).await.expect("seed product")
    }

    #[allow(dead_code)]
    pub async fn seed_supplier(&self, name: &str) -> supplier::Model {
        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            ruc: Set(None),
            phone: Set(None),
            email: Set(None),
            address: Set(None),
            active: Set(true),
            ..Default::default()
        };
        model.insert(&*self.state.db).await.expect("seed supplier")
    }

    /// Send a request against the router with an optional bearer token.
    #[allow(dead_code)]
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Deserialize a response body into JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is valid json")
}
