use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::handlers::AppState;

/// Liveness and database reachability. Stays unauthenticated so load
/// balancers and uptime checks can poll it.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match crate::db::check_connection(&state.db).await {
        Ok(()) => "up",
        Err(e) => {
            error!("Health check database ping failed: {}", e);
            "down"
        }
    };

    let healthy = database == "up";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "timestamp": Utc::now().to_rfc3339(),
    });

    (status, Json(body))
}
