use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use super::common::{map_service_error, success_response};
use crate::auth::AuthUser;
use crate::errors::{ApiError, ServiceError};
use crate::handlers::AppState;
use crate::services::settings::UpsertSettingInput;

async fn list_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let settings = state
        .services
        .settings
        .list_settings()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(settings))
}

async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let setting = state
        .services
        .settings
        .get_setting(&key)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(setting))
}

/// Settings shape receipts and tax math, so writes are admin-only
async fn upsert_setting(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(key): Path<String>,
    Json(payload): Json<UpsertSettingInput>,
) -> Result<impl IntoResponse, ApiError> {
    if !user.is_admin() {
        return Err(map_service_error(ServiceError::Forbidden(
            "Only administrators can change settings".to_string(),
        )));
    }

    let setting = state
        .services
        .settings
        .upsert_setting(&key, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(setting))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_settings))
        .route("/:key", get(get_setting).put(upsert_setting))
}
