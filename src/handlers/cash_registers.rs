use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use super::common::{
    created_response, map_service_error, success_response, PaginatedResponse, PaginationParams,
};
use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::cash_registers::{
    CloseRegisterInput, OpenRegisterInput, RecordMovementInput,
};

async fn open_register(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<OpenRegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let register = state
        .services
        .cash_registers
        .open_register(payload, user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(register))
}

/// Reconciles the drawer against the counted amount and closes the session
async fn close_register(
    State(state): State<AppState>,
    Json(payload): Json<CloseRegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let register = state
        .services
        .cash_registers
        .close_register(payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(register))
}

async fn current_register(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .cash_registers
        .current_register()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(summary))
}

async fn record_movement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RecordMovementInput>,
) -> Result<impl IntoResponse, ApiError> {
    let movement = state
        .services
        .cash_registers
        .record_movement(payload, user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(movement))
}

async fn list_registers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, per_page) = pagination.clamp(state.config.api_max_page_size as u64);

    let (registers, total) = state
        .services
        .cash_registers
        .list_registers(page, per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        registers, page, per_page, total,
    )))
}

async fn get_register(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let register = state
        .services
        .cash_registers
        .get_register(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(register))
}

async fn list_register_movements(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // 404 for an unknown session rather than an empty list
    state
        .services
        .cash_registers
        .get_register(id)
        .await
        .map_err(map_service_error)?;

    let movements = state
        .services
        .cash_registers
        .list_movements(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(movements))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_registers))
        .route("/open", post(open_register))
        .route("/close", post(close_register))
        .route("/current", get(current_register))
        .route("/movements", post(record_movement))
        .route("/:id", get(get_register))
        .route("/:id/movements", get(list_register_movements))
}
