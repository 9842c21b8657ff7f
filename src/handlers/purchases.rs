use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::common::{
    created_response, map_service_error, no_content_response, success_response,
    PaginatedResponse, PaginationParams,
};
use crate::entities::purchase::PurchaseStatus;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::purchases::CreatePurchaseInput;

#[derive(Debug, Deserialize)]
struct PurchaseQuery {
    status: Option<PurchaseStatus>,
    supplier_id: Option<Uuid>,
    #[serde(flatten)]
    pagination: PaginationParams,
}

async fn create_purchase(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseInput>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase = state
        .services
        .purchases
        .create_purchase(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(purchase))
}

async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<PurchaseQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, per_page) = query
        .pagination
        .clamp(state.config.api_max_page_size as u64);

    let (purchases, total) = state
        .services
        .purchases
        .list_purchases(query.status, query.supplier_id, page, per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        purchases, page, per_page, total,
    )))
}

async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state
        .services
        .purchases
        .get_purchase(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(details))
}

/// Books the goods in: bumps stock per line, logs the movements, marks the
/// order received
async fn receive_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state
        .services
        .purchases
        .receive_purchase(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(details))
}

async fn cancel_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase = state
        .services
        .purchases
        .cancel_purchase(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(purchase))
}

async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchases
        .delete_purchase(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_purchases).post(create_purchase))
        .route("/:id", get(get_purchase).delete(delete_purchase))
        .route("/:id/receive", post(receive_purchase))
        .route("/:id/cancel", post(cancel_purchase))
}
