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
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::suppliers::{CreateSupplierInput, UpdateSupplierInput};

#[derive(Debug, Deserialize)]
struct SupplierQuery {
    search: Option<String>,
    #[serde(default)]
    include_inactive: bool,
    #[serde(flatten)]
    pagination: PaginationParams,
}

async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierInput>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .create_supplier(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(supplier))
}

async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SupplierQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, per_page) = query
        .pagination
        .clamp(state.config.api_max_page_size as u64);

    let (suppliers, total) = state
        .services
        .suppliers
        .list_suppliers(
            query.search.as_deref(),
            !query.include_inactive,
            page,
            per_page,
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        suppliers, page, per_page, total,
    )))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get_supplier(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(supplier))
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierInput>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .update_supplier(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(supplier))
}

/// Soft delete: the supplier disappears from pickers but keeps its history
async fn deactivate_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .suppliers
        .deactivate_supplier(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

async fn reactivate_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .reactivate_supplier(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(supplier))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier)
                .put(update_supplier)
                .delete(deactivate_supplier),
        )
        .route("/:id/reactivate", post(reactivate_supplier))
}
