use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
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
use crate::services::products::{CreateProductInput, ProductListParams, UpdateProductInput};

#[derive(Debug, Deserialize)]
struct ProductQuery {
    search: Option<String>,
    category_id: Option<Uuid>,
    #[serde(default)]
    active_only: bool,
    #[serde(flatten)]
    pagination: PaginationParams,
}

async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .create_product(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(product))
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, per_page) = query
        .pagination
        .clamp(state.config.api_max_page_size as u64);

    let params = ProductListParams {
        search: query.search,
        category_id: query.category_id,
        active_only: query.active_only,
        page,
        per_page,
    };

    let (products, total) = state
        .services
        .products
        .list_products(params)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        products, page, per_page, total,
    )))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

async fn get_product_by_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product_by_barcode(&code)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

async fn list_low_stock(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .services
        .products
        .low_stock_products()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(products))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .update_product(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .products
        .delete_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        // Fixed segments before the id catch-all
        .route("/low-stock", get(list_low_stock))
        .route("/barcode/:code", get(get_product_by_barcode))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}
