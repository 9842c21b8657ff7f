use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::common::{
    created_response, map_service_error, success_response, PaginatedResponse, PaginationParams,
};
use crate::auth::AuthUser;
use crate::entities::sale::PaymentMethod;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::sales::{CheckoutInput, SaleListParams};

#[derive(Debug, Deserialize)]
struct SaleQuery {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    payment_method: Option<PaymentMethod>,
    cashier_id: Option<Uuid>,
    cash_register_id: Option<Uuid>,
    #[serde(flatten)]
    pagination: PaginationParams,
}

/// Rings up the cart. The sale is attributed to the authenticated cashier
/// and the open register session.
async fn checkout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CheckoutInput>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = state
        .services
        .sales
        .checkout(payload, user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(sale))
}

async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<SaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, per_page) = query
        .pagination
        .clamp(state.config.api_max_page_size as u64);

    let params = SaleListParams {
        from: query.from,
        to: query.to,
        payment_method: query.payment_method,
        cashier_id: query.cashier_id,
        cash_register_id: query.cash_register_id,
        page,
        per_page,
    };

    let (sales, total) = state
        .services
        .sales
        .list_sales(params)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        sales, page, per_page, total,
    )))
}

async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state
        .services
        .sales
        .get_sale(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(details))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales))
        .route("/checkout", post(checkout))
        .route("/:id", get(get_sale))
}
