use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    map_service_error, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::entities::stock_movement::MovementType;
use crate::services::inventory::{AdjustStockInput, AdjustmentKind};

/// Manual stock adjustment in the shop-floor vocabulary
#[derive(Debug, Deserialize, Validate)]
struct AdjustStockRequest {
    product_id: Uuid,
    kind: AdjustmentKind,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    quantity: i32,
    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    reason: String,
}

#[derive(Debug, Deserialize)]
struct MovementQuery {
    product_id: Option<Uuid>,
    movement_type: Option<MovementType>,
    #[serde(flatten)]
    pagination: PaginationParams,
}

async fn adjust_stock(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AdjustStockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = AdjustStockInput {
        movement_type: payload.kind.movement_type(),
        quantity: payload.quantity,
        reason: payload.reason,
    };

    let product = state
        .services
        .inventory
        .adjust_stock(payload.product_id, input, Some(user.user_id))
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, per_page) = query
        .pagination
        .clamp(state.config.api_max_page_size as u64);

    let (movements, total) = state
        .services
        .inventory
        .list_movements(query.product_id, query.movement_type, page, per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        movements, page, per_page, total,
    )))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/adjust", post(adjust_stock))
        .route("/movements", get(list_movements))
}
