use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use super::common::{
    created_response, map_service_error, no_content_response, success_response,
    PaginatedResponse, PaginationParams,
};
use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::users::{CreateUserInput, UpdateUserInput};

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .create_user(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(user))
}

async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, per_page) = pagination.clamp(state.config.api_max_page_size as u64);

    let (users, total) = state
        .services
        .users
        .list_users(page, per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        users, page, per_page, total,
    )))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .get_user(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(user))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .update_user(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(user))
}

async fn delete_user(
    State(state): State<AppState>,
    Extension(acting): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .users
        .delete_user(id, acting.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}
