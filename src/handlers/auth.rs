use axum::{extract::State, response::IntoResponse, Extension, Json};

use super::common::{map_service_error, success_response};
use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::users::LoginInput;

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginInput>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .services
        .users
        .login(payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(response))
}

/// The account behind the presented token
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .services
        .users
        .get_user(user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(account))
}
