use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::common::{map_service_error, success_response};
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::dashboard::business_date;

#[derive(Debug, Deserialize)]
struct WindowQuery {
    #[serde(default = "default_days")]
    days: u32,
}

fn default_days() -> u32 {
    7
}

#[derive(Debug, Deserialize)]
struct TopProductsQuery {
    #[serde(default = "default_days")]
    days: u32,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    5
}

#[derive(Debug, Deserialize)]
struct HourlyQuery {
    /// Business date to bucket; defaults to the current business day
    date: Option<NaiveDate>,
}

/// Everything the dashboard screen shows, in one response
async fn overview(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let overview = state
        .services
        .dashboard
        .overview()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(overview))
}

/// Day, week and month revenue with profit and prior-period comparison
async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .dashboard
        .summary()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(summary))
}

async fn sales_by_day(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let series = state
        .services
        .dashboard
        .sales_by_day(query.days)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(series))
}

async fn top_products(
    State(state): State<AppState>,
    Query(query): Query<TopProductsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let top = state
        .services
        .dashboard
        .top_products(query.days, query.limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(top))
}

async fn sales_by_category(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let split = state
        .services
        .dashboard
        .sales_by_category(query.days)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(split))
}

async fn hourly_sales(
    State(state): State<AppState>,
    Query(query): Query<HourlyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = query.date.unwrap_or_else(|| {
        business_date(Utc::now(), state.config.business_day_offset_minutes)
    });

    let buckets = state
        .services
        .dashboard
        .hourly_sales(date)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(buckets))
}

#[derive(Debug, Deserialize)]
struct LowStockQuery {
    #[serde(default = "default_low_stock_limit")]
    limit: usize,
}

fn default_low_stock_limit() -> usize {
    10
}

/// Products at or below their minimum stock, worst first
async fn low_stock_alerts(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = state
        .services
        .dashboard
        .low_stock_alerts(query.limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(alerts))
}

async fn payment_method_shares(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let shares = state
        .services
        .dashboard
        .payment_method_shares(query.days)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(shares))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/summary", get(summary))
        .route("/sales-by-day", get(sales_by_day))
        .route("/top-products", get(top_products))
        .route("/categories", get(sales_by_category))
        .route("/hourly", get(hourly_sales))
        .route("/payment-methods", get(payment_method_shares))
        .route("/low-stock", get(low_stock_alerts))
}
