//! Usage submission and usage history pass-through handlers.

use crate::dtos::{require_field, require_positive_int, GetUsageRequest, SubmitUsageRequest};
use crate::error::AppError;
use crate::services::{UsageQuery, VoucherUsage};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

#[tracing::instrument(skip(state, request))]
pub async fn submit_usage(
    State(state): State<AppState>,
    Json(request): Json<SubmitUsageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let usage = VoucherUsage {
        access_date: require_field(request.access_date, "accessDate")?,
        voucher_code: require_field(request.voucher_code, "voucherCode")?,
        app_user_id: require_field(request.app_user_id, "appUserId")?,
        access_count: require_positive_int(request.access_count, "accessCount")?,
        access_time: require_positive_int(request.access_time, "accessTime")?,
        lat: 0.0,
        lon: 0.0,
    };

    tracing::info!(voucher_code = %usage.voucher_code, "Submitting voucher usage");
    let data = state.depa.submit_usage(usage).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Usage recorded successfully",
        "data": data,
    })))
}

#[tracing::instrument(skip(state, request))]
pub async fn get_usage(
    State(state): State<AppState>,
    Json(request): Json<GetUsageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let query = UsageQuery {
        voucher_code: require_field(request.voucher_code, "voucherCode")?,
        from_date: require_field(request.from_date, "fromDate")?,
        to_date: require_field(request.to_date, "toDate")?,
        is_production: true,
    };

    let data = state.depa.get_usage(query).await?;
    Ok(Json(data))
}
