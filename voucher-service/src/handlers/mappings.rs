//! Voucher mapping save and lookup handlers.

use crate::dtos::{require_field, MappingResponse, SaveMappingRequest};
use crate::error::AppError;
use crate::models::MappingWrite;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

#[tracing::instrument(skip(state, request))]
pub async fn save_mapping(
    State(state): State<AppState>,
    Json(request): Json<SaveMappingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let write = MappingWrite {
        voucher_code: require_field(request.voucher_code, "voucherCode")?,
        app_user_id: require_field(request.app_user_id, "appUserId")?,
        first_name: request.first_name,
        last_name: request.last_name,
        product_name: request.product_name,
    };

    tracing::info!(voucher_code = %write.voucher_code, "Saving voucher mapping");
    let mapping = state.mappings.upsert_merge(write).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Mapping saved successfully",
        "data": MappingResponse::from(mapping),
    })))
}

#[tracing::instrument(skip(state))]
pub async fn get_mapping(
    State(state): State<AppState>,
    Path(voucher_code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.mappings.get(&voucher_code).await? {
        Some(mapping) => Ok(Json(json!({
            "success": true,
            "data": MappingResponse::from(mapping),
        }))),
        None => Err(AppError::NotFound(format!(
            "No mapping found for voucher {}",
            voucher_code
        ))),
    }
}
