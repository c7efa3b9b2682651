//! Voucher listing with mapping enrichment.

use crate::dtos::{page_param_or, GetVouchersRequest};
use crate::error::AppError;
use crate::services::{enrich_vouchers, PageQuery};
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::Value;

const DEFAULT_PAGE_NUMBER: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 500;

/// List vouchers from DEPA, joining each record against the mapping store.
///
/// The upstream body passes through unchanged apart from its `data` array,
/// which is enriched when the upstream reports success. Mapping lookup
/// failures never fail the request.
#[tracing::instrument(skip(state, request))]
pub async fn get_vouchers(
    State(state): State<AppState>,
    Json(request): Json<GetVouchersRequest>,
) -> Result<Json<Value>, AppError> {
    let page = PageQuery {
        page_number: page_param_or(request.page_number, DEFAULT_PAGE_NUMBER),
        page_size: page_param_or(request.page_size, DEFAULT_PAGE_SIZE),
    };

    let mut body = state.depa.list_vouchers(page).await?;

    let upstream_success = body
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if upstream_success {
        if let Some(records) = body.get_mut("data").and_then(Value::as_array_mut) {
            let taken = std::mem::take(records);
            *records = enrich_vouchers(state.mappings.as_ref(), taken).await;
        }
    }

    Ok(Json(body))
}
