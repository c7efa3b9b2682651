//! Voucher response composer.
//!
//! The partner API knows nothing about local application users, so voucher
//! listings are joined post hoc against the mapping store: each record's
//! `voucherCode` is looked up concurrently and, when a mapping exists, the
//! record gains that mapping's `appUserId`. A missing mapping or a failed
//! lookup leaves the record untouched rather than failing the page.

use crate::services::MappingStore;
use futures::future::join_all;
use serde_json::Value;

/// Enrich a page of voucher records with locally stored user identities.
///
/// Lookups run concurrently, one per record; the output preserves the input
/// order. An empty input returns immediately without touching the store.
pub async fn enrich_vouchers(store: &dyn MappingStore, records: Vec<Value>) -> Vec<Value> {
    if records.is_empty() {
        return records;
    }

    let lookups = records.into_iter().map(|record| async move {
        let Some(voucher_code) = record.get("voucherCode").and_then(Value::as_str) else {
            return record;
        };
        let voucher_code = voucher_code.to_string();

        match store.get(&voucher_code).await {
            Ok(Some(mapping)) => {
                let mut enriched = record;
                enriched["appUserId"] = Value::String(mapping.app_user_id);
                enriched
            }
            Ok(None) => record,
            Err(e) => {
                tracing::warn!(
                    voucher_code = %voucher_code,
                    error = %e,
                    "Mapping lookup failed; returning voucher unenriched"
                );
                record
            }
        }
    });

    join_all(lookups).await
}
