//! DEPA partner API client.
//!
//! Wraps the three voucher endpoints of the government voucher-usage
//! service: usage submission, voucher listing, and usage history. Every
//! call is a POST authenticated with a static `X-API-KEY` header.

use crate::config::DepaConfig;
use crate::error::AppError;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const API_KEY_HEADER: &str = "X-API-KEY";

/// Client for the DEPA voucher API.
#[derive(Clone)]
pub struct DepaClient {
    client: Client,
    config: DepaConfig,
}

/// A single voucher usage record as DEPA expects it. Coordinates are not
/// collected from callers and are always reported as 0.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherUsage {
    pub access_date: String,
    pub voucher_code: String,
    pub app_user_id: String,
    pub access_count: u32,
    pub access_time: u32,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoucherUsageBatch {
    is_production: bool,
    vouchers: Vec<VoucherUsage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: u32,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageQuery {
    pub voucher_code: String,
    pub from_date: String,
    pub to_date: String,
    pub is_production: bool,
}

impl DepaClient {
    /// Create a new DEPA client with a per-call timeout.
    pub fn new(config: DepaConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        Ok(Self { client, config })
    }

    /// Check if DEPA credentials are set.
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.expose_secret().is_empty()
    }

    /// Submit a one-element usage batch to DEPA.
    pub async fn submit_usage(&self, usage: VoucherUsage) -> Result<Value, AppError> {
        let batch = VoucherUsageBatch {
            is_production: true,
            vouchers: vec![usage],
        };
        self.post("/api/dp/VoucherUsage", &batch).await
    }

    /// Fetch a page of vouchers issued under the program.
    pub async fn list_vouchers(&self, page: PageQuery) -> Result<Value, AppError> {
        self.post("/api/dp/GetDPVouchers", &page).await
    }

    /// Fetch the usage history for a voucher over a date range.
    pub async fn get_usage(&self, query: UsageQuery) -> Result<Value, AppError> {
        self.post("/api/dp/GetVoucherUsage", &query).await
    }

    async fn post<T: Serialize>(&self, path: &str, payload: &T) -> Result<Value, AppError> {
        let url = format!("{}{}", self.config.base_url, path);
        metrics::counter!("depa_requests_total", "path" => path.to_string()).increment(1);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "DEPA request failed");
                if e.is_timeout() {
                    AppError::UpstreamError("DEPA API request timed out".to_string())
                } else {
                    AppError::UpstreamError(format!("DEPA API unreachable: {}", e))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to read DEPA response body");
            AppError::UpstreamError(format!("Failed to read DEPA response: {}", e))
        })?;

        tracing::debug!(url = %url, status = %status, "DEPA response");

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                tracing::error!(url = %url, error = %e, "DEPA returned malformed JSON");
                AppError::UpstreamError("DEPA API returned a malformed response".to_string())
            })
        } else {
            metrics::counter!("depa_request_failures_total", "path" => path.to_string())
                .increment(1);
            let message = error_message(&body);
            tracing::error!(url = %url, status = %status, message = %message, "DEPA call failed");
            Err(AppError::UpstreamError(message))
        }
    }
}

/// Extract the `message` field from an error body, with a generic fallback
/// when the body has no usable message.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "DEPA API request failed".to_string())
}
