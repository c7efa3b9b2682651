use crate::error::AppError;
use crate::models::VoucherMapping;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitUsageRequest {
    pub access_date: Option<String>,
    pub voucher_code: Option<String>,
    pub app_user_id: Option<String>,
    #[serde(default)]
    pub access_count: Option<Value>,
    #[serde(default)]
    pub access_time: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetVouchersRequest {
    pub page_number: Option<Value>,
    pub page_size: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUsageRequest {
    pub voucher_code: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMappingRequest {
    pub voucher_code: Option<String>,
    pub app_user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub product_name: Option<String>,
}

/// JSON shape of a mapping document in HTTP responses, with the stored
/// timestamp rendered as RFC 3339.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResponse {
    pub voucher_code: String,
    pub app_user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub product_name: String,
    pub updated_at: String,
}

impl From<VoucherMapping> for MappingResponse {
    fn from(mapping: VoucherMapping) -> Self {
        Self {
            voucher_code: mapping.voucher_code,
            app_user_id: mapping.app_user_id,
            first_name: mapping.first_name,
            last_name: mapping.last_name,
            product_name: mapping.product_name,
            updated_at: mapping
                .updated_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

/// Require a non-empty string field, naming the field in the error.
pub fn require_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::ValidationError(format!("{} is required", name))),
    }
}

/// Require a positive integer field, parsing explicitly rather than
/// coercing: a JSON number or a numeric string is accepted, anything else
/// (including zero and negatives) is rejected.
pub fn require_positive_int(value: Option<Value>, name: &str) -> Result<u32, AppError> {
    let value = value.ok_or_else(|| AppError::ValidationError(format!("{} is required", name)))?;

    parse_positive_int(&value)
        .ok_or_else(|| AppError::ValidationError(format!("{} must be a positive integer", name)))
}

/// Parse an optional page parameter, falling back to `default` when the
/// value is missing, non-numeric, or non-positive.
pub fn page_param_or(value: Option<Value>, default: u32) -> u32 {
    value
        .as_ref()
        .and_then(parse_positive_int)
        .unwrap_or(default)
}

fn parse_positive_int(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    if n == 0 {
        return None;
    }
    u32::try_from(n).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn require_field_rejects_missing_and_empty() {
        assert!(require_field(None, "voucherCode").is_err());
        assert!(require_field(Some("".to_string()), "voucherCode").is_err());
        assert!(require_field(Some("   ".to_string()), "voucherCode").is_err());
        assert_eq!(
            require_field(Some("DEPA-001".to_string()), "voucherCode").unwrap(),
            "DEPA-001"
        );
    }

    #[test]
    fn require_positive_int_accepts_numbers_and_numeric_strings() {
        assert_eq!(require_positive_int(Some(json!(3)), "accessCount").unwrap(), 3);
        assert_eq!(
            require_positive_int(Some(json!("12")), "accessCount").unwrap(),
            12
        );
    }

    #[test]
    fn require_positive_int_rejects_non_numeric_input() {
        for bad in [json!("abc"), json!(0), json!(-1), json!(1.5), json!(null), json!([])] {
            assert!(
                require_positive_int(Some(bad.clone()), "accessCount").is_err(),
                "expected rejection for {}",
                bad
            );
        }
        assert!(require_positive_int(None, "accessCount").is_err());
    }

    #[test]
    fn page_param_falls_back_on_bad_values() {
        assert_eq!(page_param_or(None, 500), 500);
        assert_eq!(page_param_or(Some(json!("abc")), 500), 500);
        assert_eq!(page_param_or(Some(json!(0)), 1), 1);
        assert_eq!(page_param_or(Some(json!(7)), 1), 7);
        assert_eq!(page_param_or(Some(json!("25")), 500), 25);
    }
}
