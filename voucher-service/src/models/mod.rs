use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// A stored association between a voucher code and an application user.
///
/// One document per voucher code; documents are created and updated via
/// upsert-merge and never deleted.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VoucherMapping {
    pub voucher_code: String,
    pub app_user_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub product_name: String,
    pub updated_at: DateTime,
}

/// Fields to write into a mapping document. Optional fields left as `None`
/// are preserved on existing documents and default to empty strings on
/// first insert.
#[derive(Debug, Clone)]
pub struct MappingWrite {
    pub voucher_code: String,
    pub app_user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub product_name: Option<String>,
}
