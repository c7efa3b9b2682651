use crate::error::AppError;
use crate::models::{MappingWrite, VoucherMapping};
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::{IndexOptions, UpdateOptions};
use mongodb::{Collection, Database, IndexModel};

/// Key-value store of voucher mappings, keyed by voucher code.
///
/// The trait seam allows handler and composer tests to substitute an
/// in-memory double for MongoDB.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Point lookup by voucher code.
    async fn get(&self, voucher_code: &str) -> Result<Option<VoucherMapping>, AppError>;

    /// Write fields into the document at the voucher code, merging with any
    /// existing document and stamping `updatedAt` with the store's server
    /// time. Returns the merged document.
    async fn upsert_merge(&self, write: MappingWrite) -> Result<VoucherMapping, AppError>;
}

#[derive(Clone)]
pub struct MongoMappingStore {
    collection: Collection<VoucherMapping>,
}

impl MongoMappingStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("voucher_mappings"),
        }
    }

    /// Initialize the unique voucher-code index.
    pub async fn init_indexes(&self) -> Result<(), AppError> {
        let voucher_code_index = IndexModel::builder()
            .keys(doc! { "voucherCode": 1 })
            .options(
                IndexOptions::builder()
                    .name("voucher_code_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.collection
            .create_index(voucher_code_index, None)
            .await?;

        tracing::info!("Voucher mapping indexes initialized");
        Ok(())
    }
}

/// Build the upsert-merge update document: provided fields are `$set`,
/// omitted optional fields default to empty strings only on insert, and
/// `updatedAt` takes the server's clock.
fn merge_update(write: &MappingWrite) -> Document {
    let mut set = doc! {
        "voucherCode": &write.voucher_code,
        "appUserId": &write.app_user_id,
    };
    let mut set_on_insert = Document::new();

    let optional_fields = [
        ("firstName", &write.first_name),
        ("lastName", &write.last_name),
        ("productName", &write.product_name),
    ];
    for (field, value) in optional_fields {
        match value {
            Some(v) => {
                set.insert(field, v);
            }
            None => {
                set_on_insert.insert(field, "");
            }
        }
    }

    let mut update = doc! {
        "$set": set,
        "$currentDate": { "updatedAt": true },
    };
    if !set_on_insert.is_empty() {
        update.insert("$setOnInsert", set_on_insert);
    }
    update
}

#[async_trait]
impl MappingStore for MongoMappingStore {
    async fn get(&self, voucher_code: &str) -> Result<Option<VoucherMapping>, AppError> {
        let mapping = self
            .collection
            .find_one(doc! { "voucherCode": voucher_code }, None)
            .await?;
        Ok(mapping)
    }

    async fn upsert_merge(&self, write: MappingWrite) -> Result<VoucherMapping, AppError> {
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection
            .update_one(
                doc! { "voucherCode": &write.voucher_code },
                merge_update(&write),
                options,
            )
            .await?;

        self.get(&write.voucher_code).await?.ok_or_else(|| {
            AppError::StoreError(anyhow::anyhow!(
                "mapping for {} missing after upsert",
                write.voucher_code
            ))
        })
    }
}
