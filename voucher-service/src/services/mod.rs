pub mod depa;
pub mod enrichment;
pub mod metrics;
pub mod repository;

pub use depa::{DepaClient, PageQuery, UsageQuery, VoucherUsage};
pub use enrichment::enrich_vouchers;
pub use metrics::{get_metrics, init_metrics};
pub use repository::{MappingStore, MongoMappingStore};
