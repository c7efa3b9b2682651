pub mod health;
pub mod mappings;
pub mod usage;
pub mod vouchers;

pub use health::{health_check, metrics};
pub use mappings::{get_mapping, save_mapping};
pub use usage::{get_usage, submit_usage};
pub use vouchers::get_vouchers;
