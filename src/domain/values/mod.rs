pub mod filter_category;
pub mod query_key;
pub mod record_status;
pub mod resource_kind;
