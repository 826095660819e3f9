pub mod auth_state;
pub mod browser;
pub mod debounce;
pub mod filter_state;
pub mod mutation;
pub mod paged_query;
pub mod query_cache;
pub mod scroll_sensor;
pub mod session;
