pub mod config;
pub mod http;
pub mod token_store;
