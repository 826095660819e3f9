pub mod client;
pub mod error_body;
