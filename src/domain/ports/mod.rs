pub mod recommendation_api;
pub mod token_store;
