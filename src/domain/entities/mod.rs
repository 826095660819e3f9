pub mod page;
pub mod recommendation;
