pub mod client;
pub mod error;
pub mod formatter;
pub mod search_model;
