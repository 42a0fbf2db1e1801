//! Costing module: calculate, reconcile and inspect trip costs

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
