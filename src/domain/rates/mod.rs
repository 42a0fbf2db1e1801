//! Rate rules and the per-calculation rate table

pub mod model;
pub mod repository;

pub use model::{keys, RateRule, RateTable, WageAdders};
pub use repository::RateRepository;
