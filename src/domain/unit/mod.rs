//! Unit (tractor/trailer) aggregate

pub mod model;
pub mod repository;

pub use model::{UnitProfile, WeeklyFixedCosts};
pub use repository::UnitRepository;
