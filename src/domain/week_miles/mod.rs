//! Per-unit weekly mileage aggregate used to amortize fixed costs

pub mod model;
pub mod repository;

pub use model::{week_start_of, WeekMilesSummary};
pub use repository::WeekMilesRepository;
