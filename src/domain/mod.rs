//! Domain layer: costing entities, value types and repository interfaces

pub mod accessorial;
pub mod driver;
pub mod events;
pub mod rates;
pub mod repositories;
pub mod trip_cost;
pub mod unit;
pub mod week_miles;

pub use repositories::{DomainResult, RepositoryProvider};

pub use crate::support::errors::DomainError;
