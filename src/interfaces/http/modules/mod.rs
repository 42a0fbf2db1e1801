pub mod costing;
pub mod health;
pub mod metadata;
pub mod metrics;
