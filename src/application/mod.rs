//! Application layer: costing use cases and event delivery

pub mod costing;
pub mod events;
pub mod metadata;

pub use costing::{CalculateCost, CostCalculation, CostingOptions, CostingService};
pub use events::{create_event_bus, CostEventPublisher, EventBus, SharedEventBus};
pub use metadata::{CostingSummary, MetadataService};
