//! Domain events
//!
//! Facts published after a cost calculation or reconciliation commits.
//! Delivery lives in `application::events`.

pub mod types;

pub use types::{CostActualEvent, CostCalculatedEvent, CostEvent, EventMessage};
