//! Accessorial events: billable occurrences layered on top of line-haul cost
//!
//! Contains event types, the rules that detect them, and the count types
//! that flow from detection into the breakdown.

pub mod model;
pub mod repository;

pub use model::{
    DetectedEvent, EventCounts, EventKind, EventOverrides, EventRule, EventType,
    TriggerCondition, MAX_EVENT_OVERRIDE, TriggerType, TripContext,
};
pub use repository::AccessorialRepository;
