//! Trip cost calculation use cases

pub mod calculator;
pub mod event_detector;
pub mod profile_resolver;
pub mod service;

pub use calculator::BreakdownCalculator;
pub use event_detector::{crosses_border, DetectionResult, EventDetector};
pub use profile_resolver::{ProfileResolver, ResolvedProfiles};
pub use service::{CalculateCost, CostCalculation, CostingOptions, CostingService};
