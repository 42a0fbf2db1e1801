//! Trip cost aggregate: the audit record of a calculation

pub mod model;
pub mod repository;

pub use model::{
    AccessorialComponent, ActualCost, CostBreakdown, Direction, FixedCostComponent,
    MarginAnalysis, PricingSuggestions, RollingComponent, TripCost, WageComponent,
    TARGET_MARGIN_MULTIPLIER,
};
pub use repository::{CostingUnitOfWork, TripCostRepository};
