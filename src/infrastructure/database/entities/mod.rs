//! Database entities module

pub mod costing_rule;
pub mod driver_profile;
pub mod event_rule;
pub mod event_type;
pub mod trip_cost;
pub mod unit_profile;
pub mod week_miles_summary;

pub use costing_rule::Entity as CostingRule;
pub use driver_profile::Entity as DriverProfile;
pub use event_rule::Entity as EventRule;
pub use event_type::Entity as EventType;
pub use trip_cost::Entity as TripCost;
pub use unit_profile::Entity as UnitProfile;
pub use week_miles_summary::Entity as WeekMilesSummary;
