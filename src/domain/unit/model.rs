//! Unit domain entity

use serde::{Deserialize, Serialize};

/// Flat weekly ownership and overhead costs of a unit, in dollars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyFixedCosts {
    pub truck: f64,
    pub trailer: f64,
    pub insurance: f64,
    pub telematics: f64,
    pub permits: f64,
    pub sga: f64,
    pub misc: f64,
}

impl WeeklyFixedCosts {
    pub fn total(&self) -> f64 {
        self.truck
            + self.trailer
            + self.insurance
            + self.telematics
            + self.permits
            + self.sga
            + self.misc
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitProfile {
    pub id: String,
    pub unit_number: String,
    /// Driver currently assigned to the unit
    pub driver_id: Option<String>,
    pub weekly_costs: WeeklyFixedCosts,
    pub is_active: bool,
}

impl UnitProfile {
    pub fn total_weekly_fixed_cost(&self) -> f64 {
        self.weekly_costs.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_total_sums_every_component() {
        let costs = WeeklyFixedCosts {
            truck: 1000.0,
            trailer: 250.0,
            insurance: 450.0,
            telematics: 35.0,
            permits: 145.0,
            sga: 180.0,
            misc: 40.0,
        };
        assert_eq!(costs.total(), 2100.0);
    }

    #[test]
    fn empty_unit_has_no_fixed_cost() {
        assert_eq!(WeeklyFixedCosts::default().total(), 0.0);
    }
}
