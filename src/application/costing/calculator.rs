//! Per-mile cost breakdown
//!
//! Pure arithmetic over a request-scoped [`RateTable`]. Values stay at full
//! precision; every division is guarded so zero miles degrade to zero CPM.

use crate::domain::accessorial::{EventCounts, EventKind};
use crate::domain::driver::DriverProfile;
use crate::domain::rates::RateTable;
use crate::domain::trip_cost::{
    AccessorialComponent, CostBreakdown, FixedCostComponent, RollingComponent, WageComponent,
};
use crate::domain::unit::UnitProfile;

pub struct BreakdownCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> BreakdownCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    pub fn calculate(
        &self,
        driver: &DriverProfile,
        unit: Option<&UnitProfile>,
        miles: f64,
        prior_weekly_miles: f64,
        events: &EventCounts,
    ) -> CostBreakdown {
        CostBreakdown {
            fixed: self.fixed(unit, miles, prior_weekly_miles),
            wage: self.wage(driver),
            rolling: self.rolling(driver),
            accessorial: self.accessorial(miles, events),
        }
    }

    fn fixed(&self, unit: Option<&UnitProfile>, miles: f64, prior_weekly_miles: f64) -> FixedCostComponent {
        let components = unit.map(|u| u.weekly_costs.clone()).unwrap_or_default();
        let total_weekly_cost = components.total();
        let total_weekly_miles = prior_weekly_miles + miles;

        FixedCostComponent {
            components,
            total_weekly_cost,
            prior_weekly_miles,
            total_weekly_miles,
            fixed_cpm: per_mile(total_weekly_cost, total_weekly_miles),
        }
    }

    fn wage(&self, driver: &DriverProfile) -> WageComponent {
        let base_cpm = self
            .rates
            .base_wage_cpm(driver.driver_type, driver.effective_zone());
        let adders = self.rates.wage_adders();

        WageComponent {
            base_cpm,
            benefits_pct: adders.benefits_pct,
            performance_pct: adders.performance_pct,
            safety_pct: adders.safety_pct,
            step_pct: adders.step_pct,
            effective_wage_cpm: base_cpm * adders.multiplier(),
        }
    }

    fn rolling(&self, driver: &DriverProfile) -> RollingComponent {
        let fuel_cpm = self.rates.fuel_cpm(driver.driver_type);
        let truck_maintenance_cpm = self.rates.truck_maintenance_cpm();
        let trailer_maintenance_cpm = self.rates.trailer_maintenance_cpm();

        RollingComponent {
            fuel_cpm,
            truck_maintenance_cpm,
            trailer_maintenance_cpm,
            total_rolling_cpm: fuel_cpm + truck_maintenance_cpm + trailer_maintenance_cpm,
        }
    }

    fn accessorial(&self, miles: f64, events: &EventCounts) -> AccessorialComponent {
        let cost = |kind: EventKind| f64::from(events.get(kind)) * self.rates.event_price(kind);

        let border_crossing_cost = cost(EventKind::BorderCrossing);
        let drop_hook_cost = cost(EventKind::DropHook);
        let pickup_cost = cost(EventKind::Pickup);
        let delivery_cost = cost(EventKind::Delivery);
        let total_accessorial_cost =
            border_crossing_cost + drop_hook_cost + pickup_cost + delivery_cost;

        AccessorialComponent {
            border_crossings: events.border_crossings,
            border_crossing_cost,
            drop_hooks: events.drop_hooks,
            drop_hook_cost,
            pickups: events.pickups,
            pickup_cost,
            deliveries: events.deliveries,
            delivery_cost,
            total_accessorial_cost,
            accessorial_cpm: per_mile(total_accessorial_cost, miles),
        }
    }
}

fn per_mile(amount: f64, miles: f64) -> f64 {
    if miles > 0.0 {
        amount / miles
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::driver::{DriverType, OoZone};
    use crate::domain::rates::{keys, RateRule};
    use crate::domain::unit::WeeklyFixedCosts;

    fn rule(key: &str, rule_type: &str, value: f64) -> RateRule {
        RateRule {
            id: 0,
            rule_key: key.into(),
            rule_type: rule_type.into(),
            value,
            description: None,
            effective_date: Utc::now() - Duration::days(1),
            is_active: true,
        }
    }

    fn rates() -> RateTable {
        RateTable::from_rules(
            vec![
                rule(keys::BASE_WAGE, "COM", 0.45),
                rule(keys::BASE_WAGE, "OO_ZONE2", 0.68),
                rule(keys::BENEFITS_PCT, keys::GLOBAL, 0.12),
                rule(keys::PERF_PCT, keys::GLOBAL, 0.05),
                rule(keys::SAFETY_PCT, keys::GLOBAL, 0.03),
                rule(keys::STEP_PCT, keys::GLOBAL, 0.02),
                rule(keys::FUEL_CPM, "COM", 0.70),
                rule(keys::FUEL_CPM, "OO", 0.22),
                rule(keys::TRUCK_MAINTENANCE_CPM, keys::GLOBAL, 0.08),
                rule(keys::TRAILER_MAINTENANCE_CPM, keys::GLOBAL, 0.03),
                rule(keys::BORDER_CROSSING_PER, keys::GLOBAL, 15.0),
                rule(keys::PICKUP_PER, keys::GLOBAL, 30.0),
            ],
            Utc::now(),
        )
    }

    fn owner_operator() -> DriverProfile {
        DriverProfile {
            id: "DRV-OO".into(),
            name: "Owner Op".into(),
            driver_type: DriverType::OwnerOperator,
            oo_zone: Some(OoZone::Zone2),
            unit_number: Some("T-200".into()),
            is_active: true,
        }
    }

    fn unit() -> UnitProfile {
        UnitProfile {
            id: "U-200".into(),
            unit_number: "T-200".into(),
            driver_id: Some("DRV-OO".into()),
            weekly_costs: WeeklyFixedCosts {
                truck: 1000.0,
                trailer: 250.0,
                insurance: 450.0,
                telematics: 35.0,
                permits: 145.0,
                sga: 180.0,
                misc: 40.0,
            },
            is_active: true,
        }
    }

    #[test]
    fn owner_operator_zone2_scenario() {
        let rates = rates();
        let calc = BreakdownCalculator::new(&rates);
        let unit = unit();

        let b = calc.calculate(&owner_operator(), Some(&unit), 500.0, 0.0, &EventCounts::default());

        assert!((b.fixed.fixed_cpm - 4.2).abs() < 1e-12);
        assert!((b.wage.effective_wage_cpm - 0.68 * 1.22).abs() < 1e-12);
        assert!((b.rolling.total_rolling_cpm - 0.33).abs() < 1e-12);
        assert_eq!(b.accessorial.accessorial_cpm, 0.0);

        let expected = 4.2 + 0.68 * 1.22 + 0.33;
        assert!((b.total_cpm() - expected).abs() < 1e-9);
    }

    #[test]
    fn fixed_cost_spreads_over_prior_and_current_miles() {
        let rates = rates();
        let calc = BreakdownCalculator::new(&rates);
        let unit = unit();

        let b = calc.calculate(&owner_operator(), Some(&unit), 500.0, 1000.0, &EventCounts::default());

        assert_eq!(b.fixed.total_weekly_miles, 1500.0);
        assert!((b.fixed.fixed_cpm - 1.4).abs() < 1e-12);
    }

    #[test]
    fn zero_miles_never_divides_by_zero() {
        let rates = rates();
        let calc = BreakdownCalculator::new(&rates);
        let unit = unit();
        let events = EventCounts {
            border_crossings: 1,
            ..Default::default()
        };

        let b = calc.calculate(&owner_operator(), Some(&unit), 0.0, 0.0, &events);

        assert_eq!(b.fixed.fixed_cpm, 0.0);
        assert_eq!(b.accessorial.accessorial_cpm, 0.0);
        assert_eq!(b.accessorial.total_accessorial_cost, 15.0);
        assert!(b.total_cpm().is_finite());
    }

    #[test]
    fn no_unit_means_no_fixed_cost() {
        let rates = rates();
        let calc = BreakdownCalculator::new(&rates);

        let b = calc.calculate(&owner_operator(), None, 250.0, 0.0, &EventCounts::default());

        assert_eq!(b.fixed.total_weekly_cost, 0.0);
        assert_eq!(b.fixed.fixed_cpm, 0.0);
    }

    #[test]
    fn accessorials_priced_from_rate_table() {
        let rates = rates();
        let calc = BreakdownCalculator::new(&rates);
        let events = EventCounts {
            border_crossings: 2,
            pickups: 1,
            drop_hooks: 3,
            deliveries: 0,
        };

        let b = calc.calculate(&owner_operator(), None, 300.0, 0.0, &events);

        assert_eq!(b.accessorial.border_crossing_cost, 30.0);
        assert_eq!(b.accessorial.pickup_cost, 30.0);
        // DH_PER not configured in this table
        assert_eq!(b.accessorial.drop_hook_cost, 0.0);
        assert_eq!(b.accessorial.total_accessorial_cost, 60.0);
        assert!((b.accessorial.accessorial_cpm - 0.2).abs() < 1e-12);
    }

    #[test]
    fn company_driver_ignores_zone_rates() {
        let rates = rates();
        let calc = BreakdownCalculator::new(&rates);
        let mut driver = owner_operator();
        driver.driver_type = DriverType::Company;

        let b = calc.calculate(&driver, None, 100.0, 0.0, &EventCounts::default());

        assert_eq!(b.wage.base_cpm, 0.45);
        assert_eq!(b.rolling.fuel_cpm, 0.70);
    }
}
