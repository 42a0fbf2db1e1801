//! Reference data shipped with the service
//!
//! The migrator writes the default rate rules and event catalog from here;
//! `--seed-demo` adds the demo drivers and units. The in-memory repositories
//! load the same values.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::accessorial::{EventRule, EventType, TriggerCondition, TriggerType};
use crate::domain::driver::{DriverProfile, DriverType, OoZone};
use crate::domain::rates::{keys, RateRule};
use crate::domain::unit::{UnitProfile, WeeklyFixedCosts};

/// Effective date of the shipped rate rules
pub fn default_effective_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

const DEFAULT_RATES: &[(&str, &str, f64, &str)] = &[
    (keys::BASE_WAGE, "COM", 0.45, "Company driver base wage per mile"),
    (keys::BASE_WAGE, "RNR", 0.38, "Rental driver base wage per mile"),
    (keys::BASE_WAGE, "OO", 0.70, "Owner-operator base wage per mile"),
    (keys::BASE_WAGE, "OO_ZONE1", 0.72, "Owner-operator zone 1 base wage per mile"),
    (keys::BASE_WAGE, "OO_ZONE2", 0.68, "Owner-operator zone 2 base wage per mile"),
    (keys::BASE_WAGE, "OO_ZONE3", 0.65, "Owner-operator zone 3 base wage per mile"),
    (keys::BENEFITS_PCT, keys::GLOBAL, 0.12, "Benefits as a fraction of base wage"),
    (keys::PERF_PCT, keys::GLOBAL, 0.05, "Performance bonus fraction"),
    (keys::SAFETY_PCT, keys::GLOBAL, 0.03, "Safety bonus fraction"),
    (keys::STEP_PCT, keys::GLOBAL, 0.02, "Step increase fraction"),
    (keys::FUEL_CPM, "COM", 0.70, "Fuel cost per mile, company"),
    (keys::FUEL_CPM, "RNR", 0.70, "Fuel cost per mile, rental"),
    (keys::FUEL_CPM, "OO", 0.22, "Fuel cost per mile, owner-operator"),
    (keys::TRUCK_MAINTENANCE_CPM, keys::GLOBAL, 0.08, "Truck repair and maintenance per mile"),
    (keys::TRAILER_MAINTENANCE_CPM, keys::GLOBAL, 0.03, "Trailer repair and maintenance per mile"),
    (keys::BORDER_CROSSING_PER, keys::GLOBAL, 15.0, "Per border crossing"),
    (keys::DROP_HOOK_PER, keys::GLOBAL, 30.0, "Per drop/hook"),
    (keys::PICKUP_PER, keys::GLOBAL, 30.0, "Per pickup stop"),
    (keys::DELIVERY_PER, keys::GLOBAL, 30.0, "Per delivery stop"),
];

pub fn default_rate_rules() -> Vec<RateRule> {
    let effective_date = default_effective_date();
    DEFAULT_RATES
        .iter()
        .enumerate()
        .map(|(i, (key, rule_type, value, description))| RateRule {
            id: i as i32 + 1,
            rule_key: key.to_string(),
            rule_type: rule_type.to_string(),
            value: *value,
            description: Some(description.to_string()),
            effective_date,
            is_active: true,
        })
        .collect()
}

pub fn default_event_types() -> Vec<EventType> {
    [
        ("BC", "Border Crossing", 15.0, true),
        ("DH", "Drop/Hook", 30.0, false),
        ("PICKUP", "Pickup Stop", 30.0, true),
        ("DELIVERY", "Delivery Stop", 30.0, true),
    ]
    .into_iter()
    .map(|(code, name, cost, is_automatic)| EventType {
        code: code.into(),
        name: name.into(),
        cost_per_event: cost,
        is_automatic,
    })
    .collect()
}

pub fn default_event_rules() -> Vec<EventRule> {
    let stop_condition = || TriggerCondition {
        order_types: vec!["FTL".into(), "LTL".into()],
        count: Some(1),
    };
    vec![
        EventRule {
            id: 1,
            event_code: "BC".into(),
            trigger_type: TriggerType::BorderCrossing,
            condition: TriggerCondition::default(),
        },
        EventRule {
            id: 2,
            event_code: "PICKUP".into(),
            trigger_type: TriggerType::OrderType,
            condition: stop_condition(),
        },
        EventRule {
            id: 3,
            event_code: "DELIVERY".into(),
            trigger_type: TriggerType::OrderType,
            condition: stop_condition(),
        },
    ]
}

pub fn demo_drivers() -> Vec<DriverProfile> {
    vec![
        DriverProfile {
            id: "DRV-001".into(),
            name: "Alex Morgan".into(),
            driver_type: DriverType::Company,
            oo_zone: None,
            unit_number: Some("T-101".into()),
            is_active: true,
        },
        DriverProfile {
            id: "DRV-002".into(),
            name: "Sam Patel".into(),
            driver_type: DriverType::Rental,
            oo_zone: None,
            unit_number: Some("T-102".into()),
            is_active: true,
        },
        DriverProfile {
            id: "DRV-003".into(),
            name: "Jordan Lee".into(),
            driver_type: DriverType::OwnerOperator,
            oo_zone: Some(OoZone::Zone2),
            unit_number: Some("T-103".into()),
            is_active: true,
        },
    ]
}

pub fn demo_units() -> Vec<UnitProfile> {
    let costs = WeeklyFixedCosts {
        truck: 1000.0,
        trailer: 250.0,
        insurance: 450.0,
        telematics: 35.0,
        permits: 145.0,
        sga: 180.0,
        misc: 40.0,
    };
    [("U-101", "T-101", "DRV-001"), ("U-102", "T-102", "DRV-002"), ("U-103", "T-103", "DRV-003")]
        .into_iter()
        .map(|(id, number, driver)| UnitProfile {
            id: id.into(),
            unit_number: number.into(),
            driver_id: Some(driver.into()),
            weekly_costs: costs.clone(),
            is_active: true,
        })
        .collect()
}
