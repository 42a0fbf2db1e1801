//! Rate rule entity and rate table lookup

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::accessorial::EventKind;
use crate::domain::driver::{DriverType, OoZone};

/// Rule keys and types understood by the calculator.
///
/// A lookup key is `"{rule_key}_{rule_type}"`, e.g. `BASE_WAGE_OO_ZONE2`.
pub mod keys {
    pub const GLOBAL: &str = "GLOBAL";

    pub const BASE_WAGE: &str = "BASE_WAGE";
    pub const FUEL_CPM: &str = "FUEL_CPM";
    pub const BENEFITS_PCT: &str = "BENEFITS_PCT";
    pub const PERF_PCT: &str = "PERF_PCT";
    pub const SAFETY_PCT: &str = "SAFETY_PCT";
    pub const STEP_PCT: &str = "STEP_PCT";
    pub const TRUCK_MAINTENANCE_CPM: &str = "TRK_RM_CPM";
    pub const TRAILER_MAINTENANCE_CPM: &str = "TRL_RM_CPM";
    pub const BORDER_CROSSING_PER: &str = "BC_PER";
    pub const DROP_HOOK_PER: &str = "DH_PER";
    pub const PICKUP_PER: &str = "PICK_PER";
    pub const DELIVERY_PER: &str = "DEL_PER";
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateRule {
    pub id: i32,
    pub rule_key: String,
    /// Driver type code, `OO_ZONEn`, or `GLOBAL`
    pub rule_type: String,
    pub value: f64,
    pub description: Option<String>,
    pub effective_date: DateTime<Utc>,
    pub is_active: bool,
}

impl RateRule {
    pub fn lookup_key(&self) -> String {
        lookup_key(&self.rule_key, &self.rule_type)
    }

    /// Active and already in effect at `now`.
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.effective_date <= now
    }
}

fn lookup_key(rule_key: &str, rule_type: &str) -> String {
    format!("{}_{}", rule_key, rule_type)
}

/// Percentage adders applied on top of the base wage, as fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WageAdders {
    pub benefits_pct: f64,
    pub performance_pct: f64,
    pub safety_pct: f64,
    pub step_pct: f64,
}

impl WageAdders {
    pub fn multiplier(&self) -> f64 {
        1.0 + self.benefits_pct + self.performance_pct + self.safety_pct + self.step_pct
    }
}

/// Immutable rate lookup built for a single calculation.
///
/// Never cached across requests: every calculation loads the rules it needs
/// and passes its own table down the call chain.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Build the table from candidate rules, keeping only those in effect at
    /// `now`. When several rules share a key, the latest effective date wins.
    pub fn from_rules(rules: impl IntoIterator<Item = RateRule>, now: DateTime<Utc>) -> Self {
        let mut latest: HashMap<String, (DateTime<Utc>, f64)> = HashMap::new();

        for rule in rules.into_iter().filter(|r| r.is_effective(now)) {
            let key = rule.lookup_key();
            match latest.get(&key) {
                Some((effective, _)) if *effective > rule.effective_date => {}
                _ => {
                    latest.insert(key, (rule.effective_date, rule.value));
                }
            }
        }

        Self {
            rates: latest.into_iter().map(|(k, (_, v))| (k, v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn get(&self, rule_key: &str, rule_type: &str) -> Option<f64> {
        self.rates.get(&lookup_key(rule_key, rule_type)).copied()
    }

    /// Missing rates contribute nothing to a cost.
    pub fn value_or_zero(&self, rule_key: &str, rule_type: &str) -> f64 {
        self.get(rule_key, rule_type).unwrap_or(0.0)
    }

    fn global(&self, rule_key: &str) -> f64 {
        self.value_or_zero(rule_key, keys::GLOBAL)
    }

    /// Base wage per mile. Owner-operators use their zone rate when one is
    /// configured and fall back to the plain `OO` rate otherwise.
    pub fn base_wage_cpm(&self, driver_type: DriverType, zone: Option<OoZone>) -> f64 {
        if let (DriverType::OwnerOperator, Some(zone)) = (driver_type, zone) {
            let zone_type = format!("{}_{}", driver_type.code(), zone.code());
            if let Some(rate) = self.get(keys::BASE_WAGE, &zone_type) {
                return rate;
            }
        }
        self.value_or_zero(keys::BASE_WAGE, driver_type.code())
    }

    pub fn wage_adders(&self) -> WageAdders {
        WageAdders {
            benefits_pct: self.global(keys::BENEFITS_PCT),
            performance_pct: self.global(keys::PERF_PCT),
            safety_pct: self.global(keys::SAFETY_PCT),
            step_pct: self.global(keys::STEP_PCT),
        }
    }

    pub fn fuel_cpm(&self, driver_type: DriverType) -> f64 {
        self.value_or_zero(keys::FUEL_CPM, driver_type.code())
    }

    pub fn truck_maintenance_cpm(&self) -> f64 {
        self.global(keys::TRUCK_MAINTENANCE_CPM)
    }

    pub fn trailer_maintenance_cpm(&self) -> f64 {
        self.global(keys::TRAILER_MAINTENANCE_CPM)
    }

    /// Price charged per occurrence of an accessorial event.
    pub fn event_price(&self, kind: EventKind) -> f64 {
        let key = match kind {
            EventKind::BorderCrossing => keys::BORDER_CROSSING_PER,
            EventKind::DropHook => keys::DROP_HOOK_PER,
            EventKind::Pickup => keys::PICKUP_PER,
            EventKind::Delivery => keys::DELIVERY_PER,
        };
        self.global(key)
    }
}
