//! Trip cost audit record and breakdown structures
//!
//! All figures are kept at full `f64` precision here. Rounding to output
//! precision is the HTTP layer's job.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::accessorial::EventCounts;
use crate::domain::driver::{DriverType, OoZone};
use crate::domain::unit::WeeklyFixedCosts;
use crate::domain::DomainError;

/// Target multiplier over break-even used for price suggestions (15% margin).
pub const TARGET_MARGIN_MULTIPLIER: f64 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Inbound => "INBOUND",
            Self::Outbound => "OUTBOUND",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INBOUND" => Ok(Self::Inbound),
            "OUTBOUND" => Ok(Self::Outbound),
            other => Err(DomainError::Validation(format!(
                "Unknown direction: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostComponent {
    pub components: WeeklyFixedCosts,
    pub total_weekly_cost: f64,
    /// Miles already in the week bucket before this trip
    pub prior_weekly_miles: f64,
    /// Prior miles plus this trip
    pub total_weekly_miles: f64,
    pub fixed_cpm: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WageComponent {
    pub base_cpm: f64,
    pub benefits_pct: f64,
    pub performance_pct: f64,
    pub safety_pct: f64,
    pub step_pct: f64,
    pub effective_wage_cpm: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingComponent {
    pub fuel_cpm: f64,
    pub truck_maintenance_cpm: f64,
    pub trailer_maintenance_cpm: f64,
    pub total_rolling_cpm: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorialComponent {
    pub border_crossings: u32,
    pub border_crossing_cost: f64,
    pub drop_hooks: u32,
    pub drop_hook_cost: f64,
    pub pickups: u32,
    pub pickup_cost: f64,
    pub deliveries: u32,
    pub delivery_cost: f64,
    pub total_accessorial_cost: f64,
    pub accessorial_cpm: f64,
}

impl AccessorialComponent {
    pub fn counts(&self) -> EventCounts {
        EventCounts {
            border_crossings: self.border_crossings,
            drop_hooks: self.drop_hooks,
            pickups: self.pickups,
            deliveries: self.deliveries,
        }
    }
}

/// Itemized per-mile cost of a trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub fixed: FixedCostComponent,
    pub wage: WageComponent,
    pub rolling: RollingComponent,
    pub accessorial: AccessorialComponent,
}

impl CostBreakdown {
    pub fn total_cpm(&self) -> f64 {
        self.fixed.fixed_cpm
            + self.wage.effective_wage_cpm
            + self.rolling.total_rolling_cpm
            + self.accessorial.accessorial_cpm
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAnalysis {
    pub revenue: f64,
    pub rpm: f64,
    pub ppm: f64,
    pub profit: f64,
    pub margin_pct: f64,
    pub is_profitable: bool,
    pub break_even_rpm: f64,
}

impl MarginAnalysis {
    /// `None` unless revenue is positive.
    pub fn analyze(revenue: Option<f64>, miles: f64, total_cpm: f64, total_cost: f64) -> Option<Self> {
        let revenue = revenue.filter(|r| *r > 0.0)?;
        let rpm = if miles > 0.0 { revenue / miles } else { 0.0 };
        let profit = revenue - total_cost;

        Some(Self {
            revenue,
            rpm,
            ppm: rpm - total_cpm,
            profit,
            margin_pct: profit / revenue,
            is_profitable: profit > 0.0,
            break_even_rpm: total_cpm,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSuggestions {
    pub minimum_rpm: f64,
    pub target_rpm: f64,
    pub recommended_price: f64,
}

impl PricingSuggestions {
    pub fn suggest(miles: f64, total_cpm: f64) -> Self {
        let target_rpm = total_cpm * TARGET_MARGIN_MULTIPLIER;
        Self {
            minimum_rpm: total_cpm,
            target_rpm,
            recommended_price: target_rpm * miles,
        }
    }
}

/// Post-trip reconciliation figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActualCost {
    pub actual_miles: f64,
    pub actual_cost: f64,
    pub variance: f64,
    pub variance_pct: f64,
}

impl ActualCost {
    pub fn reconcile(estimated_total: f64, actual_miles: f64, actual_cost: f64) -> Self {
        let variance = actual_cost - estimated_total;
        let variance_pct = if estimated_total > 0.0 {
            variance / estimated_total
        } else {
            0.0
        };
        Self {
            actual_miles,
            actual_cost,
            variance,
            variance_pct,
        }
    }
}

/// Persisted result of one cost calculation
#[derive(Debug, Clone, PartialEq)]
pub struct TripCost {
    pub id: String,
    pub trip_id: Option<String>,
    pub order_id: String,
    pub driver_id: String,
    pub unit_id: Option<String>,
    pub driver_type: DriverType,
    pub oo_zone: Option<OoZone>,
    pub miles: f64,
    pub direction: Direction,
    pub is_round_trip: bool,
    /// Week bucket the trip was counted in, if any
    pub week_start: Option<NaiveDate>,
    pub events: EventCounts,
    pub fixed_cpm: f64,
    pub wage_cpm: f64,
    pub rolling_cpm: f64,
    pub accessorial_cpm: f64,
    pub total_cpm: f64,
    pub total_cost: f64,
    pub margin: Option<MarginAnalysis>,
    /// Structured trace of inputs, breakdown and totals
    pub calculation_formula: serde_json::Value,
    pub calculated_at: DateTime<Utc>,
    pub actual: Option<ActualCost>,
    pub updated_at: DateTime<Utc>,
}

impl TripCost {
    /// Overwrite any previous reconciliation with fresh actuals.
    pub fn record_actual(&mut self, actual_miles: f64, actual_cost: f64, now: DateTime<Utc>) {
        self.actual = Some(ActualCost::reconcile(self.total_cost, actual_miles, actual_cost));
        self.updated_at = now;
    }

    /// Breakdown stored in the calculation trace.
    pub fn breakdown(&self) -> Option<CostBreakdown> {
        self.calculation_formula
            .get("breakdown")
            .and_then(|b| serde_json::from_value(b.clone()).ok())
    }

    pub fn pricing(&self) -> PricingSuggestions {
        PricingSuggestions::suggest(self.miles, self.total_cpm)
    }
}
