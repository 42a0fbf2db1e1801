//! Costing request/response DTOs
//!
//! Responses are rounded here (money to 2 dp, per-mile figures to 4 dp);
//! the stored calculation trace keeps full precision.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::costing::{CalculateCost, CostCalculation};
use crate::domain::accessorial::{DetectedEvent, EventCounts, EventOverrides};
use crate::domain::trip_cost::{
    AccessorialComponent, ActualCost, CostBreakdown, Direction, FixedCostComponent,
    MarginAnalysis, PricingSuggestions, RollingComponent, TripCost, WageComponent,
};
use crate::domain::unit::WeeklyFixedCosts;
use crate::domain::week_miles::WeekMilesSummary;
use crate::domain::DomainError;
use crate::support::rounding::{cpm, money};

// ── Requests ────────────────────────────────────────────────────

/// Trip cost calculation input
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculateCostRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub order_id: String,
    pub trip_id: Option<String>,
    pub driver_id: Option<String>,
    pub unit_number: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub miles: f64,
    /// `INBOUND` or `OUTBOUND`
    #[schema(example = "OUTBOUND")]
    pub direction: String,
    #[serde(default)]
    pub is_round_trip: bool,
    #[serde(default)]
    #[schema(example = "FTL")]
    pub order_type: String,
    #[serde(default)]
    #[schema(example = "Toronto, CANADA")]
    pub origin: String,
    #[serde(default)]
    #[schema(example = "Detroit, USA")]
    pub destination: String,
    pub revenue: Option<f64>,
    /// Any day of the target week, `YYYY-MM-DD`
    #[schema(value_type = Option<String>, format = Date)]
    pub week_start: Option<NaiveDate>,
    #[validate(range(max = 1000, message = "must be at most 1000"))]
    pub border_crossings: Option<u32>,
    #[validate(range(max = 1000, message = "must be at most 1000"))]
    pub drop_hooks: Option<u32>,
    #[validate(range(max = 1000, message = "must be at most 1000"))]
    pub pickups: Option<u32>,
    #[validate(range(max = 1000, message = "must be at most 1000"))]
    pub deliveries: Option<u32>,
}

impl TryFrom<CalculateCostRequest> for CalculateCost {
    type Error = DomainError;

    fn try_from(r: CalculateCostRequest) -> Result<Self, Self::Error> {
        Ok(CalculateCost {
            direction: r.direction.parse::<Direction>()?,
            order_id: r.order_id,
            trip_id: r.trip_id,
            driver_id: r.driver_id,
            unit_number: r.unit_number,
            miles: r.miles,
            is_round_trip: r.is_round_trip,
            order_type: r.order_type,
            origin: r.origin,
            destination: r.destination,
            revenue: r.revenue,
            week_start: r.week_start,
            overrides: EventOverrides {
                border_crossings: r.border_crossings,
                drop_hooks: r.drop_hooks,
                pickups: r.pickups,
                deliveries: r.deliveries,
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualCostRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub order_id: String,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub actual_miles: f64,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub actual_cost: f64,
}

/// Body of `PATCH /actual/{orderId}`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualCostPatch {
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub actual_miles: f64,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub actual_cost: f64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WeekMilesQuery {
    /// Any day of the week, `YYYY-MM-DD`; defaults to the current week
    #[param(value_type = Option<String>, format = Date)]
    pub week_start: Option<NaiveDate>,
}

// ── Breakdown ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyFixedCostsDto {
    pub truck: f64,
    pub trailer: f64,
    pub insurance: f64,
    pub telematics: f64,
    pub permits: f64,
    pub sga: f64,
    pub misc: f64,
}

impl From<&WeeklyFixedCosts> for WeeklyFixedCostsDto {
    fn from(c: &WeeklyFixedCosts) -> Self {
        Self {
            truck: money(c.truck),
            trailer: money(c.trailer),
            insurance: money(c.insurance),
            telematics: money(c.telematics),
            permits: money(c.permits),
            sga: money(c.sga),
            misc: money(c.misc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostDto {
    pub components: WeeklyFixedCostsDto,
    pub total_weekly_cost: f64,
    pub prior_weekly_miles: f64,
    pub total_weekly_miles: f64,
    pub fixed_cpm: f64,
}

impl From<&FixedCostComponent> for FixedCostDto {
    fn from(f: &FixedCostComponent) -> Self {
        Self {
            components: (&f.components).into(),
            total_weekly_cost: money(f.total_weekly_cost),
            prior_weekly_miles: money(f.prior_weekly_miles),
            total_weekly_miles: money(f.total_weekly_miles),
            fixed_cpm: cpm(f.fixed_cpm),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WageDto {
    pub base_cpm: f64,
    pub benefits_pct: f64,
    pub performance_pct: f64,
    pub safety_pct: f64,
    pub step_pct: f64,
    pub effective_wage_cpm: f64,
}

impl From<&WageComponent> for WageDto {
    fn from(w: &WageComponent) -> Self {
        Self {
            base_cpm: cpm(w.base_cpm),
            benefits_pct: cpm(w.benefits_pct),
            performance_pct: cpm(w.performance_pct),
            safety_pct: cpm(w.safety_pct),
            step_pct: cpm(w.step_pct),
            effective_wage_cpm: cpm(w.effective_wage_cpm),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RollingDto {
    pub fuel_cpm: f64,
    pub truck_maintenance_cpm: f64,
    pub trailer_maintenance_cpm: f64,
    pub total_rolling_cpm: f64,
}

impl From<&RollingComponent> for RollingDto {
    fn from(r: &RollingComponent) -> Self {
        Self {
            fuel_cpm: cpm(r.fuel_cpm),
            truck_maintenance_cpm: cpm(r.truck_maintenance_cpm),
            trailer_maintenance_cpm: cpm(r.trailer_maintenance_cpm),
            total_rolling_cpm: cpm(r.total_rolling_cpm),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessorialDto {
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

impl From<&AccessorialComponent> for AccessorialDto {
    fn from(a: &AccessorialComponent) -> Self {
        Self {
            border_crossings: a.border_crossings,
            border_crossing_cost: money(a.border_crossing_cost),
            drop_hooks: a.drop_hooks,
            drop_hook_cost: money(a.drop_hook_cost),
            pickups: a.pickups,
            pickup_cost: money(a.pickup_cost),
            deliveries: a.deliveries,
            delivery_cost: money(a.delivery_cost),
            total_accessorial_cost: money(a.total_accessorial_cost),
            accessorial_cpm: cpm(a.accessorial_cpm),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownDto {
    pub fixed: FixedCostDto,
    pub wage: WageDto,
    pub rolling: RollingDto,
    pub accessorial: AccessorialDto,
}

impl From<&CostBreakdown> for BreakdownDto {
    fn from(b: &CostBreakdown) -> Self {
        Self {
            fixed: (&b.fixed).into(),
            wage: (&b.wage).into(),
            rolling: (&b.rolling).into(),
            accessorial: (&b.accessorial).into(),
        }
    }
}

// ── Margin / pricing / events ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarginAnalysisDto {
    pub revenue: f64,
    pub rpm: f64,
    pub ppm: f64,
    pub profit: f64,
    pub margin_pct: f64,
    pub is_profitable: bool,
    pub break_even_rpm: f64,
}

impl From<&MarginAnalysis> for MarginAnalysisDto {
    fn from(m: &MarginAnalysis) -> Self {
        Self {
            revenue: money(m.revenue),
            rpm: cpm(m.rpm),
            ppm: cpm(m.ppm),
            profit: money(m.profit),
            margin_pct: cpm(m.margin_pct),
            is_profitable: m.is_profitable,
            break_even_rpm: cpm(m.break_even_rpm),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingSuggestionsDto {
    pub minimum_rpm: f64,
    pub target_rpm: f64,
    pub recommended_price: f64,
}

impl From<&PricingSuggestions> for PricingSuggestionsDto {
    fn from(p: &PricingSuggestions) -> Self {
        Self {
            minimum_rpm: cpm(p.minimum_rpm),
            target_rpm: cpm(p.target_rpm),
            recommended_price: money(p.recommended_price),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectedEventDto {
    pub event_code: String,
    pub event_name: String,
    pub quantity: u32,
    pub cost_per_event: f64,
    pub total_cost: f64,
    pub detection_reason: String,
}

impl From<&DetectedEvent> for DetectedEventDto {
    fn from(e: &DetectedEvent) -> Self {
        Self {
            event_code: e.event_code.clone(),
            event_name: e.event_name.clone(),
            quantity: e.quantity,
            cost_per_event: money(e.cost_per_event),
            total_cost: money(e.total_cost),
            detection_reason: e.detection_reason.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCountsDto {
    pub border_crossings: u32,
    pub drop_hooks: u32,
    pub pickups: u32,
    pub deliveries: u32,
}

impl From<EventCounts> for EventCountsDto {
    fn from(c: EventCounts) -> Self {
        Self {
            border_crossings: c.border_crossings,
            drop_hooks: c.drop_hooks,
            pickups: c.pickups,
            deliveries: c.deliveries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualCostDto {
    pub actual_miles: f64,
    pub actual_cost: f64,
    pub variance: f64,
    pub variance_pct: f64,
}

impl From<&ActualCost> for ActualCostDto {
    fn from(a: &ActualCost) -> Self {
        Self {
            actual_miles: money(a.actual_miles),
            actual_cost: money(a.actual_cost),
            variance: money(a.variance),
            variance_pct: cpm(a.variance_pct),
        }
    }
}

// ── Responses ───────────────────────────────────────────────────

/// Result of `POST /calculate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostCalculationResponse {
    pub cost_id: String,
    pub order_id: String,
    pub trip_id: Option<String>,
    pub total_cost: f64,
    pub total_cpm: f64,
    pub breakdown: BreakdownDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_analysis: Option<MarginAnalysisDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_suggestions: Option<PricingSuggestionsDto>,
    pub auto_detected_events: Vec<DetectedEventDto>,
    #[schema(value_type = Object)]
    pub calculation_formula: serde_json::Value,
    pub calculated_at: DateTime<Utc>,
}

impl From<CostCalculation> for CostCalculationResponse {
    fn from(c: CostCalculation) -> Self {
        Self {
            breakdown: (&c.breakdown).into(),
            margin_analysis: c.margin.as_ref().map(Into::into),
            pricing_suggestions: c.pricing.as_ref().map(Into::into),
            auto_detected_events: c.auto_detected_events.iter().map(Into::into).collect(),
            cost_id: c.trip_cost.id,
            order_id: c.trip_cost.order_id,
            trip_id: c.trip_cost.trip_id,
            total_cost: money(c.trip_cost.total_cost),
            total_cpm: cpm(c.trip_cost.total_cpm),
            calculation_formula: c.trip_cost.calculation_formula,
            calculated_at: c.trip_cost.calculated_at,
        }
    }
}

/// A stored trip cost, as returned by the breakdown and actual endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripCostResponse {
    pub cost_id: String,
    pub trip_id: Option<String>,
    pub order_id: String,
    pub driver_id: String,
    pub unit_id: Option<String>,
    pub driver_type: String,
    pub oo_zone: Option<String>,
    pub miles: f64,
    pub direction: String,
    pub is_round_trip: bool,
    #[schema(value_type = Option<String>, format = Date)]
    pub week_start: Option<NaiveDate>,
    pub events: EventCountsDto,
    pub fixed_cpm: f64,
    pub wage_cpm: f64,
    pub rolling_cpm: f64,
    pub accessorial_cpm: f64,
    pub total_cpm: f64,
    pub total_cost: f64,
    pub breakdown: Option<BreakdownDto>,
    pub margin_analysis: Option<MarginAnalysisDto>,
    pub pricing_suggestions: PricingSuggestionsDto,
    pub actual: Option<ActualCostDto>,
    #[schema(value_type = Object)]
    pub calculation_formula: serde_json::Value,
    pub calculated_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TripCost> for TripCostResponse {
    fn from(t: TripCost) -> Self {
        Self {
            breakdown: t.breakdown().as_ref().map(Into::into),
            margin_analysis: t.margin.as_ref().map(Into::into),
            pricing_suggestions: (&t.pricing()).into(),
            actual: t.actual.as_ref().map(Into::into),
            driver_type: t.driver_type.code().to_string(),
            oo_zone: t.oo_zone.map(|z| z.code().to_string()),
            direction: t.direction.code().to_string(),
            events: t.events.into(),
            miles: money(t.miles),
            fixed_cpm: cpm(t.fixed_cpm),
            wage_cpm: cpm(t.wage_cpm),
            rolling_cpm: cpm(t.rolling_cpm),
            accessorial_cpm: cpm(t.accessorial_cpm),
            total_cpm: cpm(t.total_cpm),
            total_cost: money(t.total_cost),
            cost_id: t.id,
            trip_id: t.trip_id,
            order_id: t.order_id,
            driver_id: t.driver_id,
            unit_id: t.unit_id,
            is_round_trip: t.is_round_trip,
            week_start: t.week_start,
            calculation_formula: t.calculation_formula,
            calculated_at: t.calculated_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekMilesResponse {
    pub unit_number: String,
    #[schema(value_type = String, format = Date)]
    pub week_start: NaiveDate,
    pub total_miles: f64,
    pub trip_count: u32,
}

impl From<WeekMilesSummary> for WeekMilesResponse {
    fn from(s: WeekMilesSummary) -> Self {
        Self {
            total_miles: money(s.total_miles),
            unit_number: s.unit_number,
            week_start: s.week_start,
            trip_count: s.trip_count,
        }
    }
}
