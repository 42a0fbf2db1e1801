//! Metadata DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::metadata::CostingSummary;
use crate::domain::accessorial::{EventRule, EventType};
use crate::domain::rates::RateRule;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateRuleDto {
    pub id: i32,
    pub rule_key: String,
    pub rule_type: String,
    /// `KEY_TYPE`, e.g. `BASE_WAGE_OO_ZONE2`
    pub lookup_key: String,
    pub value: f64,
    pub description: Option<String>,
    pub effective_date: DateTime<Utc>,
    pub is_active: bool,
    /// Active and already in effect
    pub is_effective: bool,
}

impl RateRuleDto {
    pub fn from_rule(rule: RateRule, now: DateTime<Utc>) -> Self {
        Self {
            lookup_key: rule.lookup_key(),
            is_effective: rule.is_effective(now),
            id: rule.id,
            rule_key: rule.rule_key,
            rule_type: rule.rule_type,
            value: rule.value,
            description: rule.description,
            effective_date: rule.effective_date,
            is_active: rule.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeDto {
    pub event_code: String,
    pub event_name: String,
    pub cost_per_event: f64,
    pub is_automatic: bool,
}

impl From<EventType> for EventTypeDto {
    fn from(t: EventType) -> Self {
        Self {
            event_code: t.code,
            event_name: t.name,
            cost_per_event: t.cost_per_event,
            is_automatic: t.is_automatic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRuleDto {
    pub id: i32,
    pub event_code: String,
    pub trigger_type: String,
    #[schema(value_type = Object)]
    pub trigger_condition: serde_json::Value,
}

impl From<EventRule> for EventRuleDto {
    fn from(r: EventRule) -> Self {
        Self {
            id: r.id,
            trigger_type: r.trigger_type.code().to_string(),
            trigger_condition: serde_json::to_value(&r.condition).unwrap_or_default(),
            event_code: r.event_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCatalogResponse {
    pub event_types: Vec<EventTypeDto>,
    pub event_rules: Vec<EventRuleDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub effective_rules: u64,
    pub active_drivers: u64,
    pub active_units: u64,
    pub event_types: u64,
    pub cost_calculations: u64,
}

impl From<CostingSummary> for SummaryResponse {
    fn from(s: CostingSummary) -> Self {
        Self {
            effective_rules: s.effective_rules,
            active_drivers: s.active_drivers,
            active_units: s.active_units,
            event_types: s.event_types,
            cost_calculations: s.cost_calculations,
        }
    }
}
