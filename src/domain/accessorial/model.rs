//! Accessorial event entities

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four accessorial events the breakdown prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    BorderCrossing,
    DropHook,
    Pickup,
    Delivery,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::BorderCrossing,
        EventKind::DropHook,
        EventKind::Pickup,
        EventKind::Delivery,
    ];

    /// Event type code this kind is configured under.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BorderCrossing => "BC",
            Self::DropHook => "DH",
            Self::Pickup => "PICKUP",
            Self::Delivery => "DELIVERY",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }
}

/// Configured event type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub code: String,
    pub name: String,
    pub cost_per_event: f64,
    /// Only automatic types are eligible for detection; manual types need
    /// explicit caller input.
    pub is_automatic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerType {
    /// Origin/destination straddle the US/Canada border
    BorderCrossing,
    /// Order type is in the rule's allowed set
    OrderType,
}

impl TriggerType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BorderCrossing => "BORDER_CROSSING",
            Self::OrderType => "ORDER_TYPE",
        }
    }
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TriggerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BORDER_CROSSING" => Ok(Self::BorderCrossing),
            "ORDER_TYPE" => Ok(Self::OrderType),
            other => Err(format!("Unknown trigger type: {}", other)),
        }
    }
}

/// Structured predicate attached to an event rule.
///
/// Stored as JSON, e.g. `{"order_types": ["PICKUP", "ROUND_TRIP"], "count": 1}`.
/// Border-crossing rules carry an empty condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerCondition {
    #[serde(default)]
    pub order_types: Vec<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

impl TriggerCondition {
    pub fn matches_order_type(&self, order_type: &str) -> bool {
        self.order_types.iter().any(|t| t == order_type)
    }

    /// Quantity to record when the rule fires; defaults to one.
    pub fn quantity(&self) -> u32 {
        match self.count {
            Some(0) | None => 1,
            Some(n) => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRule {
    pub id: i32,
    pub event_code: String,
    pub trigger_type: TriggerType,
    pub condition: TriggerCondition,
}

/// Trip attributes the detector looks at
#[derive(Debug, Clone, Default)]
pub struct TripContext {
    pub origin: String,
    pub destination: String,
    pub order_type: String,
}

/// Final per-kind event counts fed into the breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub border_crossings: u32,
    pub drop_hooks: u32,
    pub pickups: u32,
    pub deliveries: u32,
}

impl EventCounts {
    pub fn get(&self, kind: EventKind) -> u32 {
        match kind {
            EventKind::BorderCrossing => self.border_crossings,
            EventKind::DropHook => self.drop_hooks,
            EventKind::Pickup => self.pickups,
            EventKind::Delivery => self.deliveries,
        }
    }

    pub fn set(&mut self, kind: EventKind, count: u32) {
        match kind {
            EventKind::BorderCrossing => self.border_crossings = count,
            EventKind::DropHook => self.drop_hooks = count,
            EventKind::Pickup => self.pickups = count,
            EventKind::Delivery => self.deliveries = count,
        }
    }

    /// Replace each field for which the caller supplied a value.
    pub fn with_overrides(mut self, overrides: &EventOverrides) -> Self {
        for kind in EventKind::ALL {
            if let Some(explicit) = overrides.get(kind) {
                self.set(kind, explicit);
            }
        }
        self
    }
}

/// Largest count a caller may supply for a single event kind.
pub const MAX_EVENT_OVERRIDE: u32 = 1_000;

/// Caller-supplied counts; `Some(0)` is an explicit zero, not "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOverrides {
    pub border_crossings: Option<u32>,
    pub drop_hooks: Option<u32>,
    pub pickups: Option<u32>,
    pub deliveries: Option<u32>,
}

impl EventOverrides {
    pub fn get(&self, kind: EventKind) -> Option<u32> {
        match kind {
            EventKind::BorderCrossing => self.border_crossings,
            EventKind::DropHook => self.drop_hooks,
            EventKind::Pickup => self.pickups,
            EventKind::Delivery => self.deliveries,
        }
    }

    /// First kind whose count exceeds [`MAX_EVENT_OVERRIDE`].
    pub fn out_of_range(&self) -> Option<EventKind> {
        EventKind::ALL
            .into_iter()
            .find(|&kind| matches!(self.get(kind), Some(n) if n > MAX_EVENT_OVERRIDE))
    }
}

/// Audit entry for an event found by detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEvent {
    pub event_code: String,
    pub event_name: String,
    pub quantity: u32,
    pub cost_per_event: f64,
    pub total_cost: f64,
    pub detection_reason: String,
}
