//! Cost notification events
//!
//! Payloads published after a calculation or reconciliation commits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CostEvent {
    CostCalculated(CostCalculatedEvent),
    CostActual(CostActualEvent),
}

impl CostEvent {
    /// Downstream topic name
    pub fn topic(&self) -> &'static str {
        match self {
            CostEvent::CostCalculated(_) => "cost.calculated",
            CostEvent::CostActual(_) => "cost.actual",
        }
    }

    /// Partition key for downstream consumers.
    pub fn order_id(&self) -> &str {
        match self {
            CostEvent::CostCalculated(e) => &e.order_id,
            CostEvent::CostActual(e) => &e.order_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCalculatedEvent {
    pub cost_id: String,
    pub trip_id: Option<String>,
    pub order_id: String,
    pub total_cost: f64,
    pub total_cpm: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostActualEvent {
    pub cost_id: String,
    pub order_id: String,
    pub actual_miles: f64,
    pub actual_cost: f64,
    pub variance: f64,
    pub variance_pct: f64,
    pub timestamp: DateTime<Utc>,
}

/// Envelope delivered to live subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub topic: String,
    #[serde(flatten)]
    pub event: CostEvent,
}

impl EventMessage {
    pub fn new(event: CostEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            topic: event.topic().to_string(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculated() -> CostEvent {
        CostEvent::CostCalculated(CostCalculatedEvent {
            cost_id: "c-1".into(),
            trip_id: None,
            order_id: "ORD-1".into(),
            total_cost: 1234.5,
            total_cpm: 2.469,
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn topic_and_key() {
        let event = calculated();
        assert_eq!(event.topic(), "cost.calculated");
        assert_eq!(event.order_id(), "ORD-1");
    }

    #[test]
    fn message_serializes_with_type_tag() {
        let json = serde_json::to_value(EventMessage::new(calculated())).unwrap();
        assert_eq!(json["type"], "CostCalculated");
        assert_eq!(json["topic"], "cost.calculated");
        assert_eq!(json["data"]["orderId"], "ORD-1");
    }
}
