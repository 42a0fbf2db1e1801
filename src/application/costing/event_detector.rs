//! Accessorial event detection
//!
//! Infers implicit billable events from the trip context and the configured
//! rules, then lets explicit caller counts replace detected ones field by
//! field.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::accessorial::{
    DetectedEvent, EventCounts, EventKind, EventOverrides, EventRule, EventType, TriggerType,
    TripContext,
};

const US_MARKERS: [&str; 3] = ["USA", "US", "UNITED STATES"];
const CA_MARKERS: [&str; 3] = ["CANADA", "CA", "CANADIAN"];

/// Outcome of detection plus override merge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    /// Counts found by the rules alone
    pub detected: EventCounts,
    /// Counts after caller overrides were applied
    pub counts: EventCounts,
    pub details: Vec<DetectedEvent>,
}

pub struct EventDetector<'a> {
    event_types: HashMap<&'a str, &'a EventType>,
    rules: &'a [EventRule],
}

impl<'a> EventDetector<'a> {
    pub fn new(event_types: &'a [EventType], rules: &'a [EventRule]) -> Self {
        Self {
            event_types: event_types.iter().map(|t| (t.code.as_str(), t)).collect(),
            rules,
        }
    }

    pub fn detect(&self, trip: &TripContext, overrides: &EventOverrides) -> DetectionResult {
        let mut detected = EventCounts::default();
        let mut details = Vec::new();

        for rule in self.rules {
            // Manual or unknown event types are never inferred.
            let Some(event_type) = self
                .event_types
                .get(rule.event_code.as_str())
                .filter(|t| t.is_automatic)
            else {
                continue;
            };
            let Some(kind) = EventKind::from_code(&rule.event_code) else {
                debug!(event_code = %rule.event_code, "No breakdown slot for event code");
                continue;
            };

            let (quantity, reason) = match rule.trigger_type {
                TriggerType::BorderCrossing => {
                    if !crosses_border(&trip.origin, &trip.destination) {
                        continue;
                    }
                    (1, "Auto-detected based on origin/destination".to_string())
                }
                TriggerType::OrderType => {
                    if !rule.condition.matches_order_type(&trip.order_type) {
                        continue;
                    }
                    (
                        rule.condition.quantity(),
                        format!("Auto-detected for order type: {}", trip.order_type),
                    )
                }
            };

            detected.set(kind, quantity);
            details.push(DetectedEvent {
                event_code: event_type.code.clone(),
                event_name: event_type.name.clone(),
                quantity,
                cost_per_event: event_type.cost_per_event,
                total_cost: event_type.cost_per_event * f64::from(quantity),
                detection_reason: reason,
            });
        }

        DetectionResult {
            detected,
            counts: detected.with_overrides(overrides),
            details,
        }
    }
}

/// Substring heuristic on free-text locations: one side mentions the US and
/// the other Canada. Both strings must be non-empty.
///
/// Known to misfire, e.g. "CA" also matches California and "US" matches any
/// word containing those letters.
pub fn crosses_border(origin: &str, destination: &str) -> bool {
    if origin.trim().is_empty() || destination.trim().is_empty() {
        return false;
    }
    let o = origin.to_uppercase();
    let d = destination.to_uppercase();

    let has_us = |s: &str| US_MARKERS.iter().any(|m| s.contains(m));
    let has_ca = |s: &str| CA_MARKERS.iter().any(|m| s.contains(m));

    (has_us(&o) && has_ca(&d)) || (has_ca(&o) && has_us(&d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::accessorial::TriggerCondition;

    fn event_type(code: &str, name: &str, cost: f64, automatic: bool) -> EventType {
        EventType {
            code: code.into(),
            name: name.into(),
            cost_per_event: cost,
            is_automatic: automatic,
        }
    }

    fn catalog() -> (Vec<EventType>, Vec<EventRule>) {
        let types = vec![
            event_type("BC", "Border Crossing", 15.0, true),
            event_type("DH", "Drop/Hook", 30.0, false),
            event_type("PICKUP", "Pickup Stop", 30.0, true),
            event_type("DELIVERY", "Delivery Stop", 30.0, true),
        ];
        let rules = vec![
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
                condition: TriggerCondition {
                    order_types: vec!["PICKUP".into(), "ROUND_TRIP".into()],
                    count: Some(1),
                },
            },
            EventRule {
                id: 3,
                event_code: "DELIVERY".into(),
                trigger_type: TriggerType::OrderType,
                condition: TriggerCondition {
                    order_types: vec!["DELIVERY".into(), "ROUND_TRIP".into()],
                    count: Some(2),
                },
            },
            EventRule {
                id: 4,
                event_code: "DH".into(),
                trigger_type: TriggerType::OrderType,
                condition: TriggerCondition {
                    order_types: vec!["ROUND_TRIP".into()],
                    count: None,
                },
            },
        ];
        (types, rules)
    }

    fn trip(origin: &str, destination: &str, order_type: &str) -> TripContext {
        TripContext {
            origin: origin.into(),
            destination: destination.into(),
            order_type: order_type.into(),
        }
    }

    #[test]
    fn canada_to_usa_is_a_crossing() {
        assert!(crosses_border("Toronto, CANADA", "Detroit, USA"));
        assert!(crosses_border("Chicago, United States", "Montreal, Canada"));
    }

    #[test]
    fn domestic_trips_do_not_cross() {
        assert!(!crosses_border("Toronto, CANADA", "Ottawa, CANADA"));
        assert!(!crosses_border("", "Detroit, USA"));
    }

    #[test]
    fn california_matches_canadian_marker() {
        // Substring heuristic: "CA" in a state abbreviation reads as Canada.
        assert!(crosses_border("Los Angeles, CA", "Dallas, USA"));
    }

    #[test]
    fn detects_border_crossing_with_detail() {
        let (types, rules) = catalog();
        let detector = EventDetector::new(&types, &rules);

        let result = detector.detect(
            &trip("Toronto, CANADA", "Detroit, USA", "LINEHAUL"),
            &EventOverrides::default(),
        );

        assert_eq!(result.counts.border_crossings, 1);
        assert_eq!(result.details.len(), 1);
        let bc = &result.details[0];
        assert_eq!(bc.event_code, "BC");
        assert_eq!(bc.event_name, "Border Crossing");
        assert_eq!(bc.total_cost, 15.0);
        assert_eq!(bc.detection_reason, "Auto-detected based on origin/destination");
    }

    #[test]
    fn explicit_zero_suppresses_detected_crossing() {
        let (types, rules) = catalog();
        let detector = EventDetector::new(&types, &rules);
        let overrides = EventOverrides {
            border_crossings: Some(0),
            ..Default::default()
        };

        let result = detector.detect(&trip("Toronto, CANADA", "Detroit, USA", "LINEHAUL"), &overrides);

        assert_eq!(result.detected.border_crossings, 1);
        assert_eq!(result.counts.border_crossings, 0);
    }

    #[test]
    fn order_type_rules_use_configured_quantity() {
        let (types, rules) = catalog();
        let detector = EventDetector::new(&types, &rules);

        let result = detector.detect(
            &trip("Toronto, CANADA", "Ottawa, CANADA", "ROUND_TRIP"),
            &EventOverrides::default(),
        );

        assert_eq!(result.counts.pickups, 1);
        assert_eq!(result.counts.deliveries, 2);
        let delivery = result
            .details
            .iter()
            .find(|d| d.event_code == "DELIVERY")
            .unwrap();
        assert_eq!(delivery.total_cost, 60.0);
        assert_eq!(delivery.detection_reason, "Auto-detected for order type: ROUND_TRIP");
    }

    #[test]
    fn manual_event_types_are_never_detected() {
        let (types, rules) = catalog();
        let detector = EventDetector::new(&types, &rules);

        let result = detector.detect(&trip("A", "B", "ROUND_TRIP"), &EventOverrides::default());

        assert_eq!(result.counts.drop_hooks, 0);
        assert!(result.details.iter().all(|d| d.event_code != "DH"));
    }

    #[test]
    fn explicit_counts_apply_without_detection() {
        let (types, rules) = catalog();
        let detector = EventDetector::new(&types, &rules);
        let overrides = EventOverrides {
            drop_hooks: Some(2),
            ..Default::default()
        };

        let result = detector.detect(&trip("A", "B", "LINEHAUL"), &overrides);

        assert_eq!(result.counts.drop_hooks, 2);
        assert!(result.details.is_empty());
    }
}
