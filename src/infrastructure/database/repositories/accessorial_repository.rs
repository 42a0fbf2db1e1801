//! SeaORM implementation of AccessorialRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::debug;

use super::db_err;
use crate::domain::accessorial::{
    AccessorialRepository, EventRule, EventType, TriggerCondition, TriggerType,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{event_rule, event_type};

fn type_to_domain(m: event_type::Model) -> EventType {
    EventType {
        code: m.event_code,
        name: m.event_name,
        cost_per_event: m.cost_per_event,
        is_automatic: m.is_automatic,
    }
}

/// Rules with an unknown trigger type or an unreadable condition are skipped.
fn rule_to_domain(m: event_rule::Model) -> Option<EventRule> {
    let trigger_type = match m.trigger_type.parse::<TriggerType>() {
        Ok(t) => t,
        Err(e) => {
            debug!(rule_id = m.id, error = %e, "Skipping event rule");
            return None;
        }
    };

    let condition = if m.trigger_condition.trim().is_empty() {
        TriggerCondition::default()
    } else {
        match serde_json::from_str::<TriggerCondition>(&m.trigger_condition) {
            Ok(c) => c,
            Err(e) => {
                debug!(rule_id = m.id, error = %e, "Skipping event rule with bad condition");
                return None;
            }
        }
    };

    Some(EventRule {
        id: m.id,
        event_code: m.event_code,
        trigger_type,
        condition,
    })
}

pub struct SeaOrmAccessorialRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccessorialRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccessorialRepository for SeaOrmAccessorialRepository {
    async fn find_event_types(&self) -> DomainResult<Vec<EventType>> {
        let models = event_type::Entity::find()
            .order_by_asc(event_type::Column::EventCode)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(type_to_domain).collect())
    }

    async fn find_event_rules(&self) -> DomainResult<Vec<EventRule>> {
        let models = event_rule::Entity::find()
            .order_by_asc(event_rule::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().filter_map(rule_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(trigger_type: &str, condition: &str) -> event_rule::Model {
        event_rule::Model {
            id: 7,
            event_code: "PICKUP".into(),
            trigger_type: trigger_type.into(),
            trigger_condition: condition.into(),
        }
    }

    #[test]
    fn parses_order_type_condition() {
        let rule = rule_to_domain(model("ORDER_TYPE", r#"{"order_types":["FTL"],"count":2}"#)).unwrap();
        assert_eq!(rule.trigger_type, TriggerType::OrderType);
        assert_eq!(rule.condition.order_types, vec!["FTL".to_string()]);
        assert_eq!(rule.condition.quantity(), 2);
    }

    #[test]
    fn empty_condition_defaults() {
        let rule = rule_to_domain(model("BORDER_CROSSING", "")).unwrap();
        assert_eq!(rule.condition, TriggerCondition::default());
    }

    #[test]
    fn unknown_trigger_is_skipped() {
        assert!(rule_to_domain(model("WEATHER", "{}")).is_none());
        assert!(rule_to_domain(model("ORDER_TYPE", "not json")).is_none());
    }
}
