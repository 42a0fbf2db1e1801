//! SeaORM implementation of RateRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::db_err;
use crate::domain::rates::{RateRepository, RateRule};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::costing_rule;

fn rule_to_domain(m: costing_rule::Model) -> RateRule {
    RateRule {
        id: m.id,
        rule_key: m.rule_key,
        rule_type: m.rule_type,
        value: m.rule_value,
        description: m.description,
        effective_date: m.effective_date,
        is_active: m.is_active,
    }
}

pub struct SeaOrmRateRepository {
    db: DatabaseConnection,
}

impl SeaOrmRateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RateRepository for SeaOrmRateRepository {
    async fn find_active(&self) -> DomainResult<Vec<RateRule>> {
        let models = costing_rule::Entity::find()
            .filter(costing_rule::Column::IsActive.eq(true))
            .order_by_asc(costing_rule::Column::EffectiveDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(rule_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<RateRule>> {
        let models = costing_rule::Entity::find()
            .order_by_asc(costing_rule::Column::RuleKey)
            .order_by_asc(costing_rule::Column::RuleType)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(rule_to_domain).collect())
    }
}
