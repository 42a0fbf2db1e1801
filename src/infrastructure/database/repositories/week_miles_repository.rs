//! SeaORM implementation of WeekMilesRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, EntityTrait};

use super::db_err;
use crate::domain::week_miles::{WeekMilesRepository, WeekMilesSummary};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::week_miles_summary;

pub(super) fn summary_to_domain(m: week_miles_summary::Model) -> WeekMilesSummary {
    WeekMilesSummary {
        unit_number: m.unit_number,
        week_start: m.week_start,
        total_miles: m.total_miles,
        trip_count: u32::try_from(m.trip_count).unwrap_or_default(),
    }
}

pub struct SeaOrmWeekMilesRepository {
    db: DatabaseConnection,
}

impl SeaOrmWeekMilesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WeekMilesRepository for SeaOrmWeekMilesRepository {
    async fn find(
        &self,
        unit_number: &str,
        week_start: NaiveDate,
    ) -> DomainResult<Option<WeekMilesSummary>> {
        let model = week_miles_summary::Entity::find_by_id((unit_number.to_string(), week_start))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(summary_to_domain))
    }
}
