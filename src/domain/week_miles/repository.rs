//! Week miles read access outside a calculation

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::WeekMilesSummary;
use crate::domain::DomainResult;

#[async_trait]
pub trait WeekMilesRepository: Send + Sync {
    async fn find(
        &self,
        unit_number: &str,
        week_start: NaiveDate,
    ) -> DomainResult<Option<WeekMilesSummary>>;
}
