//! Trip cost repository and the calculation unit of work

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::model::TripCost;
use crate::domain::week_miles::WeekMilesSummary;
use crate::domain::DomainResult;

/// Writes belonging to one calculation, applied atomically.
///
/// Nothing staged through a unit of work is visible to other readers until
/// [`commit`](Self::commit). Dropping it without committing discards every
/// staged write.
#[async_trait]
pub trait CostingUnitOfWork: Send {
    /// Weekly aggregate as seen inside this unit of work. With `lock` set the
    /// row is held until commit or rollback where the backend supports it.
    /// Backends may first insert an empty row for an unseen week; it shows
    /// up as zero miles and disappears on rollback.
    async fn week_miles(
        &mut self,
        unit_number: &str,
        week_start: NaiveDate,
        lock: bool,
    ) -> DomainResult<Option<WeekMilesSummary>>;

    async fn insert_trip_cost(&mut self, cost: &TripCost) -> DomainResult<()>;

    /// Additive upsert: insert `(miles, 1)` or add `miles` and one trip to the
    /// existing row.
    async fn add_week_miles(
        &mut self,
        unit_number: &str,
        week_start: NaiveDate,
        miles: f64,
    ) -> DomainResult<()>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}

#[async_trait]
pub trait TripCostRepository: Send + Sync {
    async fn begin(&self) -> DomainResult<Box<dyn CostingUnitOfWork>>;

    /// Most recent calculation for the order.
    async fn find_latest_by_order(&self, order_id: &str) -> DomainResult<Option<TripCost>>;

    /// Reconcile the most recent calculation for the order in its own
    /// transaction. Returns `None` when the order has never been costed.
    async fn record_actual(
        &self,
        order_id: &str,
        actual_miles: f64,
        actual_cost: f64,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<TripCost>>;

    async fn count(&self) -> DomainResult<u64>;
}
