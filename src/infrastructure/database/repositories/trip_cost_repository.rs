//! SeaORM implementation of TripCostRepository and its unit of work

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{debug, warn};

use super::db_err;
use super::week_miles_repository::summary_to_domain;
use crate::domain::accessorial::EventCounts;
use crate::domain::driver::OoZone;
use crate::domain::trip_cost::{
    ActualCost, CostingUnitOfWork, MarginAnalysis, TripCost, TripCostRepository,
};
use crate::domain::week_miles::WeekMilesSummary;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{trip_cost, week_miles_summary};

// ── Conversion helpers ──────────────────────────────────────────

fn count_to_db(n: u32) -> DomainResult<i32> {
    i32::try_from(n)
        .map_err(|_| DomainError::Validation(format!("event count {} is out of range", n)))
}

fn count_from_db(n: i32) -> u32 {
    u32::try_from(n).unwrap_or_default()
}

fn domain_to_active(cost: &TripCost) -> DomainResult<trip_cost::ActiveModel> {
    let formula = serde_json::to_string(&cost.calculation_formula)
        .map_err(|e| DomainError::Persistence(format!("Unserializable calculation trace: {}", e)))?;
    let margin = cost.margin.as_ref();
    let actual = cost.actual.as_ref();

    Ok(trip_cost::ActiveModel {
        id: NotSet,
        cost_id: Set(cost.id.clone()),
        trip_id: Set(cost.trip_id.clone()),
        order_id: Set(cost.order_id.clone()),
        driver_id: Set(cost.driver_id.clone()),
        unit_id: Set(cost.unit_id.clone()),
        driver_type: Set(cost.driver_type.into()),
        oo_zone: Set(cost.oo_zone.map(|z| z.code().to_string())),
        miles: Set(cost.miles),
        direction: Set(cost.direction.into()),
        is_round_trip: Set(cost.is_round_trip),
        week_start: Set(cost.week_start),
        border_crossings: Set(count_to_db(cost.events.border_crossings)?),
        drop_hooks: Set(count_to_db(cost.events.drop_hooks)?),
        pickups: Set(count_to_db(cost.events.pickups)?),
        deliveries: Set(count_to_db(cost.events.deliveries)?),
        fixed_cpm: Set(cost.fixed_cpm),
        wage_cpm: Set(cost.wage_cpm),
        rolling_cpm: Set(cost.rolling_cpm),
        accessorial_cpm: Set(cost.accessorial_cpm),
        total_cpm: Set(cost.total_cpm),
        total_cost: Set(cost.total_cost),
        revenue: Set(margin.map(|m| m.revenue)),
        rpm: Set(margin.map(|m| m.rpm)),
        ppm: Set(margin.map(|m| m.ppm)),
        profit: Set(margin.map(|m| m.profit)),
        margin_pct: Set(margin.map(|m| m.margin_pct)),
        is_profitable: Set(margin.map(|m| m.is_profitable)),
        calculation_formula: Set(formula),
        calculated_at: Set(cost.calculated_at),
        actual_miles: Set(actual.map(|a| a.actual_miles)),
        actual_cost: Set(actual.map(|a| a.actual_cost)),
        variance: Set(actual.map(|a| a.variance)),
        variance_pct: Set(actual.map(|a| a.variance_pct)),
        updated_at: Set(cost.updated_at),
    })
}

fn entity_to_domain(m: trip_cost::Model) -> TripCost {
    let calculation_formula = serde_json::from_str(&m.calculation_formula).unwrap_or_else(|e| {
        warn!(cost_id = %m.cost_id, error = %e, "Unreadable calculation trace");
        serde_json::Value::Null
    });

    let margin = match (m.revenue, m.rpm, m.ppm, m.profit, m.margin_pct, m.is_profitable) {
        (Some(revenue), Some(rpm), Some(ppm), Some(profit), Some(margin_pct), Some(is_profitable)) => {
            Some(MarginAnalysis {
                revenue,
                rpm,
                ppm,
                profit,
                margin_pct,
                is_profitable,
                break_even_rpm: m.total_cpm,
            })
        }
        _ => None,
    };

    let actual = match (m.actual_miles, m.actual_cost) {
        (Some(actual_miles), Some(actual_cost)) => Some(ActualCost {
            actual_miles,
            actual_cost,
            variance: m.variance.unwrap_or(actual_cost - m.total_cost),
            variance_pct: m.variance_pct.unwrap_or_default(),
        }),
        _ => None,
    };

    TripCost {
        id: m.cost_id,
        trip_id: m.trip_id,
        order_id: m.order_id,
        driver_id: m.driver_id,
        unit_id: m.unit_id,
        driver_type: m.driver_type.into(),
        oo_zone: m.oo_zone.as_deref().and_then(|z| z.parse::<OoZone>().ok()),
        miles: m.miles,
        direction: m.direction.into(),
        is_round_trip: m.is_round_trip,
        week_start: m.week_start,
        events: EventCounts {
            border_crossings: count_from_db(m.border_crossings),
            drop_hooks: count_from_db(m.drop_hooks),
            pickups: count_from_db(m.pickups),
            deliveries: count_from_db(m.deliveries),
        },
        fixed_cpm: m.fixed_cpm,
        wage_cpm: m.wage_cpm,
        rolling_cpm: m.rolling_cpm,
        accessorial_cpm: m.accessorial_cpm,
        total_cpm: m.total_cpm,
        total_cost: m.total_cost,
        margin,
        calculation_formula,
        calculated_at: m.calculated_at,
        actual,
        updated_at: m.updated_at,
    }
}

fn latest_for_order(order_id: &str) -> sea_orm::Select<trip_cost::Entity> {
    trip_cost::Entity::find()
        .filter(trip_cost::Column::OrderId.eq(order_id))
        .order_by_desc(trip_cost::Column::Id)
}

// ── SeaOrmTripCostRepository ────────────────────────────────────

pub struct SeaOrmTripCostRepository {
    db: DatabaseConnection,
}

impl SeaOrmTripCostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TripCostRepository for SeaOrmTripCostRepository {
    async fn begin(&self) -> DomainResult<Box<dyn CostingUnitOfWork>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmUnitOfWork { txn }))
    }

    async fn find_latest_by_order(&self, order_id: &str) -> DomainResult<Option<TripCost>> {
        let model = latest_for_order(order_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn record_actual(
        &self,
        order_id: &str,
        actual_miles: f64,
        actual_cost: f64,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<TripCost>> {
        let Some(model) = latest_for_order(order_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut cost = entity_to_domain(model.clone());
        cost.record_actual(actual_miles, actual_cost, now);
        let Some(actual) = cost.actual else {
            return Ok(None);
        };

        // Single-row update: the estimate it reconciles against never changes,
        // so concurrent writers simply leave the last actuals in place.
        let mut active: trip_cost::ActiveModel = model.into();
        active.actual_miles = Set(Some(actual.actual_miles));
        active.actual_cost = Set(Some(actual.actual_cost));
        active.variance = Set(Some(actual.variance));
        active.variance_pct = Set(Some(actual.variance_pct));
        active.updated_at = Set(now);
        active.update(&self.db).await.map_err(db_err)?;

        debug!(order_id, cost_id = %cost.id, "Recorded actual cost");
        Ok(Some(cost))
    }

    async fn count(&self) -> DomainResult<u64> {
        trip_cost::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

// ── SeaOrmUnitOfWork ────────────────────────────────────────────

/// One database transaction spanning the aggregate read, the trip cost
/// insert and the aggregate upsert.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

impl SeaOrmUnitOfWork {
    /// Insert an empty aggregate row unless one exists. The additive upsert
    /// later fills it; a rollback removes it.
    async fn claim_week_row(&self, unit_number: &str, week_start: NaiveDate) -> DomainResult<()> {
        use week_miles_summary::{Column, Entity};

        let row = week_miles_summary::ActiveModel {
            unit_number: Set(unit_number.to_string()),
            week_start: Set(week_start),
            total_miles: Set(0.0),
            trip_count: Set(0),
        };
        Entity::insert(row)
            .on_conflict(
                OnConflict::columns([Column::UnitNumber, Column::WeekStart])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl CostingUnitOfWork for SeaOrmUnitOfWork {
    async fn week_miles(
        &mut self,
        unit_number: &str,
        week_start: NaiveDate,
        lock: bool,
    ) -> DomainResult<Option<WeekMilesSummary>> {
        let sqlite = self.txn.get_database_backend() == DbBackend::Sqlite;
        // SQLite: writing first takes the database write lock under the busy
        // timeout; a read-then-write transaction fails with SQLITE_BUSY instead.
        // Elsewhere the claimed row gives FOR UPDATE something to lock on the
        // first trip of a week.
        if sqlite || lock {
            self.claim_week_row(unit_number, week_start).await?;
        }

        let mut query =
            week_miles_summary::Entity::find_by_id((unit_number.to_string(), week_start));
        if lock && !sqlite {
            query = query.lock_exclusive();
        }
        let model = query.one(&self.txn).await.map_err(db_err)?;
        Ok(model.map(summary_to_domain))
    }

    async fn insert_trip_cost(&mut self, cost: &TripCost) -> DomainResult<()> {
        domain_to_active(cost)?
            .insert(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn add_week_miles(
        &mut self,
        unit_number: &str,
        week_start: NaiveDate,
        miles: f64,
    ) -> DomainResult<()> {
        use week_miles_summary::{Column, Entity};

        let row = week_miles_summary::ActiveModel {
            unit_number: Set(unit_number.to_string()),
            week_start: Set(week_start),
            total_miles: Set(miles),
            trip_count: Set(1),
        };

        Entity::insert(row)
            .on_conflict(
                OnConflict::columns([Column::UnitNumber, Column::WeekStart])
                    .value(Column::TotalMiles, Expr::col((Entity, Column::TotalMiles)).add(miles))
                    .value(Column::TripCount, Expr::col((Entity, Column::TripCount)).add(1))
                    .to_owned(),
            )
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let uow = *self;
        uow.txn.commit().await.map_err(db_err)
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        let uow = *self;
        uow.txn.rollback().await.map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::week_miles::WeekMilesRepository;
    use crate::infrastructure::database::migrator::{Migrator, MigratorTrait};
    use crate::infrastructure::database::repositories::week_miles_repository::SeaOrmWeekMilesRepository;
    use crate::infrastructure::{init_database, DatabaseConfig};

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    async fn db() -> DatabaseConnection {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn unseen_week_reads_as_empty_row_and_rolls_back() {
        let db = db().await;
        let repo = SeaOrmTripCostRepository::new(db.clone());

        let mut uow = repo.begin().await.unwrap();
        let seen = uow.week_miles("T-1", week(), true).await.unwrap().unwrap();
        assert_eq!(seen.total_miles, 0.0);
        assert_eq!(seen.trip_count, 0);
        uow.rollback().await.unwrap();

        let stored = SeaOrmWeekMilesRepository::new(db).find("T-1", week()).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn claimed_row_is_filled_by_additive_upsert() {
        let db = db().await;
        let repo = SeaOrmTripCostRepository::new(db.clone());

        for miles in [120.0, 80.0] {
            let mut uow = repo.begin().await.unwrap();
            uow.week_miles("T-1", week(), false).await.unwrap();
            uow.add_week_miles("T-1", week(), miles).await.unwrap();
            uow.commit().await.unwrap();
        }

        let stored = SeaOrmWeekMilesRepository::new(db)
            .find("T-1", week())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_miles, 200.0);
        assert_eq!(stored.trip_count, 2);
    }

    #[test]
    fn counts_beyond_column_range_are_rejected() {
        assert_eq!(count_to_db(1000).unwrap(), 1000);
        assert!(matches!(count_to_db(u32::MAX), Err(DomainError::Validation(_))));
    }
}
