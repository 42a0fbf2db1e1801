//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::accessorial::AccessorialRepository;
use crate::domain::driver::DriverRepository;
use crate::domain::rates::RateRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::trip_cost::TripCostRepository;
use crate::domain::unit::UnitRepository;
use crate::domain::week_miles::WeekMilesRepository;

use super::accessorial_repository::SeaOrmAccessorialRepository;
use super::profile_repository::{SeaOrmDriverRepository, SeaOrmUnitRepository};
use super::rate_repository::SeaOrmRateRepository;
use super::trip_cost_repository::SeaOrmTripCostRepository;
use super::week_miles_repository::SeaOrmWeekMilesRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let driver = repos.drivers().find_active("DRV-001").await?;
/// let mut uow = repos.trip_costs().begin().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    drivers: SeaOrmDriverRepository,
    units: SeaOrmUnitRepository,
    rates: SeaOrmRateRepository,
    accessorials: SeaOrmAccessorialRepository,
    trip_costs: SeaOrmTripCostRepository,
    week_miles: SeaOrmWeekMilesRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            drivers: SeaOrmDriverRepository::new(db.clone()),
            units: SeaOrmUnitRepository::new(db.clone()),
            rates: SeaOrmRateRepository::new(db.clone()),
            accessorials: SeaOrmAccessorialRepository::new(db.clone()),
            trip_costs: SeaOrmTripCostRepository::new(db.clone()),
            week_miles: SeaOrmWeekMilesRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn drivers(&self) -> &dyn DriverRepository {
        &self.drivers
    }

    fn units(&self) -> &dyn UnitRepository {
        &self.units
    }

    fn rates(&self) -> &dyn RateRepository {
        &self.rates
    }

    fn accessorials(&self) -> &dyn AccessorialRepository {
        &self.accessorials
    }

    fn trip_costs(&self) -> &dyn TripCostRepository {
        &self.trip_costs
    }

    fn week_miles(&self) -> &dyn WeekMilesRepository {
        &self.week_miles
    }
}
