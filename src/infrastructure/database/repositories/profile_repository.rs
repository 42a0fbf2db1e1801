//! SeaORM implementations of DriverRepository and UnitRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::warn;

use super::db_err;
use crate::domain::driver::{DriverProfile, DriverRepository, OoZone};
use crate::domain::unit::{UnitProfile, UnitRepository, WeeklyFixedCosts};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{driver_profile, unit_profile};

// ── Conversion helpers ──────────────────────────────────────────

fn driver_to_domain(m: driver_profile::Model) -> DriverProfile {
    let oo_zone = m.oo_zone.as_deref().and_then(|z| match z.parse::<OoZone>() {
        Ok(zone) => Some(zone),
        Err(e) => {
            warn!(driver_id = %m.driver_id, error = %e, "Ignoring unreadable OO zone");
            None
        }
    });

    DriverProfile {
        id: m.driver_id,
        name: m.driver_name,
        driver_type: m.driver_type.into(),
        oo_zone,
        unit_number: m.unit_number,
        is_active: m.is_active,
    }
}

fn unit_to_domain(m: unit_profile::Model) -> UnitProfile {
    UnitProfile {
        id: m.unit_id,
        unit_number: m.unit_number,
        driver_id: m.driver_id,
        weekly_costs: WeeklyFixedCosts {
            truck: m.truck_weekly_cost,
            trailer: m.trailer_weekly_cost,
            insurance: m.insurance_weekly_cost,
            telematics: m.telematics_weekly_cost,
            permits: m.permits_weekly_cost,
            sga: m.sga_weekly_cost,
            misc: m.misc_weekly_cost,
        },
        is_active: m.is_active,
    }
}

// ── SeaOrmDriverRepository ──────────────────────────────────────

pub struct SeaOrmDriverRepository {
    db: DatabaseConnection,
}

impl SeaOrmDriverRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DriverRepository for SeaOrmDriverRepository {
    async fn find_active(&self, driver_id: &str) -> DomainResult<Option<DriverProfile>> {
        let model = driver_profile::Entity::find_by_id(driver_id.to_string())
            .filter(driver_profile::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(driver_to_domain))
    }

    async fn count_active(&self) -> DomainResult<u64> {
        driver_profile::Entity::find()
            .filter(driver_profile::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

// ── SeaOrmUnitRepository ────────────────────────────────────────

pub struct SeaOrmUnitRepository {
    db: DatabaseConnection,
}

impl SeaOrmUnitRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitRepository for SeaOrmUnitRepository {
    async fn find_active_by_number(&self, unit_number: &str) -> DomainResult<Option<UnitProfile>> {
        let model = unit_profile::Entity::find()
            .filter(unit_profile::Column::UnitNumber.eq(unit_number))
            .filter(unit_profile::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(unit_to_domain))
    }

    async fn count_active(&self) -> DomainResult<u64> {
        unit_profile::Entity::find()
            .filter(unit_profile::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
