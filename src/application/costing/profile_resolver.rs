//! Driver and unit resolution for a calculation

use tracing::debug;

use crate::domain::driver::{DriverProfile, DriverRepository};
use crate::domain::unit::{UnitProfile, UnitRepository};
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct ResolvedProfiles {
    pub driver: DriverProfile,
    /// Absent when no unit number was given or the unit is unknown/inactive.
    pub unit: Option<UnitProfile>,
}

impl ResolvedProfiles {
    /// Unit number the weekly aggregate is keyed by: the resolved unit, else
    /// the unit the driver is normally assigned to.
    pub fn week_bucket_unit(&self) -> Option<&str> {
        self.unit
            .as_ref()
            .map(|u| u.unit_number.as_str())
            .or(self.driver.unit_number.as_deref())
    }
}

/// Read-only lookup of the profiles a calculation needs.
pub struct ProfileResolver<'a> {
    drivers: &'a dyn DriverRepository,
    units: &'a dyn UnitRepository,
}

impl<'a> ProfileResolver<'a> {
    pub fn new(drivers: &'a dyn DriverRepository, units: &'a dyn UnitRepository) -> Self {
        Self { drivers, units }
    }

    /// Driver by id first, then the unit by number, then the unit's assigned
    /// driver if the driver is still unknown.
    pub async fn resolve(
        &self,
        driver_id: Option<&str>,
        unit_number: Option<&str>,
    ) -> DomainResult<ResolvedProfiles> {
        let mut driver = match driver_id {
            Some(id) => self.drivers.find_active(id).await?,
            None => None,
        };

        let unit = match unit_number {
            Some(number) => self.units.find_active_by_number(number).await?,
            None => None,
        };

        if driver.is_none() {
            if let Some(assigned) = unit.as_ref().and_then(|u| u.driver_id.as_deref()) {
                debug!(unit_number, driver_id = assigned, "Resolving driver via unit");
                driver = self.drivers.find_active(assigned).await?;
            }
        }

        match driver {
            Some(driver) => Ok(ResolvedProfiles { driver, unit }),
            None => Err(match (driver_id, unit_number) {
                (Some(id), _) => DomainError::not_found("Driver", "driver_id", id),
                (None, Some(number)) => DomainError::not_found("Driver", "unit_number", number),
                (None, None) => {
                    DomainError::Validation("Either driverId or unitNumber is required".into())
                }
            }),
        }
    }
}
