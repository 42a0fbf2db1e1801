//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_driver_profiles;
mod m20240101_000002_create_unit_profiles;
mod m20240101_000003_create_costing_rules;
mod m20240101_000004_create_event_catalog;
mod m20240101_000005_create_trip_costs;
mod m20240101_000006_create_week_miles_summary;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_driver_profiles::Migration),
            Box::new(m20240101_000002_create_unit_profiles::Migration),
            Box::new(m20240101_000003_create_costing_rules::Migration),
            Box::new(m20240101_000004_create_event_catalog::Migration),
            Box::new(m20240101_000005_create_trip_costs::Migration),
            Box::new(m20240101_000006_create_week_miles_summary::Migration),
        ]
    }
}
