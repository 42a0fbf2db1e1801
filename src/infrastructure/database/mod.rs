pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmRepositoryProvider;

use std::time::Duration;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, Set};
use tracing::info;

use crate::infrastructure::database::entities::{driver_profile, unit_profile};
use crate::infrastructure::seed;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./trip_costing.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./trip_costing.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 8,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Default::default()
        }
    }

    /// Private in-memory SQLite database. A single pooled connection keeps
    /// every query on the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Insert the demo drivers and units. Rows that already exist are left
/// untouched; returns the number of rows written.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let now = Utc::now();
    let mut written = 0;

    for driver in seed::demo_drivers() {
        let row = driver_profile::ActiveModel {
            driver_id: Set(driver.id),
            driver_name: Set(driver.name),
            driver_type: Set(driver.driver_type.into()),
            oo_zone: Set(driver.oo_zone.map(|z| z.code().to_string())),
            unit_number: Set(driver.unit_number),
            is_active: Set(driver.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        written += driver_profile::Entity::insert(row)
            .on_conflict(
                OnConflict::column(driver_profile::Column::DriverId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    for unit in seed::demo_units() {
        let costs = unit.weekly_costs;
        let row = unit_profile::ActiveModel {
            unit_id: Set(unit.id),
            unit_number: Set(unit.unit_number),
            driver_id: Set(unit.driver_id),
            truck_weekly_cost: Set(costs.truck),
            trailer_weekly_cost: Set(costs.trailer),
            insurance_weekly_cost: Set(costs.insurance),
            telematics_weekly_cost: Set(costs.telematics),
            permits_weekly_cost: Set(costs.permits),
            sga_weekly_cost: Set(costs.sga),
            misc_weekly_cost: Set(costs.misc),
            is_active: Set(unit.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        written += unit_profile::Entity::insert(row)
            .on_conflict(
                OnConflict::column(unit_profile::Column::UnitId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    info!(rows = written, "Demo drivers and units seeded");
    Ok(written)
}
