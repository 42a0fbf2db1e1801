//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod accessorial_repository;
pub mod profile_repository;
pub mod rate_repository;
pub mod repository_provider;
pub mod trip_cost_repository;
pub mod week_miles_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::domain::DomainError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Persistence(format!("Database error: {}", e))
}
