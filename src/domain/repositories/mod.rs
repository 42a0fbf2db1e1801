//! Repository access for the domain layer
//!
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::accessorial::AccessorialRepository;
use super::driver::DriverRepository;
use super::rates::RateRepository;
use super::trip_cost::TripCostRepository;
use super::unit::UnitRepository;
use super::week_miles::WeekMilesRepository;
use crate::support::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let driver = repos.drivers().find_active("DRV-001").await?;
///     let rules = repos.rates().find_active().await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn drivers(&self) -> &dyn DriverRepository;
    fn units(&self) -> &dyn UnitRepository;
    fn rates(&self) -> &dyn RateRepository;
    fn accessorials(&self) -> &dyn AccessorialRepository;
    fn trip_costs(&self) -> &dyn TripCostRepository;
    fn week_miles(&self) -> &dyn WeekMilesRepository;
}
