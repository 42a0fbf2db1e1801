//! Driver repository interface

use async_trait::async_trait;

use super::model::DriverProfile;
use crate::domain::DomainResult;

#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Active driver by id; inactive drivers are treated as absent.
    async fn find_active(&self, driver_id: &str) -> DomainResult<Option<DriverProfile>>;
    async fn count_active(&self) -> DomainResult<u64>;
}
