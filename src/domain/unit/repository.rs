//! Unit repository interface

use async_trait::async_trait;

use super::model::UnitProfile;
use crate::domain::DomainResult;

#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Active unit by unit number; inactive units are treated as absent.
    async fn find_active_by_number(&self, unit_number: &str) -> DomainResult<Option<UnitProfile>>;
    async fn count_active(&self) -> DomainResult<u64>;
}
