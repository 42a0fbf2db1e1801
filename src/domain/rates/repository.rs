//! Rate rule repository interface

use async_trait::async_trait;

use super::model::RateRule;
use crate::domain::DomainResult;

#[async_trait]
pub trait RateRepository: Send + Sync {
    /// Rules flagged active. Effective dating is applied by
    /// [`RateTable::from_rules`](super::RateTable::from_rules).
    async fn find_active(&self) -> DomainResult<Vec<RateRule>>;
    /// Every rule, active or not, ordered by key and type.
    async fn find_all(&self) -> DomainResult<Vec<RateRule>>;
}
