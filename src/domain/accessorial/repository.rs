//! Event type and event rule repository interface

use async_trait::async_trait;

use super::model::{EventRule, EventType};
use crate::domain::DomainResult;

#[async_trait]
pub trait AccessorialRepository: Send + Sync {
    async fn find_event_types(&self) -> DomainResult<Vec<EventType>>;
    async fn find_event_rules(&self) -> DomainResult<Vec<EventRule>>;
}
