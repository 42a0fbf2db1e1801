//! Read-only views over the costing configuration

use std::sync::Arc;

use chrono::Utc;

use crate::domain::accessorial::{EventRule, EventType};
use crate::domain::rates::RateRule;
use crate::domain::{DomainResult, RepositoryProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostingSummary {
    /// Rules that would apply to a calculation made now
    pub effective_rules: u64,
    pub active_drivers: u64,
    pub active_units: u64,
    pub event_types: u64,
    pub cost_calculations: u64,
}

pub struct MetadataService {
    repos: Arc<dyn RepositoryProvider>,
}

impl MetadataService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn rate_rules(&self) -> DomainResult<Vec<RateRule>> {
        self.repos.rates().find_all().await
    }

    pub async fn event_catalog(&self) -> DomainResult<(Vec<EventType>, Vec<EventRule>)> {
        let types = self.repos.accessorials().find_event_types().await?;
        let rules = self.repos.accessorials().find_event_rules().await?;
        Ok((types, rules))
    }

    pub async fn summary(&self) -> DomainResult<CostingSummary> {
        let now = Utc::now();
        let effective_rules = self
            .repos
            .rates()
            .find_active()
            .await?
            .iter()
            .filter(|r| r.is_effective(now))
            .count() as u64;

        Ok(CostingSummary {
            effective_rules,
            active_drivers: self.repos.drivers().count_active().await?,
            active_units: self.repos.units().count_active().await?,
            event_types: self.repos.accessorials().find_event_types().await?.len() as u64,
            cost_calculations: self.repos.trip_costs().count().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::seed;
    use crate::infrastructure::storage::InMemoryRepositories;

    #[tokio::test]
    async fn summary_counts_seeded_configuration() {
        let repos = InMemoryRepositories::with_defaults();
        for driver in seed::demo_drivers() {
            repos.add_driver(driver);
        }
        let mut retired = seed::default_rate_rules().remove(0);
        retired.id = 999;
        retired.is_active = false;
        repos.add_rate(retired);

        let svc = MetadataService::new(Arc::new(repos));
        let summary = svc.summary().await.unwrap();

        assert_eq!(summary.effective_rules, seed::default_rate_rules().len() as u64);
        assert_eq!(summary.active_drivers, 3);
        assert_eq!(summary.active_units, 0);
        assert_eq!(summary.event_types, 4);
        assert_eq!(summary.cost_calculations, 0);

        let all = svc.rate_rules().await.unwrap();
        assert_eq!(all.len(), seed::default_rate_rules().len() + 1);
    }
}
