//! In-memory repositories for development and testing
//!
//! Writes made through a [`CostingUnitOfWork`] are staged and only applied on
//! commit, so rollback behaviour matches the database-backed provider.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;

use crate::domain::accessorial::{AccessorialRepository, EventRule, EventType};
use crate::domain::driver::{DriverProfile, DriverRepository};
use crate::domain::rates::{RateRepository, RateRule};
use crate::domain::trip_cost::{CostingUnitOfWork, TripCost, TripCostRepository};
use crate::domain::unit::{UnitProfile, UnitRepository};
use crate::domain::week_miles::{WeekMilesRepository, WeekMilesSummary};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::seed;

type WeekKey = (String, NaiveDate);

#[derive(Default)]
struct MemoryState {
    drivers: DashMap<String, DriverProfile>,
    units: DashMap<String, UnitProfile>,
    rates: DashMap<i32, RateRule>,
    event_types: DashMap<String, EventType>,
    event_rules: DashMap<i32, EventRule>,
    /// Trip costs keyed by id, with an insertion sequence for "most recent"
    trip_costs: DashMap<String, (u64, TripCost)>,
    week_miles: DashMap<WeekKey, WeekMilesSummary>,
    sequence: AtomicU64,
    fail_inserts: AtomicBool,
    fail_week_miles: AtomicBool,
}

/// In-memory [`RepositoryProvider`]
#[derive(Clone, Default)]
pub struct InMemoryRepositories {
    state: Arc<MemoryState>,
}

impl InMemoryRepositories {
    /// Empty store: no rates, no event catalog, no master data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the shipped rate rules and event catalog.
    pub fn with_defaults() -> Self {
        let repos = Self::new();
        for rule in seed::default_rate_rules() {
            repos.add_rate(rule);
        }
        for event_type in seed::default_event_types() {
            repos.add_event_type(event_type);
        }
        for rule in seed::default_event_rules() {
            repos.add_event_rule(rule);
        }
        repos
    }

    pub fn add_driver(&self, driver: DriverProfile) {
        self.state.drivers.insert(driver.id.clone(), driver);
    }

    pub fn add_unit(&self, unit: UnitProfile) {
        self.state.units.insert(unit.unit_number.clone(), unit);
    }

    pub fn add_rate(&self, rule: RateRule) {
        self.state.rates.insert(rule.id, rule);
    }

    pub fn add_event_type(&self, event_type: EventType) {
        self.state
            .event_types
            .insert(event_type.code.clone(), event_type);
    }

    pub fn add_event_rule(&self, rule: EventRule) {
        self.state.event_rules.insert(rule.id, rule);
    }

    /// Make every staged trip cost insert fail.
    pub fn fail_trip_cost_inserts(&self, fail: bool) {
        self.state.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make every staged weekly aggregate upsert fail.
    pub fn fail_week_miles_upserts(&self, fail: bool) {
        self.state.fail_week_miles.store(fail, Ordering::SeqCst);
    }

    pub fn trip_cost_count(&self) -> usize {
        self.state.trip_costs.len()
    }

    fn latest_for_order(&self, order_id: &str) -> Option<String> {
        self.state
            .trip_costs
            .iter()
            .filter(|e| e.value().1.order_id == order_id)
            .max_by_key(|e| e.value().0)
            .map(|e| e.key().clone())
    }
}

#[async_trait]
impl DriverRepository for InMemoryRepositories {
    async fn find_active(&self, driver_id: &str) -> DomainResult<Option<DriverProfile>> {
        Ok(self
            .state
            .drivers
            .get(driver_id)
            .filter(|d| d.is_active)
            .map(|d| d.clone()))
    }

    async fn count_active(&self) -> DomainResult<u64> {
        Ok(self.state.drivers.iter().filter(|d| d.is_active).count() as u64)
    }
}

#[async_trait]
impl UnitRepository for InMemoryRepositories {
    async fn find_active_by_number(&self, unit_number: &str) -> DomainResult<Option<UnitProfile>> {
        Ok(self
            .state
            .units
            .get(unit_number)
            .filter(|u| u.is_active)
            .map(|u| u.clone()))
    }

    async fn count_active(&self) -> DomainResult<u64> {
        Ok(self.state.units.iter().filter(|u| u.is_active).count() as u64)
    }
}

#[async_trait]
impl RateRepository for InMemoryRepositories {
    async fn find_active(&self) -> DomainResult<Vec<RateRule>> {
        Ok(self
            .state
            .rates
            .iter()
            .filter(|r| r.is_active)
            .map(|r| r.clone())
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<RateRule>> {
        let mut rules: Vec<RateRule> = self.state.rates.iter().map(|r| r.clone()).collect();
        rules.sort_by(|a, b| {
            (a.rule_key.as_str(), a.rule_type.as_str()).cmp(&(b.rule_key.as_str(), b.rule_type.as_str()))
        });
        Ok(rules)
    }
}

#[async_trait]
impl AccessorialRepository for InMemoryRepositories {
    async fn find_event_types(&self) -> DomainResult<Vec<EventType>> {
        let mut types: Vec<EventType> = self.state.event_types.iter().map(|t| t.clone()).collect();
        types.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(types)
    }

    async fn find_event_rules(&self) -> DomainResult<Vec<EventRule>> {
        let mut rules: Vec<EventRule> = self.state.event_rules.iter().map(|r| r.clone()).collect();
        rules.sort_by_key(|r| r.id);
        Ok(rules)
    }
}

#[async_trait]
impl WeekMilesRepository for InMemoryRepositories {
    async fn find(
        &self,
        unit_number: &str,
        week_start: NaiveDate,
    ) -> DomainResult<Option<WeekMilesSummary>> {
        Ok(self
            .state
            .week_miles
            .get(&(unit_number.to_string(), week_start))
            .map(|s| s.clone()))
    }
}

#[async_trait]
impl TripCostRepository for InMemoryRepositories {
    async fn begin(&self) -> DomainResult<Box<dyn CostingUnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            state: self.state.clone(),
            staged_costs: Vec::new(),
            staged_miles: Vec::new(),
        }))
    }

    async fn find_latest_by_order(&self, order_id: &str) -> DomainResult<Option<TripCost>> {
        Ok(self
            .latest_for_order(order_id)
            .and_then(|id| self.state.trip_costs.get(&id).map(|e| e.1.clone())))
    }

    async fn record_actual(
        &self,
        order_id: &str,
        actual_miles: f64,
        actual_cost: f64,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<TripCost>> {
        let Some(id) = self.latest_for_order(order_id) else {
            return Ok(None);
        };
        Ok(self.state.trip_costs.get_mut(&id).map(|mut entry| {
            entry.1.record_actual(actual_miles, actual_cost, now);
            entry.1.clone()
        }))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.state.trip_costs.len() as u64)
    }
}

impl RepositoryProvider for InMemoryRepositories {
    fn drivers(&self) -> &dyn DriverRepository {
        self
    }

    fn units(&self) -> &dyn UnitRepository {
        self
    }

    fn rates(&self) -> &dyn RateRepository {
        self
    }

    fn accessorials(&self) -> &dyn AccessorialRepository {
        self
    }

    fn trip_costs(&self) -> &dyn TripCostRepository {
        self
    }

    fn week_miles(&self) -> &dyn WeekMilesRepository {
        self
    }
}

struct MemoryUnitOfWork {
    state: Arc<MemoryState>,
    staged_costs: Vec<TripCost>,
    staged_miles: Vec<(WeekKey, f64)>,
}

#[async_trait]
impl CostingUnitOfWork for MemoryUnitOfWork {
    /// No row locks here: commits add their miles under the map entry lock.
    async fn week_miles(
        &mut self,
        unit_number: &str,
        week_start: NaiveDate,
        _lock: bool,
    ) -> DomainResult<Option<WeekMilesSummary>> {
        let key = (unit_number.to_string(), week_start);
        let mut summary = self.state.week_miles.get(&key).map(|s| s.clone());
        for (_, miles) in self.staged_miles.iter().filter(|(k, _)| *k == key) {
            summary
                .get_or_insert_with(|| WeekMilesSummary::empty(unit_number, week_start))
                .add_trip(*miles);
        }
        Ok(summary)
    }

    async fn insert_trip_cost(&mut self, cost: &TripCost) -> DomainResult<()> {
        if self.state.fail_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("trip cost insert failed".into()));
        }
        self.staged_costs.push(cost.clone());
        Ok(())
    }

    async fn add_week_miles(
        &mut self,
        unit_number: &str,
        week_start: NaiveDate,
        miles: f64,
    ) -> DomainResult<()> {
        if self.state.fail_week_miles.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("week miles upsert failed".into()));
        }
        self.staged_miles
            .push(((unit_number.to_string(), week_start), miles));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let MemoryUnitOfWork {
            state,
            staged_costs,
            staged_miles,
        } = *self;

        for cost in staged_costs {
            let seq = state.sequence.fetch_add(1, Ordering::SeqCst);
            state.trip_costs.insert(cost.id.clone(), (seq, cost));
        }
        for ((unit_number, week_start), miles) in staged_miles {
            state
                .week_miles
                .entry((unit_number.clone(), week_start))
                .or_insert_with(|| WeekMilesSummary::empty(unit_number, week_start))
                .add_trip(miles);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        Ok(())
    }
}
