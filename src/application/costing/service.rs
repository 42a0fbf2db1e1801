//! Costing service: orchestrates a trip cost calculation end to end
//!
//! resolve profiles → week bucket → load rates → detect events →
//! (transaction: read week miles → breakdown → insert record → add week
//! miles) → commit → publish.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use super::calculator::BreakdownCalculator;
use super::event_detector::{DetectionResult, EventDetector};
use super::profile_resolver::{ProfileResolver, ResolvedProfiles};
use crate::application::events::SharedPublisher;
use crate::domain::accessorial::{
    DetectedEvent, EventOverrides, TripContext, MAX_EVENT_OVERRIDE,
};
use crate::domain::events::{CostActualEvent, CostCalculatedEvent, CostEvent};
use crate::domain::rates::RateTable;
use crate::domain::trip_cost::{
    CostBreakdown, CostingUnitOfWork, Direction, MarginAnalysis, PricingSuggestions, TripCost,
};
use crate::domain::week_miles::{week_start_of, WeekMilesSummary};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Input of a single cost calculation
#[derive(Debug, Clone)]
pub struct CalculateCost {
    pub order_id: String,
    pub trip_id: Option<String>,
    pub driver_id: Option<String>,
    pub unit_number: Option<String>,
    pub miles: f64,
    pub direction: Direction,
    pub is_round_trip: bool,
    pub order_type: String,
    pub origin: String,
    pub destination: String,
    pub revenue: Option<f64>,
    /// Any day of the target week; normalized to its Sunday
    pub week_start: Option<NaiveDate>,
    pub overrides: EventOverrides,
}

impl CalculateCost {
    fn validate(&self) -> DomainResult<()> {
        if self.order_id.trim().is_empty() {
            return Err(DomainError::Validation("orderId is required".into()));
        }
        if !self.miles.is_finite() || self.miles <= 0.0 {
            return Err(DomainError::Validation("miles must be greater than 0".into()));
        }
        if blank(&self.driver_id) && blank(&self.unit_number) {
            return Err(DomainError::Validation(
                "Either driverId or unitNumber is required".into(),
            ));
        }
        if matches!(self.revenue, Some(r) if !r.is_finite()) {
            return Err(DomainError::Validation("revenue must be a finite number".into()));
        }
        if let Some(kind) = self.overrides.out_of_range() {
            return Err(DomainError::Validation(format!(
                "{} count must be at most {}",
                kind.code(),
                MAX_EVENT_OVERRIDE
            )));
        }
        Ok(())
    }

    fn trip_context(&self) -> TripContext {
        TripContext {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            order_type: self.order_type.clone(),
        }
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Result of a committed calculation
#[derive(Debug, Clone)]
pub struct CostCalculation {
    pub trip_cost: TripCost,
    pub breakdown: CostBreakdown,
    pub margin: Option<MarginAnalysis>,
    pub pricing: Option<PricingSuggestions>,
    pub auto_detected_events: Vec<DetectedEvent>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CostingOptions {
    /// Lock the weekly aggregate row before reading it so each calculation
    /// sees every earlier commit for its week. A missing row is inserted
    /// empty first so the first trips of a week lock too. Without it the
    /// aggregate itself stays exact but concurrent calculations may see a
    /// slightly stale weekly total. SQLite always serializes these writers.
    pub lock_week_miles: bool,
}

pub struct CostingService {
    repos: Arc<dyn RepositoryProvider>,
    publisher: SharedPublisher,
    options: CostingOptions,
}

impl CostingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        publisher: SharedPublisher,
        options: CostingOptions,
    ) -> Self {
        Self {
            repos,
            publisher,
            options,
        }
    }

    pub async fn calculate_cost(&self, request: CalculateCost) -> DomainResult<CostCalculation> {
        request.validate()?;

        let profiles = ProfileResolver::new(self.repos.drivers(), self.repos.units())
            .resolve(non_blank(&request.driver_id), non_blank(&request.unit_number))
            .await?;

        let now = Utc::now();
        let week_start = week_start_of(request.week_start.unwrap_or_else(|| now.date_naive()));

        // Request-scoped; never shared between calculations.
        let rates = RateTable::from_rules(self.repos.rates().find_active().await?, now);
        debug!(rates = rates.len(), "Rate table loaded");

        let event_types = self.repos.accessorials().find_event_types().await?;
        let event_rules = self.repos.accessorials().find_event_rules().await?;
        let detection = EventDetector::new(&event_types, &event_rules)
            .detect(&request.trip_context(), &request.overrides);

        let mut uow = self.repos.trip_costs().begin().await?;
        let staged = self
            .stage(uow.as_mut(), &request, &profiles, &rates, &detection, week_start, now)
            .await;

        let calculation = match staged {
            Ok(calculation) => calculation,
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                warn!(order_id = %request.order_id, error = %e, "Cost calculation rolled back");
                return Err(e);
            }
        };
        uow.commit().await?;

        let cost = &calculation.trip_cost;
        metrics::counter!("trip_costs_calculated_total").increment(1);
        info!(
            cost_id = %cost.id,
            order_id = %cost.order_id,
            driver_id = %cost.driver_id,
            miles = cost.miles,
            total_cpm = cost.total_cpm,
            total_cost = cost.total_cost,
            "Trip cost calculated"
        );

        self.publish(CostEvent::CostCalculated(CostCalculatedEvent {
            cost_id: cost.id.clone(),
            trip_id: cost.trip_id.clone(),
            order_id: cost.order_id.clone(),
            total_cost: cost.total_cost,
            total_cpm: cost.total_cpm,
            timestamp: cost.calculated_at,
        }))
        .await;

        Ok(calculation)
    }

    /// Everything between begin and commit.
    #[allow(clippy::too_many_arguments)]
    async fn stage(
        &self,
        uow: &mut dyn CostingUnitOfWork,
        request: &CalculateCost,
        profiles: &ResolvedProfiles,
        rates: &RateTable,
        detection: &DetectionResult,
        week_start: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<CostCalculation> {
        let bucket = profiles.week_bucket_unit();

        let prior_weekly_miles = match bucket {
            Some(unit_number) => uow
                .week_miles(unit_number, week_start, self.options.lock_week_miles)
                .await?
                .map_or(0.0, |s| s.total_miles),
            None => 0.0,
        };

        let breakdown = BreakdownCalculator::new(rates).calculate(
            &profiles.driver,
            profiles.unit.as_ref(),
            request.miles,
            prior_weekly_miles,
            &detection.counts,
        );
        let total_cpm = breakdown.total_cpm();
        let total_cost = total_cpm * request.miles;

        let margin = MarginAnalysis::analyze(request.revenue, request.miles, total_cpm, total_cost);
        let pricing = margin
            .is_some()
            .then(|| PricingSuggestions::suggest(request.miles, total_cpm));

        let driver = &profiles.driver;
        let formula = json!({
            "driver": {
                "id": driver.id,
                "name": driver.name,
                "type": driver.driver_type.code(),
                "zone": driver.effective_zone().map(|z| z.code()),
            },
            "unit": profiles.unit.as_ref().map(|u| json!({
                "id": u.id,
                "number": u.unit_number,
                "totalWeeklyCost": u.total_weekly_fixed_cost(),
            })),
            "inputs": {
                "miles": request.miles,
                "direction": request.direction.code(),
                "isRoundTrip": request.is_round_trip,
                "orderType": request.order_type,
                "origin": request.origin,
                "destination": request.destination,
                "weekStart": week_start.to_string(),
                "weekBucket": bucket,
                "events": {
                    "borderCrossings": detection.counts.border_crossings,
                    "dropHooks": detection.counts.drop_hooks,
                    "pickups": detection.counts.pickups,
                    "deliveries": detection.counts.deliveries,
                },
            },
            "breakdown": breakdown,
            "totals": {
                "totalCpm": total_cpm,
                "totalCost": total_cost,
            },
        });

        let trip_cost = TripCost {
            id: uuid::Uuid::new_v4().to_string(),
            trip_id: non_blank(&request.trip_id).map(String::from),
            order_id: request.order_id.trim().to_string(),
            driver_id: driver.id.clone(),
            unit_id: profiles.unit.as_ref().map(|u| u.id.clone()),
            driver_type: driver.driver_type,
            oo_zone: driver.effective_zone(),
            miles: request.miles,
            direction: request.direction,
            is_round_trip: request.is_round_trip,
            week_start: bucket.map(|_| week_start),
            events: detection.counts,
            fixed_cpm: breakdown.fixed.fixed_cpm,
            wage_cpm: breakdown.wage.effective_wage_cpm,
            rolling_cpm: breakdown.rolling.total_rolling_cpm,
            accessorial_cpm: breakdown.accessorial.accessorial_cpm,
            total_cpm,
            total_cost,
            margin: margin.clone(),
            calculation_formula: formula,
            calculated_at: now,
            actual: None,
            updated_at: now,
        };

        uow.insert_trip_cost(&trip_cost).await?;
        if let Some(unit_number) = bucket {
            uow.add_week_miles(unit_number, week_start, request.miles)
                .await?;
        }

        Ok(CostCalculation {
            trip_cost,
            breakdown,
            margin,
            pricing,
            auto_detected_events: detection.details.clone(),
        })
    }

    /// Attach actuals to the most recent calculation of an order.
    /// Calling it again overwrites the previous actuals.
    pub async fn record_actual_cost(
        &self,
        order_id: &str,
        actual_miles: f64,
        actual_cost: f64,
    ) -> DomainResult<TripCost> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(DomainError::Validation("orderId is required".into()));
        }
        if !actual_miles.is_finite() || actual_miles <= 0.0 {
            return Err(DomainError::Validation("actualMiles must be greater than 0".into()));
        }
        if !actual_cost.is_finite() || actual_cost <= 0.0 {
            return Err(DomainError::Validation("actualCost must be greater than 0".into()));
        }

        let now = Utc::now();
        let cost = self
            .repos
            .trip_costs()
            .record_actual(order_id, actual_miles, actual_cost, now)
            .await?
            .ok_or_else(|| DomainError::not_found("TripCost", "order_id", order_id))?;

        let Some(actual) = cost.actual else {
            return Err(DomainError::Persistence(
                "Actual cost missing after update".into(),
            ));
        };
        info!(
            cost_id = %cost.id,
            order_id,
            actual_miles,
            actual_cost,
            variance = actual.variance,
            "Actual cost recorded"
        );

        self.publish(CostEvent::CostActual(CostActualEvent {
            cost_id: cost.id.clone(),
            order_id: cost.order_id.clone(),
            actual_miles: actual.actual_miles,
            actual_cost: actual.actual_cost,
            variance: actual.variance,
            variance_pct: actual.variance_pct,
            timestamp: now,
        }))
        .await;

        Ok(cost)
    }

    /// Most recent calculation for the order.
    pub async fn get_breakdown(&self, order_id: &str) -> DomainResult<TripCost> {
        let order_id = order_id.trim();
        self.repos
            .trip_costs()
            .find_latest_by_order(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("TripCost", "order_id", order_id))
    }

    /// Weekly aggregate for the unit; zeros when nothing was costed yet.
    pub async fn week_miles(
        &self,
        unit_number: &str,
        week_of: Option<NaiveDate>,
    ) -> DomainResult<WeekMilesSummary> {
        let week_start = week_start_of(week_of.unwrap_or_else(|| Utc::now().date_naive()));
        Ok(self
            .repos
            .week_miles()
            .find(unit_number, week_start)
            .await?
            .unwrap_or_else(|| WeekMilesSummary::empty(unit_number, week_start)))
    }

    /// Best effort: failures are logged and counted, never returned.
    async fn publish(&self, event: CostEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            metrics::counter!("trip_cost_publish_failures_total", "topic" => event.topic())
                .increment(1);
            warn!(
                topic = event.topic(),
                order_id = event.order_id(),
                error = %e,
                "Failed to publish cost event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::application::events::{CostEventPublisher, EventBus};
    use crate::domain::driver::{DriverProfile, DriverType, OoZone};
    use crate::domain::unit::{UnitProfile, WeeklyFixedCosts};
    use crate::infrastructure::storage::InMemoryRepositories;
    use crate::support::errors::PublishError;

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<CostEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl CostEventPublisher for RecordingPublisher {
        async fn publish(&self, event: &CostEvent) -> Result<(), PublishError> {
            self.events.lock().unwrap().push(event.clone());
            if self.fail {
                Err(PublishError::Delivery("broker unavailable".into()))
            } else {
                Ok(())
            }
        }
    }

    fn week() -> NaiveDate {
        // Wednesday; bucket is Sunday 2024-03-10
        NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
    }

    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn repos() -> InMemoryRepositories {
        let repos = InMemoryRepositories::with_defaults();
        repos.add_driver(DriverProfile {
            id: "DRV-OO".into(),
            name: "Jordan Lee".into(),
            driver_type: DriverType::OwnerOperator,
            oo_zone: Some(OoZone::Zone2),
            unit_number: Some("T-200".into()),
            is_active: true,
        });
        repos.add_driver(DriverProfile {
            id: "DRV-NOUNIT".into(),
            name: "Floater".into(),
            driver_type: DriverType::Company,
            oo_zone: None,
            unit_number: None,
            is_active: true,
        });
        repos.add_unit(UnitProfile {
            id: "U-200".into(),
            unit_number: "T-200".into(),
            driver_id: Some("DRV-OO".into()),
            weekly_costs: WeeklyFixedCosts {
                truck: 1000.0,
                trailer: 250.0,
                insurance: 450.0,
                telematics: 35.0,
                permits: 145.0,
                sga: 180.0,
                misc: 40.0,
            },
            is_active: true,
        });
        repos
    }

    fn service(repos: &InMemoryRepositories, publisher: Arc<RecordingPublisher>) -> CostingService {
        CostingService::new(Arc::new(repos.clone()), publisher, CostingOptions::default())
    }

    fn request(order_id: &str, miles: f64) -> CalculateCost {
        CalculateCost {
            order_id: order_id.into(),
            trip_id: None,
            driver_id: Some("DRV-OO".into()),
            unit_number: Some("T-200".into()),
            miles,
            direction: Direction::Outbound,
            is_round_trip: false,
            order_type: "FTL".into(),
            origin: "Toronto, CANADA".into(),
            destination: "Ottawa, CANADA".into(),
            revenue: None,
            week_start: Some(week()),
            overrides: EventOverrides::default(),
        }
    }

    #[tokio::test]
    async fn owner_operator_zone2_scenario() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-1", 500.0);
        req.revenue = Some(1200.0);
        req.overrides = EventOverrides {
            pickups: Some(0),
            deliveries: Some(0),
            ..Default::default()
        };

        let calc = svc.calculate_cost(req).await.unwrap();
        let b = &calc.breakdown;

        assert!((b.fixed.fixed_cpm - 4.2).abs() < 1e-9);
        assert!((b.wage.effective_wage_cpm - 0.68 * 1.22).abs() < 1e-9);
        assert!((b.rolling.total_rolling_cpm - 0.33).abs() < 1e-9);
        assert_eq!(b.accessorial.accessorial_cpm, 0.0);

        let cost = &calc.trip_cost;
        let sum = b.fixed.fixed_cpm
            + b.wage.effective_wage_cpm
            + b.rolling.total_rolling_cpm
            + b.accessorial.accessorial_cpm;
        assert!((cost.total_cpm - sum).abs() < 1e-6);
        assert!((cost.total_cost - cost.total_cpm * 500.0).abs() < 1e-6);

        let margin = calc.margin.unwrap();
        assert!((margin.margin_pct - (1200.0 - cost.total_cost) / 1200.0).abs() < 1e-12);
        assert!(!margin.is_profitable);
        let pricing = calc.pricing.unwrap();
        assert!((pricing.target_rpm - cost.total_cpm * 1.15).abs() < 1e-12);
    }

    #[tokio::test]
    async fn margin_absent_without_revenue() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));

        let calc = svc.calculate_cost(request("ORD-2", 250.0)).await.unwrap();

        assert!(calc.margin.is_none());
        assert!(calc.pricing.is_none());
        assert!(calc.trip_cost.margin.is_none());
    }

    #[tokio::test]
    async fn detected_stops_and_border_crossing_are_priced() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-3", 300.0);
        req.destination = "Detroit, USA".into();

        let calc = svc.calculate_cost(req).await.unwrap();

        let counts = calc.breakdown.accessorial.counts();
        assert_eq!(counts.border_crossings, 1);
        assert_eq!(counts.pickups, 1);
        assert_eq!(counts.deliveries, 1);
        assert_eq!(calc.breakdown.accessorial.total_accessorial_cost, 75.0);
        assert_eq!(calc.auto_detected_events.len(), 3);
    }

    #[tokio::test]
    async fn explicit_border_crossing_zero_wins() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-4", 300.0);
        req.destination = "Detroit, USA".into();
        req.overrides.border_crossings = Some(0);

        let calc = svc.calculate_cost(req).await.unwrap();

        assert_eq!(calc.trip_cost.events.border_crossings, 0);
        assert_eq!(calc.breakdown.accessorial.border_crossing_cost, 0.0);
    }

    #[tokio::test]
    async fn week_miles_accumulate_across_trips() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));

        svc.calculate_cost(request("ORD-5", 500.0)).await.unwrap();
        let second = svc.calculate_cost(request("ORD-6", 500.0)).await.unwrap();

        assert_eq!(second.breakdown.fixed.prior_weekly_miles, 500.0);
        assert!((second.breakdown.fixed.fixed_cpm - 2.1).abs() < 1e-9);

        let summary = svc.week_miles("T-200", Some(week())).await.unwrap();
        assert_eq!(summary.week_start, sunday());
        assert_eq!(summary.total_miles, 1000.0);
        assert_eq!(summary.trip_count, 2);
    }

    #[tokio::test]
    async fn concurrent_calculations_lose_no_miles() {
        let repos = repos();
        let svc = Arc::new(service(&repos, Arc::new(RecordingPublisher::default())));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let svc = svc.clone();
                tokio::spawn(async move {
                    svc.calculate_cost(request(&format!("ORD-C{}", i), 10.0 + i as f64))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let expected: f64 = (0..20).map(|i| 10.0 + i as f64).sum();
        let summary = svc.week_miles("T-200", Some(sunday())).await.unwrap();
        assert_eq!(summary.trip_count, 20);
        assert!((summary.total_miles - expected).abs() < 1e-9);
        assert_eq!(repos.trip_cost_count(), 20);
    }

    #[tokio::test]
    async fn driver_resolved_through_unit() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-7", 100.0);
        req.driver_id = None;

        let calc = svc.calculate_cost(req).await.unwrap();
        assert_eq!(calc.trip_cost.driver_id, "DRV-OO");
        assert_eq!(calc.trip_cost.unit_id.as_deref(), Some("U-200"));
    }

    #[tokio::test]
    async fn unknown_driver_is_not_found() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-8", 100.0);
        req.driver_id = Some("NOPE".into());
        req.unit_number = None;

        let err = svc.calculate_cost(req).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Driver", .. }));
        assert_eq!(repos.trip_cost_count(), 0);
    }

    #[tokio::test]
    async fn invalid_miles_rejected_before_any_work() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));

        for miles in [0.0, -5.0, f64::NAN] {
            let err = svc.calculate_cost(request("ORD-9", miles)).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
        assert_eq!(repos.trip_cost_count(), 0);
    }

    #[tokio::test]
    async fn missing_identifiers_rejected() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-10", 100.0);
        req.driver_id = Some("  ".into());
        req.unit_number = None;

        let err = svc.calculate_cost(req).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn oversized_event_override_rejected_before_writing() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-10", 100.0);
        req.overrides.border_crossings = Some(u32::MAX);

        let err = svc.calculate_cost(req).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("BC")));
        assert_eq!(repos.trip_cost_count(), 0);

        let mut req = request("ORD-10", 100.0);
        req.overrides.border_crossings = Some(MAX_EVENT_OVERRIDE);
        let calc = svc.calculate_cost(req).await.unwrap();
        assert_eq!(calc.trip_cost.events.border_crossings, MAX_EVENT_OVERRIDE);
    }

    #[tokio::test]
    async fn failed_upsert_rolls_back_everything() {
        let repos = repos();
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(&repos, publisher.clone());
        repos.fail_week_miles_upserts(true);

        let err = svc.calculate_cost(request("ORD-11", 100.0)).await.unwrap_err();

        assert!(matches!(err, DomainError::Persistence(_)));
        assert_eq!(repos.trip_cost_count(), 0);
        let summary = svc.week_miles("T-200", Some(sunday())).await.unwrap();
        assert_eq!(summary.trip_count, 0);
        assert!(publisher.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_insert_leaves_aggregate_untouched() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        repos.fail_trip_cost_inserts(true);

        assert!(svc.calculate_cost(request("ORD-12", 100.0)).await.is_err());
        let summary = svc.week_miles("T-200", Some(sunday())).await.unwrap();
        assert_eq!(summary.total_miles, 0.0);
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_calculation() {
        let repos = repos();
        let publisher = Arc::new(RecordingPublisher {
            fail: true,
            ..Default::default()
        });
        let svc = service(&repos, publisher.clone());

        let calc = svc.calculate_cost(request("ORD-13", 100.0)).await.unwrap();

        assert_eq!(repos.trip_cost_count(), 1);
        let events = publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic(), "cost.calculated");
        assert_eq!(events[0].order_id(), calc.trip_cost.order_id);
    }

    #[tokio::test]
    async fn driver_without_unit_has_no_week_bucket() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-14", 100.0);
        req.driver_id = Some("DRV-NOUNIT".into());
        req.unit_number = None;

        let calc = svc.calculate_cost(req).await.unwrap();

        assert_eq!(calc.breakdown.fixed.fixed_cpm, 0.0);
        assert!(calc.trip_cost.week_start.is_none());
    }

    #[tokio::test]
    async fn record_actual_twice_keeps_last_values() {
        let repos = repos();
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(&repos, publisher.clone());
        let calc = svc.calculate_cost(request("ORD-15", 500.0)).await.unwrap();
        let estimate = calc.trip_cost.total_cost;

        svc.record_actual_cost("ORD-15", 510.0, 2000.0).await.unwrap();
        let updated = svc.record_actual_cost("ORD-15", 520.0, 3000.0).await.unwrap();

        let actual = updated.actual.unwrap();
        assert_eq!(actual.actual_miles, 520.0);
        assert_eq!(actual.actual_cost, 3000.0);
        assert!((actual.variance - (3000.0 - estimate)).abs() < 1e-9);
        assert!((actual.variance_pct - (3000.0 - estimate) / estimate).abs() < 1e-12);
        assert_eq!(repos.trip_cost_count(), 1);

        let stored = svc.get_breakdown("ORD-15").await.unwrap();
        assert_eq!(stored.actual.unwrap().actual_cost, 3000.0);

        let topics: Vec<_> = publisher
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.topic())
            .collect();
        assert_eq!(topics, vec!["cost.calculated", "cost.actual", "cost.actual"]);
    }

    #[tokio::test]
    async fn record_actual_for_unknown_order_is_not_found() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));

        let err = svc.record_actual_cost("ORD-404", 10.0, 10.0).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn record_actual_validates_inputs() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));

        let err = svc.record_actual_cost("ORD-1", 0.0, 10.0).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = svc.record_actual_cost("ORD-1", 10.0, -1.0).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn breakdown_returns_most_recent_calculation() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        svc.calculate_cost(request("ORD-16", 100.0)).await.unwrap();
        let latest = svc.calculate_cost(request("ORD-16", 200.0)).await.unwrap();

        let found = svc.get_breakdown("ORD-16").await.unwrap();
        assert_eq!(found.id, latest.trip_cost.id);
        assert_eq!(found.miles, 200.0);
        assert!(found.breakdown().is_some());
    }

    #[tokio::test]
    async fn breakdown_lookup_ignores_surrounding_whitespace() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let calc = svc.calculate_cost(request(" ORD-17 ", 100.0)).await.unwrap();
        assert_eq!(calc.trip_cost.order_id, "ORD-17");

        let found = svc.get_breakdown("  ORD-17\t").await.unwrap();
        assert_eq!(found.id, calc.trip_cost.id);
    }

    #[tokio::test]
    async fn calculation_trace_records_inputs() {
        let repos = repos();
        let svc = service(&repos, Arc::new(RecordingPublisher::default()));
        let mut req = request("ORD-17", 100.0);
        req.is_round_trip = true;
        req.direction = Direction::Inbound;

        let calc = svc.calculate_cost(req).await.unwrap();
        let formula = &calc.trip_cost.calculation_formula;

        assert_eq!(formula["driver"]["type"], "OO");
        assert_eq!(formula["driver"]["zone"], "ZONE2");
        assert_eq!(formula["unit"]["number"], "T-200");
        assert_eq!(formula["inputs"]["direction"], "INBOUND");
        assert_eq!(formula["inputs"]["isRoundTrip"], true);
        assert_eq!(formula["inputs"]["weekStart"], "2024-03-10");
        assert!(formula["breakdown"]["fixed"]["fixedCpm"].is_number());
    }

    #[tokio::test]
    async fn event_bus_receives_calculated_event() {
        let repos = repos();
        let bus = Arc::new(EventBus::new());
        let mut sub = bus.subscribe();
        let svc = CostingService::new(Arc::new(repos.clone()), bus, CostingOptions::default());

        svc.calculate_cost(request("ORD-18", 100.0)).await.unwrap();

        let msg = sub.recv().await.unwrap();
        assert_eq!(msg.topic, "cost.calculated");
        assert_eq!(msg.event.order_id(), "ORD-18");
    }
}
