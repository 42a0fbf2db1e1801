//! Concurrent calculations against one unit and week must not lose miles.

use std::sync::Arc;

use chrono::NaiveDate;

use trip_costing::application::costing::{CalculateCost, CostCalculation};
use trip_costing::domain::accessorial::EventOverrides;
use trip_costing::domain::trip_cost::Direction;
use trip_costing::domain::RepositoryProvider;
use trip_costing::infrastructure::database::migrator::{Migrator, MigratorTrait};
use trip_costing::infrastructure::{init_database, seed, seed_demo_data, DatabaseConfig};
use trip_costing::{
    create_event_bus, CostingOptions, CostingService, InMemoryRepositories, SeaOrmRepositoryProvider,
};

const TRIPS: usize = 20;

fn week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
}

fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn trip(i: usize) -> CalculateCost {
    CalculateCost {
        order_id: format!("ORD-{i}"),
        trip_id: None,
        driver_id: Some("DRV-003".into()),
        unit_number: None,
        miles: 100.0 + i as f64,
        direction: Direction::Outbound,
        is_round_trip: false,
        order_type: String::new(),
        origin: String::new(),
        destination: String::new(),
        revenue: None,
        week_start: Some(week()),
        overrides: EventOverrides::default(),
    }
}

async fn run_concurrently(service: Arc<CostingService>) -> Vec<CostCalculation> {
    let tasks: Vec<_> = (0..TRIPS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move { service.calculate_cost(trip(i)).await })
        })
        .collect();

    let mut results = Vec::with_capacity(TRIPS);
    for task in tasks {
        results.push(task.await.unwrap().unwrap());
    }
    results
}

/// Each calculation saw exactly the miles committed before it.
fn assert_serialized(mut results: Vec<CostCalculation>) {
    results.sort_by(|a, b| {
        a.breakdown
            .fixed
            .prior_weekly_miles
            .total_cmp(&b.breakdown.fixed.prior_weekly_miles)
    });
    let mut committed = 0.0;
    for calc in &results {
        assert!((calc.breakdown.fixed.prior_weekly_miles - committed).abs() < 1e-9);
        committed += calc.trip_cost.miles;
    }
}

async fn file_service(dir: &tempfile::TempDir, options: CostingOptions) -> Arc<CostingService> {
    let path = dir.path().join("costing.db");
    let config = DatabaseConfig::sqlite(path.to_str().unwrap());
    assert!(config.max_connections > 1);

    let db = init_database(&config).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    seed_demo_data(&db).await.unwrap();

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
    Arc::new(CostingService::new(repos, create_event_bus(64), options))
}

async fn assert_aggregate(service: &CostingService) {
    let summary = service.week_miles("T-103", Some(sunday())).await.unwrap();
    assert!((summary.total_miles - expected_miles()).abs() < 1e-9);
    assert_eq!(summary.trip_count as usize, TRIPS);
}

fn expected_miles() -> f64 {
    (0..TRIPS).map(|i| 100.0 + i as f64).sum()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sqlite_aggregate_matches_sum_of_trips() {
    let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    seed_demo_data(&db).await.unwrap();

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
    let service = Arc::new(CostingService::new(
        repos.clone(),
        create_event_bus(64),
        CostingOptions::default(),
    ));

    run_concurrently(service.clone()).await;

    assert_aggregate(&service).await;
    assert_eq!(repos.trip_costs().count().await.unwrap() as usize, TRIPS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn in_memory_aggregate_matches_sum_of_trips() {
    let repos = InMemoryRepositories::with_defaults();
    for driver in seed::demo_drivers() {
        repos.add_driver(driver);
    }
    for unit in seed::demo_units() {
        repos.add_unit(unit);
    }
    let repos: Arc<dyn RepositoryProvider> = Arc::new(repos);
    let service = Arc::new(CostingService::new(
        repos,
        create_event_bus(64),
        CostingOptions::default(),
    ));

    run_concurrently(service.clone()).await;

    assert_aggregate(&service).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn file_sqlite_pool_serializes_concurrent_calculations() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir, CostingOptions::default()).await;

    let results = run_concurrently(service.clone()).await;

    assert_eq!(results.len(), TRIPS);
    assert_aggregate(&service).await;
    assert_serialized(results);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn file_sqlite_pool_with_locking_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir, CostingOptions {
        lock_week_miles: true,
    })
    .await;

    let results = run_concurrently(service.clone()).await;

    assert_aggregate(&service).await;
    assert_serialized(results);
}
