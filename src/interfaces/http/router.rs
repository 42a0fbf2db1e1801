//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::costing::CostingService;
use crate::application::events::SharedEventBus;
use crate::application::metadata::MetadataService;
use crate::interfaces::http::common::ErrorBody;
use crate::interfaces::ws::{create_notification_state, ws_notifications_handler, NotificationState};

use super::modules::costing::{self, CostingState};
use super::modules::health::{self, HealthState};
use super::modules::metadata::{self, MetadataState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};

/// Everything the router needs; each handler extracts its own slice via
/// `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub costing: CostingState,
    pub metadata: MetadataState,
    pub health: HealthState,
    pub notifications: NotificationState,
}

impl ApiState {
    pub fn new(
        costing_service: Arc<CostingService>,
        metadata_service: Arc<MetadataService>,
        event_bus: SharedEventBus,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            costing: CostingState {
                service: costing_service,
            },
            metadata: MetadataState {
                service: metadata_service,
            },
            health: HealthState {
                db,
                event_bus: event_bus.clone(),
                started_at: Arc::new(Instant::now()),
            },
            notifications: create_notification_state(event_bus),
        }
    }
}

impl FromRef<ApiState> for CostingState {
    fn from_ref(s: &ApiState) -> Self {
        s.costing.clone()
    }
}

impl FromRef<ApiState> for MetadataState {
    fn from_ref(s: &ApiState) -> Self {
        s.metadata.clone()
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        s.health.clone()
    }
}

impl FromRef<ApiState> for NotificationState {
    fn from_ref(s: &ApiState) -> Self {
        s.notifications.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Costing
        costing::calculate_cost,
        costing::record_actual,
        costing::patch_actual,
        costing::get_breakdown,
        costing::get_week_miles,
        // Metadata
        metadata::list_rules,
        metadata::list_events,
        metadata::get_summary,
    ),
    components(
        schemas(
            ErrorBody,
            health::HealthResponse,
            health::ComponentHealth,
            costing::CalculateCostRequest,
            costing::ActualCostRequest,
            costing::ActualCostPatch,
            costing::CostCalculationResponse,
            costing::TripCostResponse,
            costing::WeekMilesResponse,
            costing::BreakdownDto,
            costing::FixedCostDto,
            costing::WeeklyFixedCostsDto,
            costing::WageDto,
            costing::RollingDto,
            costing::AccessorialDto,
            costing::MarginAnalysisDto,
            costing::PricingSuggestionsDto,
            costing::DetectedEventDto,
            costing::EventCountsDto,
            costing::ActualCostDto,
            metadata::RateRuleDto,
            metadata::EventTypeDto,
            metadata::EventRuleDto,
            metadata::EventCatalogResponse,
            metadata::SummaryResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Costing", description = "Trip cost calculation, reconciliation and weekly mileage"),
        (name = "Metadata", description = "Rate rules, event catalog and activity summary"),
    ),
    info(
        title = "Trip Costing API",
        version = "1.0.0",
        description = "Per-trip cost breakdown, margin analysis and actual-cost reconciliation"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes. `/metrics` is mounted only when a
/// Prometheus handle is supplied.
pub fn create_api_router(state: ApiState, prometheus: Option<PrometheusHandle>) -> Router {
    let costing_routes = Router::new()
        .route("/calculate", post(costing::calculate_cost))
        .route("/actual", post(costing::record_actual))
        .route("/actual/{order_id}", patch(costing::patch_actual))
        .route("/breakdown/{order_id}", get(costing::get_breakdown))
        .route("/week-miles/{unit_number}", get(costing::get_week_miles));

    let metadata_routes = Router::new()
        .route("/rules", get(metadata::list_rules))
        .route("/events", get(metadata::list_events))
        .route("/summary", get(metadata::get_summary));

    let api_v1 = Router::new()
        .nest("/costing", costing_routes)
        .nest("/metadata", metadata_routes)
        .route("/events/ws", get(ws_notifications_handler));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::Service;

    use crate::application::costing::CostingOptions;
    use crate::application::events::create_event_bus;
    use crate::infrastructure::seed;
    use crate::infrastructure::storage::InMemoryRepositories;

    fn app() -> Router {
        let repos = InMemoryRepositories::with_defaults();
        for driver in seed::demo_drivers() {
            repos.add_driver(driver);
        }
        for unit in seed::demo_units() {
            repos.add_unit(unit);
        }
        let repos: Arc<dyn crate::domain::RepositoryProvider> = Arc::new(repos);
        let event_bus = create_event_bus(16);
        let costing = Arc::new(CostingService::new(
            repos.clone(),
            event_bus.clone(),
            CostingOptions::default(),
        ));
        let metadata = Arc::new(MetadataService::new(repos));
        create_api_router(ApiState::new(costing, metadata, event_bus, None), None)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().into_service().call(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_in_memory_storage() {
        let app = app();
        let (status, body) = send(&app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "in_memory");
    }

    #[tokio::test]
    async fn calculate_then_fetch_breakdown() {
        let app = app();
        let request = json!({
            "orderId": "ORD-1",
            "driverId": "DRV-003",
            "miles": 500.0,
            "direction": "OUTBOUND",
            "weekStart": "2024-03-13",
            "revenue": 3000.0
        });

        let (status, body) = send(&app, post("/api/v1/costing/calculate", request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orderId"], "ORD-1");
        assert!(body["marginAnalysis"].is_object());

        let (status, body) = send(&app, get("/api/v1/costing/breakdown/ORD-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["driverType"], "OO");
        assert_eq!(body["weekStart"], "2024-03-10");
    }

    #[tokio::test]
    async fn invalid_body_is_bad_request() {
        let app = app();
        let request = json!({
            "orderId": "ORD-2",
            "driverId": "DRV-001",
            "miles": 0.0,
            "direction": "INBOUND"
        });

        let (status, body) = send(&app, post("/api/v1/costing/calculate", request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("miles"));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let app = app();
        let (status, body) = send(&app, get("/api/v1/costing/breakdown/NOPE")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn metadata_lists_seeded_rules() {
        let app = app();
        let (status, body) = send(&app, get("/api/v1/metadata/rules")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), seed::default_rate_rules().len());
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app();
        let (status, body) = send(&app, get("/api-docs/openapi.json")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/costing/calculate"].is_object());
    }
}
