//! # Trip Costing Engine
//!
//! Per-trip cost calculation for a trucking carrier: fixed, wage, rolling and
//! accessorial cost per mile, margin analysis, pricing suggestions and
//! actual-cost reconciliation.
//!
//! ## Architecture
//!
//! - **domain**: Costing entities, value types and repository traits
//! - **application**: Costing use cases and cost event delivery
//! - **infrastructure**: Database (SeaORM), seed data and in-memory storage
//! - **interfaces**: REST API with Swagger documentation and the event WebSocket
//! - **support**: Errors, rounding and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryRepositories, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiState};

// Re-export costing services and events
pub use application::{
    create_event_bus, CalculateCost, CostingOptions, CostingService, EventBus, MetadataService,
    SharedEventBus,
};
