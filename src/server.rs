//! Reusable trip costing server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, costing services, event delivery, REST API,
//! metrics, and graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::costing::{CostingOptions, CostingService};
use crate::application::events::{
    create_event_bus, FanoutPublisher, SharedEventBus, SharedPublisher, WebhookPublisher,
};
use crate::application::metadata::MetadataService;
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, seed_demo_data, DatabaseConfig, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, ApiState};
use crate::support::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the trip costing service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Insert demo drivers and units (default: false).
    pub seed_demo: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            seed_demo: false,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running trip costing service.
///
/// # Examples
///
/// ```rust,no_run
/// use trip_costing::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Shared event bus feeding the WebSocket stream.
    pub event_bus: SharedEventBus,
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// API port the server is listening on.
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder (when enabled)
    /// 2. Connect to the database, run migrations and optionally seed demo data
    /// 3. Wire the event bus and webhook relay into the costing service
    /// 4. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting trip costing service...");

        let prometheus_handle = if app_cfg.metrics.enabled {
            prometheus_handle()
        } else {
            None
        };

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig::from(&app_cfg.database);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        if opts.seed_demo {
            let written = seed_demo_data(&db).await?;
            info!(rows = written, "Demo drivers and units seeded");
        }

        // ── Repositories & Events ──────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        let event_bus = create_event_bus(app_cfg.events.channel_capacity);
        info!("🔔 Event bus initialized for real-time notifications");

        let mut publisher = FanoutPublisher::new().with(event_bus.clone());
        if let Some(url) = app_cfg.events.webhook_url.as_deref() {
            let timeout = Duration::from_secs(app_cfg.events.webhook_timeout_secs);
            match WebhookPublisher::new(url, timeout) {
                Ok(webhook) => {
                    info!(url, "Cost events relayed to webhook");
                    publisher = publisher.with(Arc::new(webhook));
                }
                Err(e) => error!(url, error = %e, "Webhook relay disabled"),
            }
        }
        let publisher: SharedPublisher = Arc::new(publisher);

        // ── Services ───────────────────────────────────────────
        let costing = Arc::new(CostingService::new(
            repos.clone(),
            publisher,
            CostingOptions {
                lock_week_miles: app_cfg.costing.lock_week_miles,
            },
        ));
        let metadata = Arc::new(MetadataService::new(repos.clone()));

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let state = ApiState::new(costing, metadata, event_bus.clone(), Some(db.clone()));
        let api_router = create_api_router(state, prometheus_handle);

        let api_port = app_cfg.server.api_port;
        let api_addr = app_cfg.api_address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Trip costing service started.");

        Ok(Self {
            event_bus,
            repos,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to fully stop after shutdown has been triggered.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        match tokio::time::timeout(self.shutdown.timeout(), self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!("REST API server did not drain within the shutdown timeout"),
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Trip costing service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down trip costing service...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global metrics recorder can only be installed once per process;
/// later starts reuse it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                error!("Failed to install Prometheus metrics recorder: {}", e);
                None
            }
        })
        .clone()
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
