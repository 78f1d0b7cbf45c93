//! Weather Lookup API Server
//!
//! Serves city weather records from a relational store:
//! `GET /weather/city?name=<city>` returns the record as JSON, or an empty
//! body when the city is unknown. Also exposes `/health` and `/metrics`.

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::signal;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod telemetry;

pub use config::Settings;
pub use error::{ApiError, ServerError};

use rate_limit::RateLimitConfig;
use storage::{DatabaseConfig, SqlWeatherRepository, WeatherStore};

/// Application state shared across handlers
pub struct AppState {
    /// Read-only weather store
    pub store: Arc<dyn WeatherStore>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
    /// Prometheus handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn WeatherStore>) -> Self {
        Self {
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/weather/city", get(routes::weather::get_city))
        .route("/health", get(routes::health::get_health))
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Create the router with rate limiting applied when enabled
pub fn build_app(state: Arc<AppState>, limits: &RateLimitConfig) -> Result<Router, ServerError> {
    let router = create_router(state);

    if !limits.enabled {
        return Ok(router);
    }

    let governor = rate_limit::create_governor_config(limits)?;
    rate_limit::spawn_cleanup(governor.clone(), Duration::from_secs(60));
    info!(
        "Rate limiting enabled: burst {}, one request replenished every {}s",
        limits.burst_size, limits.per_second
    );

    Ok(router.layer(GovernorLayer { config: governor }))
}

/// Serve `app` on `listener` until Ctrl+C or SIGTERM
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Connect, create the schema and seed an empty store
pub async fn open_store(config: &DatabaseConfig) -> Result<SqlWeatherRepository, ServerError> {
    let repository = SqlWeatherRepository::connect(config).await?;
    repository.init_schema().await?;

    if config.seed {
        storage::seed_if_empty(&repository).await?;
    }

    Ok(repository)
}

/// Run the server
///
/// Fails fast when the database is unreachable at startup.
pub async fn run_server(settings: Settings) -> Result<(), ServerError> {
    let metrics = telemetry::init_metrics()?;
    let repository = open_store(&settings.database).await?;

    let state = Arc::new(AppState::new(Arc::new(repository.clone())).with_metrics(metrics));
    let app = build_app(state, &settings.rate_limit)?;

    let address = settings.server.addr();
    info!("Binding to {}", address);
    let listener = TcpListener::bind(&address).await?;

    serve(listener, app).await?;

    repository.close().await;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
