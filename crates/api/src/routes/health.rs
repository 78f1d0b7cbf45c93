//! Health Routes

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub database: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Health check handler, `503` when the store is unreachable
pub async fn get_health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.store.ping().await {
        Ok(()) => HealthStatus::Up,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            HealthStatus::Down
        }
    };

    let code = match database {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status: database,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            database: ComponentHealth { status: database },
        },
    };

    (code, Json(response))
}
