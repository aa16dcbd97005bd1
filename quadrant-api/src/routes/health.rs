/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "backend": "sqlite",
///   "pool": { "active": 0, "idle": 1, "total": 1 }
/// }
/// ```
///
/// An unreachable database yields `"status": "degraded"` with a 503.

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub backend: &'static str,
    pub pool: PoolSnapshot,
}

#[derive(Debug, Serialize)]
pub struct PoolSnapshot {
    pub active: usize,
    pub idle: usize,
    pub total: usize,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status, database) = match state.db.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy", "connected"),
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
        }
    };

    let stats = state.db.stats();

    (
        status_code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
            backend: state.db.backend().as_str(),
            pool: PoolSnapshot {
                active: stats.active_connections,
                idle: stats.idle_connections,
                total: stats.total_connections,
            },
        }),
    )
}
