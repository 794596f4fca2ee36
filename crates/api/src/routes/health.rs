//! Root-level `/health`, outside the versioned API.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::routes::API_PREFIX;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    /// Serving, but PostgreSQL is unreachable so only `/health` works.
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub service: &'static str,
    pub status: ServiceStatus,
    pub version: &'static str,
    /// Where the review API is mounted.
    pub api: &'static str,
    pub db_healthy: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = match yamdb_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Database unreachable from health check");
            false
        }
    };

    Json(HealthReport {
        service: "yamdb",
        status: if db_healthy {
            ServiceStatus::Ok
        } else {
            ServiceStatus::Degraded
        },
        version: env!("CARGO_PKG_VERSION"),
        api: API_PREFIX,
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
