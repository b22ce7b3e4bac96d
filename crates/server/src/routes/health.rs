// crates/server/src/routes/health.rs
//! Liveness endpoint. Reports process and cache state without querying the
//! activity database, so it stays green while panels show sample data.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    /// Window applied when `?days=` is absent.
    pub default_window_days: u32,
    /// Aggregate results currently held by the result cache.
    pub cached_aggregates: usize,
}

impl HealthStatus {
    fn snapshot(state: &AppState) -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: state.uptime_secs(),
            default_window_days: state.default_window.days(),
            cached_aggregates: state.cache.cached_entries(),
        }
    }
}

/// GET /api/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus::snapshot(&state))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
