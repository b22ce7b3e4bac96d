//! API route handlers for the Echo Break server.

pub mod dashboard;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined router.
///
/// Routes:
/// - GET /api/health - Health check
/// - GET /api/dashboard?days=N - All dashboard panels
/// - GET /api/charts/political-spectrum?days=N - Bias label distribution
/// - GET /api/charts/top-communities?days=N - Busiest communities
/// - GET /api/charts/screentime - Static screentime breakdown
/// - GET /metrics - Prometheus metrics
pub fn api_routes(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(dashboard::router());

    Router::new()
        .nest("/api", api)
        .merge(metrics::router())
        .with_state(state)
}
