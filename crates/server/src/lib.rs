// crates/server/src/lib.rs
//! Echo Break server library.
//!
//! Axum JSON API over the engagement dashboard: cached aggregation queries,
//! formatted records, and declarative chart specs for the frontend to draw.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{AggregateCache, CacheOutcome, TtlCache, RESULT_TTL};
pub use config::ServerConfig;
pub use error::*;
pub use metrics::{init_metrics, render_metrics};
pub use routes::api_routes;
pub use state::AppState;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the Axum application in API-only mode.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_app_full(state, None)
}

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, dashboard, charts) and `/metrics`
/// - Optional static frontend; unknown paths fall back to its `index.html`
/// - CORS for development (allows any origin)
/// - Response compression and request tracing
pub fn create_app_full(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = api_routes(state);
    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        app = app.fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(index)));
    }

    app.layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
