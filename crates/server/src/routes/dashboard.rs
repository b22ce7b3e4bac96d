// crates/server/src/routes/dashboard.rs
//! Dashboard and per-chart endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use echo_break_core::{Panel, WindowDays};
use serde::Deserialize;

use crate::dashboard::{
    build_dashboard, political_spectrum_panel, screentime_panel, top_communities_panel, Dashboard,
};
use crate::error::{ApiError, ApiResult};
use crate::metrics::record_request;
use crate::state::AppState;

/// `?days=N`. Kept as text so a malformed value gets our JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<String>,
}

impl WindowQuery {
    fn resolve(&self, default: WindowDays) -> ApiResult<WindowDays> {
        match self.days.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => {
                let days = raw.parse::<i64>().map_err(|_| {
                    ApiError::BadRequest(format!("days must be an integer, got {:?}", raw))
                })?;
                Ok(WindowDays::new(days)?)
            }
        }
    }
}

fn window_or_record(
    endpoint: &str,
    query: &WindowQuery,
    state: &AppState,
    start: Instant,
) -> ApiResult<WindowDays> {
    query.resolve(state.default_window).inspect_err(|_| {
        record_request(endpoint, "400", start.elapsed());
    })
}

/// GET /api/dashboard - All panels for one window.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Dashboard>> {
    let start = Instant::now();
    let window = window_or_record("dashboard", &query, &state, start)?;

    let dashboard = build_dashboard(&state, window).await;

    record_request("dashboard", "200", start.elapsed());
    Ok(Json(dashboard))
}

/// GET /api/charts/political-spectrum - Bias label distribution panel.
pub async fn get_political_spectrum(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Panel>> {
    let start = Instant::now();
    let window = window_or_record("political_spectrum", &query, &state, start)?;

    let panel = political_spectrum_panel(&state, window).await;

    record_request("political_spectrum", "200", start.elapsed());
    Ok(Json(panel))
}

/// GET /api/charts/top-communities - Busiest communities panel.
pub async fn get_top_communities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Panel>> {
    let start = Instant::now();
    let window = window_or_record("top_communities", &query, &state, start)?;

    let panel = top_communities_panel(&state, window).await;

    record_request("top_communities", "200", start.elapsed());
    Ok(Json(panel))
}

/// GET /api/charts/screentime - Static screentime panel.
pub async fn get_screentime() -> Json<Panel> {
    let start = Instant::now();
    let panel = screentime_panel();
    record_request("screentime", "200", start.elapsed());
    Json(panel)
}

/// Create the dashboard routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/charts/political-spectrum", get(get_political_spectrum))
        .route("/charts/top-communities", get(get_top_communities))
        .route("/charts/screentime", get(get_screentime))
}
