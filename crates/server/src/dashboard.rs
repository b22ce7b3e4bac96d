// crates/server/src/dashboard.rs
//! Per-request dashboard assembly: cache → formatter → chart builder.
//!
//! A panel always renders. When a query fails, or finds nothing in the
//! window, its sample dataset is shown instead with an inline notice.

use echo_break_core::{
    category_records, community_records, fallback, political_spectrum_pie, screentime_donut,
    top_communities_bar, DataSource, DisplayRecord, Panel, WindowDays,
};
use echo_break_db::{QueryFailure, TOP_COMMUNITIES_LIMIT};
use serde::Serialize;
use tracing::warn;

use crate::metrics::record_fallback;
use crate::state::AppState;

pub const POLITICAL_SPECTRUM_TITLE: &str = "Political Spectrum Distribution";
pub const TOP_COMMUNITIES_TITLE: &str = "Top Subreddits Engagement";
pub const SCREENTIME_TITLE: &str = "Screentime Analysis";

/// Everything the dashboard page shows for one window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub window_days: u32,
    pub political_spectrum: Panel,
    pub screentime: Panel,
    pub top_communities: Panel,
}

/// Why live rows were replaced.
enum Substitution<'a> {
    Failed(&'a QueryFailure),
    Empty,
}

impl Substitution<'_> {
    fn notice(&self, subject: &str, window: WindowDays) -> String {
        match self {
            Substitution::Failed(err) => format!(
                "Could not load live {} data ({}). Showing sample data.",
                subject, err
            ),
            Substitution::Empty => format!(
                "No {} activity in the last {} days. Showing sample data.",
                subject,
                window.days()
            ),
        }
    }
}

/// Pick live records or the fallback set, returning the source and notice.
fn live_or_fallback<T>(
    panel: &'static str,
    subject: &str,
    window: WindowDays,
    result: &Result<Vec<T>, QueryFailure>,
    to_records: impl FnOnce(&[T]) -> Vec<DisplayRecord>,
    fallback_records: impl FnOnce() -> Vec<DisplayRecord>,
) -> (Vec<DisplayRecord>, DataSource, Option<String>) {
    let substitution = match result {
        Ok(rows) if !rows.is_empty() => {
            return (to_records(rows.as_slice()), DataSource::Live, None)
        }
        Ok(_) => Substitution::Empty,
        Err(err) => Substitution::Failed(err),
    };

    match &substitution {
        Substitution::Failed(err) => {
            warn!(panel, window = %window, error = %err, "Showing sample data: query failed")
        }
        Substitution::Empty => warn!(panel, window = %window, "Showing sample data: no rows"),
    }
    record_fallback(panel);

    (
        fallback_records(),
        DataSource::Fallback,
        Some(substitution.notice(subject, window)),
    )
}

/// Share of posts per bias label, as a donut.
pub async fn political_spectrum_panel(state: &AppState, window: WindowDays) -> Panel {
    let result = state.cache.category_distribution(window).await;
    let (records, data_source, notice) = live_or_fallback(
        "political_spectrum",
        "political",
        window,
        &result,
        category_records,
        fallback::category_records,
    );

    Panel {
        title: POLITICAL_SPECTRUM_TITLE.to_string(),
        data_source,
        notice,
        chart: political_spectrum_pie(&records),
        records,
    }
}

/// The busiest communities, largest first, as a horizontal bar chart.
pub async fn top_communities_panel(state: &AppState, window: WindowDays) -> Panel {
    let result = state.cache.top_communities(window).await.map(|mut rows| {
        rows.sort_by(|a, b| b.post_count.cmp(&a.post_count));
        rows.truncate(TOP_COMMUNITIES_LIMIT);
        rows
    });
    let (records, data_source, notice) = live_or_fallback(
        "top_communities",
        "community",
        window,
        &result,
        community_records,
        fallback::community_records,
    );

    Panel {
        title: TOP_COMMUNITIES_TITLE.to_string(),
        data_source,
        notice,
        chart: top_communities_bar(&records),
        records,
    }
}

/// Reading-mode breakdown; fixed data.
pub fn screentime_panel() -> Panel {
    let modes = fallback::screentime_modes();
    let records = modes
        .iter()
        .map(|mode| DisplayRecord {
            label: mode.label.clone(),
            value: mode.minutes,
            duration: echo_break_core::format_minutes(mode.minutes),
        })
        .collect();

    Panel {
        title: SCREENTIME_TITLE.to_string(),
        data_source: DataSource::Static,
        notice: None,
        chart: screentime_donut(&modes),
        records,
    }
}

pub async fn build_dashboard(state: &AppState, window: WindowDays) -> Dashboard {
    let (political_spectrum, top_communities) = tokio::join!(
        political_spectrum_panel(state, window),
        top_communities_panel(state, window),
    );

    Dashboard {
        window_days: window.days(),
        political_spectrum,
        screentime: screentime_panel(),
        top_communities,
    }
}
