// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use echo_break_core::WindowDays;
use echo_break_db::ActivitySource;

use crate::cache::AggregateCache;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Cached view of the activity database.
    pub cache: AggregateCache,
    /// Window used when a request does not specify one.
    pub default_window: WindowDays,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(source: Arc<dyn ActivitySource>) -> Arc<Self> {
        Self::with_cache(AggregateCache::new(source), WindowDays::DEFAULT)
    }

    /// Create with a pre-built cache (custom TTL) and default window.
    pub fn with_cache(cache: AggregateCache, default_window: WindowDays) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            cache,
            default_window,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
