// crates/db/src/queries/mod.rs
// Windowed aggregation queries over the activity table.

mod activity;

use chrono::{TimeDelta, Utc};
use echo_break_core::WindowDays;

pub use activity::{ACTIVITY_TABLE, TOP_COMMUNITIES_LIMIT};

/// Lower bound of a trailing window, rendered as a `YYYY-MM-DD HH:MM:SS`
/// UTC bind parameter. Computing it here keeps interval text out of SQL and
/// lets the same statement run on MySQL and SQLite.
///
/// `created_at` values are compared as UTC wall-clock times. A MySQL server
/// that writes them in another zone shifts the window by its UTC offset.
pub fn window_cutoff(window: WindowDays) -> String {
    let cutoff = Utc::now() - TimeDelta::days(i64::from(window.days()));
    cutoff.format("%Y-%m-%d %H:%M:%S").to_string()
}
