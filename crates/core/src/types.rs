// crates/core/src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::charts::ChartSpec;
use crate::error::WindowError;

/// A validated trailing time window, in days.
///
/// Aggregation queries only ever see a `WindowDays`, so the interval bound
/// into SQL is always a small positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WindowDays(u32);

impl WindowDays {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 3650;
    pub const DEFAULT: WindowDays = WindowDays(30);

    pub fn new(days: i64) -> Result<Self, WindowError> {
        if days < i64::from(Self::MIN) || days > i64::from(Self::MAX) {
            return Err(WindowError::OutOfRange {
                days,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(days as u32))
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

impl Default for WindowDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for WindowDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}

/// One row of the category (bias label) distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub label: String,
    pub post_count: u64,
    pub unique_users: u64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, post_count: u64, unique_users: u64) -> Self {
        Self {
            label: label.into(),
            post_count,
            unique_users,
        }
    }
}

/// One row of the top-communities ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityCount {
    pub community: String,
    pub post_count: u64,
    /// `None` when every title in the group is NULL.
    pub avg_title_length: Option<f64>,
}

impl CommunityCount {
    pub fn new(community: impl Into<String>, post_count: u64) -> Self {
        Self {
            community: community.into(),
            post_count,
            avg_title_length: None,
        }
    }
}

/// A formatted, chart-ready row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub label: String,
    pub value: u64,
    pub duration: String,
}

/// A named slice of time on platform, already expressed in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreentimeMode {
    pub label: String,
    pub minutes: u64,
}

impl ScreentimeMode {
    pub fn new(label: impl Into<String>, minutes: u64) -> Self {
        Self {
            label: label.into(),
            minutes,
        }
    }

    pub fn hours(&self) -> f64 {
        self.minutes as f64 / 60.0
    }
}

/// Where a panel's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Queried from the activity table.
    Live,
    /// Substituted because the query failed or came back empty.
    Fallback,
    /// Fixed demo data with no live counterpart yet.
    Static,
}

/// One dashboard card: formatted rows plus the chart built from them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub title: String,
    pub data_source: DataSource,
    /// Inline message for the viewer when fallback data is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub records: Vec<DisplayRecord>,
    pub chart: ChartSpec,
}
