// crates/core/src/fallback.rs
//! Sample datasets shown when live numbers are unavailable.

use crate::format::display_record;
use crate::types::{CategoryCount, CommunityCount, DisplayRecord, ScreentimeMode};

/// Substituted for the category distribution when the query fails or is empty.
pub fn category_distribution() -> Vec<CategoryCount> {
    vec![
        CategoryCount::new("Left", 42, 0),
        CategoryCount::new("Right", 65, 0),
        CategoryCount::new("Neutral", 20, 0),
    ]
}

/// Substituted for the community ranking when the query fails or is empty.
pub fn top_communities() -> Vec<CommunityCount> {
    vec![
        CommunityCount::new("Politics", 150),
        CommunityCount::new("US Politics", 120),
        CommunityCount::new("World News", 80),
        CommunityCount::new("Conservative", 65),
        CommunityCount::new("Libertarian", 45),
    ]
}

/// Fallback category rows, labels kept exactly as written above.
pub fn category_records() -> Vec<DisplayRecord> {
    category_distribution()
        .into_iter()
        .map(|row| display_record(row.label, row.post_count))
        .collect()
}

/// Fallback community rows, labels kept exactly as written above.
pub fn community_records() -> Vec<DisplayRecord> {
    top_communities()
        .into_iter()
        .map(|row| display_record(row.community, row.post_count))
        .collect()
}

/// Reading-mode breakdown. There is no live source for this yet.
pub fn screentime_modes() -> Vec<ScreentimeMode> {
    vec![
        ScreentimeMode::new("Skeptical", 4 * 60 + 13),
        ScreentimeMode::new("Vibes", 6 * 60 + 30),
    ]
}
