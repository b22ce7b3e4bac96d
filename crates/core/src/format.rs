// crates/core/src/format.rs
//! Display formatting for aggregate rows.
//!
//! Engagement is shown as time on platform, estimated from post counts at a
//! fixed rate of two records per minute.

use crate::types::{CategoryCount, CommunityCount, DisplayRecord};

/// Minutes of platform time represented by a single activity record.
pub const MINUTES_PER_RECORD: u64 = 2;

/// Render an estimated time-on-platform string for a post count.
///
/// `total_minutes = post_count * 2`, then floor division into hours and
/// minutes: `format_duration(211) == "7h 2m"`.
pub fn format_duration(post_count: u64) -> String {
    format_minutes(post_count.saturating_mul(MINUTES_PER_RECORD))
}

/// Render a minute total as `"{h}h {m}m"`.
pub fn format_minutes(total_minutes: u64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{}h {}m", hours, minutes)
}

/// Title-case a raw label for display.
///
/// The first letter of every alphabetic run is upper-cased and the rest of
/// the run lower-cased, so `"world news"` becomes `"World News"` and
/// `"askSingapore"` becomes `"Asksingapore"`.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// A display row for `count` records, label used as given.
pub fn display_record(label: impl Into<String>, count: u64) -> DisplayRecord {
    DisplayRecord {
        label: label.into(),
        value: count,
        duration: format_duration(count),
    }
}

/// Display rows for the category distribution, one per label, in input order.
pub fn category_records(rows: &[CategoryCount]) -> Vec<DisplayRecord> {
    rows.iter()
        .map(|row| display_record(title_case(&row.label), row.post_count))
        .collect()
}

/// Display rows for the community ranking, one per community, in input order.
pub fn community_records(rows: &[CommunityCount]) -> Vec<DisplayRecord> {
    rows.iter()
        .map(|row| display_record(title_case(&row.community), row.post_count))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
