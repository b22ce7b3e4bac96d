// crates/core/src/charts.rs
//! Declarative chart specifications.
//!
//! Builders here only translate display rows into a serializable shape; the
//! renderer on the other side of the API decides how to draw it.

use serde::{Deserialize, Serialize};

use crate::format::format_minutes;
use crate::types::{DisplayRecord, ScreentimeMode};

pub const SPECTRUM_COLORS: [&str; 3] = ["#e80c25", "#2F66B2", "#696969"];
pub const SCREENTIME_COLORS: [&str; 2] = ["#4CAF50", "#dc3545"];
pub const COMMUNITY_BAR_COLOR: &str = "#FF4500";

/// A renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie(PieChart),
    Bar(BarChart),
}

/// Pie or donut chart. `hole == 0.0` is a plain pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Per-slice hover text, aligned with `labels`.
    pub hover_text: Vec<String>,
    /// Per-slice fill colors, aligned with `labels`.
    pub colors: Vec<String>,
    pub hole: f64,
    pub text_info: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// Free-floating text placed in paper coordinates (0..1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: u32,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    pub orientation: Orientation,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    /// Text drawn on each bar.
    pub text: Vec<String>,
    pub color: String,
    pub value_axis_title: String,
}

fn cycle_colors(palette: &[&str], n: usize) -> Vec<String> {
    palette
        .iter()
        .cycle()
        .take(n)
        .map(|c| c.to_string())
        .collect()
}

/// Political-spectrum donut: one slice per record, hover shows time on platform.
pub fn political_spectrum_pie(records: &[DisplayRecord]) -> ChartSpec {
    ChartSpec::Pie(PieChart {
        labels: records.iter().map(|r| r.label.clone()).collect(),
        values: records.iter().map(|r| r.value as f64).collect(),
        hover_text: records.iter().map(|r| r.duration.clone()).collect(),
        colors: cycle_colors(&SPECTRUM_COLORS, records.len()),
        hole: 0.4,
        text_info: "percent+label".to_string(),
        annotations: Vec::new(),
    })
}

/// Horizontal bar ranking.
///
/// Bars are emitted in ascending order of count so the renderer, which stacks
/// categories bottom-up, puts the largest community on top.
pub fn top_communities_bar(records: &[DisplayRecord]) -> ChartSpec {
    let mut sorted: Vec<&DisplayRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.value);

    ChartSpec::Bar(BarChart {
        orientation: Orientation::Horizontal,
        labels: sorted.iter().map(|r| r.label.clone()).collect(),
        values: sorted.iter().map(|r| r.value).collect(),
        text: sorted.iter().map(|r| r.value.to_string()).collect(),
        color: COMMUNITY_BAR_COLOR.to_string(),
        value_axis_title: "Number of Posts".to_string(),
    })
}

/// Screentime donut with the formatted total in the middle.
pub fn screentime_donut(modes: &[ScreentimeMode]) -> ChartSpec {
    let total_minutes: u64 = modes.iter().map(|m| m.minutes).sum();

    ChartSpec::Pie(PieChart {
        labels: modes.iter().map(|m| m.label.clone()).collect(),
        values: modes.iter().map(ScreentimeMode::hours).collect(),
        hover_text: modes.iter().map(|m| format_minutes(m.minutes)).collect(),
        colors: cycle_colors(&SCREENTIME_COLORS, modes.len()),
        hole: 0.5,
        text_info: "label+value".to_string(),
        annotations: vec![
            Annotation {
                text: format_minutes(total_minutes),
                x: 0.5,
                y: 0.5,
                font_size: 20,
                color: "#111827".to_string(),
            },
            Annotation {
                text: "Total Screentime".to_string(),
                x: 0.5,
                y: 0.42,
                font_size: 12,
                color: "#6b7280".to_string(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_duration;
    use pretty_assertions::assert_eq;

    fn record(label: &str, value: u64) -> DisplayRecord {
        DisplayRecord {
            label: label.to_string(),
            value,
            duration: format_duration(value),
        }
    }

    #[test]
    fn test_pie_one_slice_per_record() {
        let records = vec![record("Right", 65), record("Left", 42), record("Neutral", 20)];
        let ChartSpec::Pie(pie) = political_spectrum_pie(&records) else {
            panic!("expected pie");
        };
        assert_eq!(pie.labels, vec!["Right", "Left", "Neutral"]);
        assert_eq!(pie.values, vec![65.0, 42.0, 20.0]);
        assert_eq!(pie.hover_text, vec!["2h 10m", "1h 24m", "0h 40m"]);
        assert_eq!(pie.colors, vec!["#e80c25", "#2F66B2", "#696969"]);
        assert!(pie.annotations.is_empty());
    }

    #[test]
    fn test_pie_colors_cycle_past_palette() {
        let records: Vec<_> = (0..5).map(|i| record(&format!("l{i}"), i)).collect();
        let ChartSpec::Pie(pie) = political_spectrum_pie(&records) else {
            panic!("expected pie");
        };
        assert_eq!(pie.colors.len(), 5);
        assert_eq!(pie.colors[3], SPECTRUM_COLORS[0]);
    }

    #[test]
    fn test_bar_sorted_ascending() {
        let records = vec![record("Politics", 150), record("World News", 80), record("Us", 120)];
        let ChartSpec::Bar(bar) = top_communities_bar(&records) else {
            panic!("expected bar");
        };
        assert_eq!(bar.orientation, Orientation::Horizontal);
        assert_eq!(bar.labels, vec!["World News", "Us", "Politics"]);
        assert_eq!(bar.values, vec![80, 120, 150]);
        assert_eq!(bar.text, vec!["80", "120", "150"]);
    }

    #[test]
    fn test_bar_empty_input() {
        let ChartSpec::Bar(bar) = top_communities_bar(&[]) else {
            panic!("expected bar");
        };
        assert!(bar.labels.is_empty());
    }

    #[test]
    fn test_screentime_donut_total_annotation() {
        let modes = vec![
            ScreentimeMode::new("Skeptical", 253),
            ScreentimeMode::new("Vibes", 390),
        ];
        let ChartSpec::Pie(pie) = screentime_donut(&modes) else {
            panic!("expected pie");
        };
        assert_eq!(pie.hole, 0.5);
        assert_eq!(pie.hover_text, vec!["4h 13m", "6h 30m"]);
        assert_eq!(pie.annotations[0].text, "10h 43m");
        assert_eq!(pie.annotations[1].text, "Total Screentime");
    }

    #[test]
    fn test_chart_spec_tagged_serialization() {
        let json = serde_json::to_value(top_communities_bar(&[record("A", 1)])).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["orientation"], "horizontal");
        assert_eq!(json["valueAxisTitle"], "Number of Posts");
    }
}
