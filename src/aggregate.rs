//! Aggregation of the range-filtered rows into a chart-ready table.

use crate::capacity::format_millions;
use crate::models::{AggregatedRow, GeographyKey, PlantRecord, ViewMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const AXIS_TITLE_ABSOLUTE: &str = "Total Capacity (Million MW)";
pub const AXIS_TITLE_PERCENTAGE: &str = "Percentage Share (%)";

/// Group by (geography, type) and sum capacity. In percentage view each row's
/// value becomes its share (0–100) of the geography's grand total.
///
/// Rows come out sorted by geography, then type. A geography whose grand total
/// is zero reports a 0% share for each of its types. Records with a blank
/// geography are skipped, matching [`crate::capacity::geography_totals`].
pub fn aggregate(rows: &[&PlantRecord], key: GeographyKey, view: ViewMode) -> Vec<AggregatedRow> {
    let mut groups: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for r in rows.iter().filter(|r| !r.geography(key).is_empty()) {
        *groups
            .entry((r.geography(key), r.plant_type.as_str()))
            .or_default() += r.capacity_mw;
    }

    let mut grand: BTreeMap<&str, f64> = BTreeMap::new();
    for ((geo, _), mw) in &groups {
        *grand.entry(*geo).or_default() += *mw;
    }

    groups
        .into_iter()
        .map(|((geo, ty), mw)| {
            let total = grand.get(geo).copied().unwrap_or(0.0);
            let value = match view {
                ViewMode::Absolute => mw,
                ViewMode::Percentage if total > 0.0 => 100.0 * mw / total,
                ViewMode::Percentage => 0.0,
            };
            AggregatedRow {
                geography: geo.to_string(),
                plant_type: ty.to_string(),
                value,
                geography_total_mw: total,
            }
        })
        .collect()
}

/// Text shown next to a bar segment.
pub fn value_label(value: f64, view: ViewMode) -> String {
    match view {
        ViewMode::Absolute => format_millions(value),
        ViewMode::Percentage => format!("{value:.1}%"),
    }
}

pub fn axis_title(view: ViewMode) -> &'static str {
    match view {
        ViewMode::Absolute => AXIS_TITLE_ABSOLUTE,
        ViewMode::Percentage => AXIS_TITLE_PERCENTAGE,
    }
}

/// One bar segment of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub geography: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    pub value: f64,
    pub label: String,
}

/// Chart-ready table: rows plus the presentation metadata the chart needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTable {
    pub title: String,
    pub axis_title: String,
    pub geography: GeographyKey,
    pub view: ViewMode,
    pub rows: Vec<ChartRow>,
}

impl ChartTable {
    pub fn from_rows(rows: &[AggregatedRow], key: GeographyKey, view: ViewMode) -> Self {
        Self {
            title: format!("Power Generation Capacity by {}", key.label()),
            axis_title: axis_title(view).to_string(),
            geography: key,
            view,
            rows: rows
                .iter()
                .map(|r| ChartRow {
                    geography: r.geography.clone(),
                    plant_type: r.plant_type.clone(),
                    value: r.value,
                    label: value_label(r.value, view),
                })
                .collect(),
        }
    }

    /// Geographies ordered by ascending sum of displayed values (ties by name).
    pub fn categories_by_total(&self) -> Vec<(String, f64)> {
        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        for r in &self.rows {
            *sums.entry(r.geography.as_str()).or_default() += r.value;
        }
        let mut out: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(g, v)| (g.to_string(), v))
            .collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Distinct types in sorted order, the legend order of the chart.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.rows.iter().map(|r| r.plant_type.as_str()).collect();
        types.sort_unstable();
        types.dedup();
        types
    }
}
