//! Capacity range synchronization.
//!
//! The capacity control works on per-geography totals of the *currently filtered*
//! rows, so its upper bound and tick marks move with every filter change.

use crate::models::{CapacityWindow, GeographyKey, GeographyTotal, PlantRecord};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of tick marks on the capacity control.
pub const CAPACITY_MARK_COUNT: usize = 10;

/// Headroom applied to the largest geography total when deriving the bound.
pub const BOUND_MARGIN: f64 = 1.01;

/// How a previously chosen capacity window is reconciled with a new bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangePolicy {
    /// Replace only a missing or `[0, 0]` window with `[0, bound]`; keep any other window as is,
    /// even when it now exceeds the bound.
    #[default]
    KeepPrevious,
    /// Same as `KeepPrevious`, then pull both ends down to at most `bound`.
    ClampToBound,
}

/// One labeled tick on the capacity control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub position: f64,
    pub label: String,
}

/// Everything the capacity control needs after a filter change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synchronized {
    pub bound: f64,
    pub marks: Vec<Mark>,
    pub range: CapacityWindow,
    pub totals: Vec<GeographyTotal>,
}

/// Sum capacity per geography value, sorted by geography name.
///
/// Records with a blank geography belong to no group: they add to no total, and
/// [`restrict`] drops them from the chart and map rows.
pub fn geography_totals(subset: &[&PlantRecord], key: GeographyKey) -> Vec<GeographyTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for r in subset {
        let geography = r.geography(key);
        if geography.is_empty() {
            continue;
        }
        *sums.entry(geography).or_default() += r.capacity_mw;
    }
    sums.into_iter()
        .map(|(geography, capacity_mw)| GeographyTotal {
            geography: geography.to_string(),
            capacity_mw,
        })
        .collect()
}

/// `ceil(max_total * 1.01)`, or `0` when there are no totals.
pub fn capacity_bound(totals: &[GeographyTotal]) -> f64 {
    totals
        .iter()
        .map(|t| t.capacity_mw)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .map_or(0.0, |max| (max * BOUND_MARGIN).ceil())
}

/// Ten evenly spaced marks from `0` to `bound`, labeled in millions of MW.
///
/// Positions are `i * bound / 9` as computed, not truncated to whole MW.
/// With `bound == 0` every mark sits at position `0`.
pub fn capacity_marks(bound: f64) -> Vec<Mark> {
    let step = bound / (CAPACITY_MARK_COUNT - 1) as f64;
    (0..CAPACITY_MARK_COUNT)
        .map(|i| {
            let position = i as f64 * step;
            Mark {
                position,
                label: format_millions(position),
            }
        })
        .collect()
}

/// `1_234_567.0` -> `"1.23M"`.
pub fn format_millions(mw: f64) -> String {
    format!("{:.2}M", mw / 1e6)
}

/// Reconcile the previously chosen window against a freshly computed bound.
pub fn reconcile(
    previous: Option<CapacityWindow>,
    bound: f64,
    policy: RangePolicy,
) -> CapacityWindow {
    let kept = match previous {
        Some(w) if !w.is_sentinel() => w,
        _ => CapacityWindow::new(0.0, bound),
    };
    match policy {
        RangePolicy::KeepPrevious => kept,
        RangePolicy::ClampToBound => {
            let max = kept.max.min(bound);
            CapacityWindow::new(kept.min.min(max), max)
        }
    }
}

/// Derive totals, bound, marks, and the reconciled window for the filtered rows.
pub fn synchronize(
    subset: &[&PlantRecord],
    key: GeographyKey,
    previous: Option<CapacityWindow>,
    policy: RangePolicy,
) -> Synchronized {
    let totals = geography_totals(subset, key);
    let bound = capacity_bound(&totals);
    Synchronized {
        bound,
        marks: capacity_marks(bound),
        range: reconcile(previous, bound, policy),
        totals,
    }
}

/// Keep only geographies whose total lies inside `range`, then the rows belonging to them.
///
/// Rows are matched on geography value alone: a small plant survives when its
/// geography's total is in range.
pub fn restrict<'a>(
    subset: &[&'a PlantRecord],
    totals: &[GeographyTotal],
    key: GeographyKey,
    range: CapacityWindow,
) -> (Vec<GeographyTotal>, Vec<&'a PlantRecord>) {
    let narrowed: Vec<GeographyTotal> = totals
        .iter()
        .filter(|t| range.contains(t.capacity_mw))
        .cloned()
        .collect();
    let keep: AHashSet<&str> = narrowed.iter().map(|t| t.geography.as_str()).collect();
    let rows = subset
        .iter()
        .copied()
        .filter(|r| keep.contains(r.geography(key)))
        .collect();
    (narrowed, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_cover_zero_to_bound() {
        let marks = capacity_marks(9_000_000.0);
        assert_eq!(marks.len(), CAPACITY_MARK_COUNT);
        assert_eq!(marks[0].position, 0.0);
        assert_eq!(marks[0].label, "0.00M");
        assert_eq!(marks[1].label, "1.00M");
        assert_eq!(marks[9].position, 9_000_000.0);
        assert_eq!(marks[9].label, "9.00M");
    }

    #[test]
    fn zero_bound_yields_ten_marks_at_origin() {
        let marks = capacity_marks(0.0);
        assert_eq!(marks.len(), 10);
        assert!(marks.iter().all(|m| m.position == 0.0 && m.label == "0.00M"));
    }

    #[test]
    fn bound_adds_one_percent_and_rounds_up() {
        let totals = vec![
            GeographyTotal {
                geography: "A".into(),
                capacity_mw: 1000.0,
            },
            GeographyTotal {
                geography: "B".into(),
                capacity_mw: 250.5,
            },
        ];
        assert_eq!(capacity_bound(&totals), 1010.0);
        assert_eq!(capacity_bound(&[]), 0.0);
    }

    #[test]
    fn sentinel_or_missing_window_expands_to_bound() {
        assert_eq!(
            reconcile(None, 500.0, RangePolicy::KeepPrevious),
            CapacityWindow::new(0.0, 500.0)
        );
        assert_eq!(
            reconcile(Some(CapacityWindow::SENTINEL), 500.0, RangePolicy::KeepPrevious),
            CapacityWindow::new(0.0, 500.0)
        );
    }

    #[test]
    fn explicit_window_is_not_clamped_by_default() {
        let prev = CapacityWindow::new(100.0, 2_500_000.0);
        assert_eq!(reconcile(Some(prev), 500.0, RangePolicy::KeepPrevious), prev);
        assert_eq!(
            reconcile(Some(prev), 500.0, RangePolicy::ClampToBound),
            CapacityWindow::new(100.0, 500.0)
        );
        assert_eq!(
            reconcile(Some(CapacityWindow::new(800.0, 900.0)), 500.0, RangePolicy::ClampToBound),
            CapacityWindow::new(500.0, 500.0)
        );
    }

    #[test]
    fn blank_geography_is_not_a_group() {
        let rec = |country: &str, mw: f64| PlantRecord {
            name: format!("{country} plant"),
            status: "Operating".into(),
            plant_type: "Solar".into(),
            country: country.into(),
            region: "Americas".into(),
            start_year: Some(2000),
            retired_year: None,
            capacity_mw: mw,
            latitude: Some(-30.0),
            longitude: Some(-70.0),
        };
        let data = [rec("Chile", 100.0), rec("", 900.0)];
        let subset: Vec<&PlantRecord> = data.iter().collect();

        let sync = synchronize(&subset, GeographyKey::Country, None, RangePolicy::KeepPrevious);
        assert_eq!(sync.totals.len(), 1);
        assert_eq!(sync.totals[0].geography, "Chile");
        assert_eq!(sync.bound, 101.0);

        let (kept, rows) = restrict(&subset, &sync.totals, GeographyKey::Country, sync.range);
        assert_eq!(kept.len(), 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "Chile");

        // region grouping still counts the row
        let by_region = geography_totals(&subset, GeographyKey::Region);
        assert_eq!(by_region[0].capacity_mw, 1000.0);
    }

    #[test]
    fn mark_positions_keep_fractions() {
        let marks = capacity_marks(100.0);
        assert!((marks[1].position - 100.0 / 9.0).abs() < 1e-9);
        assert!((marks[9].position - 100.0).abs() < 1e-9);
    }
}
