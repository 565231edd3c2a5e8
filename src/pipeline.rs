//! Per-request pipeline: filter, synchronize the capacity control, narrow by
//! capacity window, then aggregate (or hand over to the empty state).
//!
//! The engine owns a shared, read-only [`Dataset`] and holds no other state, so
//! one engine can serve any number of runs, from any thread.

use crate::aggregate::{ChartTable, aggregate};
use crate::capacity::{RangePolicy, restrict, synchronize};
use crate::empty::empty_view;
use crate::filter::filter;
use crate::models::{CapacityWindow, FilterCriteria, GeographyKey, ViewMode, YearWindow};
use crate::normalize::Dataset;
use crate::ranges::YearBounds;
use crate::view::{CapacityControl, ChartOutput, DashboardView, MapOutput, MapPoint};
use log::debug;
use std::sync::Arc;

/// Status selected before the user touches the status filter.
pub const DEFAULT_STATUS: &str = "Operating";

/// Capacity window the interactive dashboard opens with, in MW.
pub const DASHBOARD_CAPACITY_WINDOW: CapacityWindow = CapacityWindow {
    min: 100_000.0,
    max: 2_500_000.0,
};

#[derive(Debug, Clone)]
pub struct Engine {
    dataset: Arc<Dataset>,
    years: Option<YearBounds>,
    policy: RangePolicy,
}

impl Engine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let years = YearBounds::derive(&dataset);
        Self {
            dataset,
            years,
            policy: RangePolicy::default(),
        }
    }

    /// Choose how an explicit capacity window reacts to a shrinking bound.
    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Year bounds derived once at construction.
    pub fn year_bounds(&self) -> Option<YearBounds> {
        self.years
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Initial selection: operating plants of every type over the full year range,
    /// no capacity window yet, grouped by country/area in megawatts.
    pub fn default_criteria(&self) -> FilterCriteria {
        let years = self
            .years
            .map(|b| b.window())
            .unwrap_or(YearWindow::new(i32::MIN, i32::MAX));
        FilterCriteria {
            statuses: vec![DEFAULT_STATUS.to_string()],
            types: self.dataset.types().into_iter().map(String::from).collect(),
            years,
            capacity: None,
            geography: GeographyKey::default(),
            view: ViewMode::default(),
        }
    }

    /// [`Engine::default_criteria`] with the capacity control preset to
    /// [`DASHBOARD_CAPACITY_WINDOW`], the dashboard's opening state.
    pub fn dashboard_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            capacity: Some(DASHBOARD_CAPACITY_WINDOW),
            ..self.default_criteria()
        }
    }

    /// Recompute every derived output for `criteria`.
    pub fn run(&self, criteria: &FilterCriteria) -> DashboardView {
        let key = criteria.geography;
        let subset = filter(
            self.dataset.records(),
            &criteria.statuses,
            &criteria.types,
            criteria.years,
        );
        let sync = synchronize(&subset, key, criteria.capacity, self.policy);
        let control = CapacityControl::from(&sync);
        let (totals, rows) = restrict(&subset, &sync.totals, key, sync.range);
        debug!(
            "pipeline: {} filtered rows, {} geographies, bound {}, {} in window [{}, {}]",
            subset.len(),
            sync.totals.len(),
            sync.bound,
            totals.len(),
            sync.range.min,
            sync.range.max
        );

        if totals.is_empty() {
            debug!("pipeline: no geographies in window, returning empty view");
            return empty_view(control);
        }

        let aggregated = aggregate(&rows, key, criteria.view);
        DashboardView {
            control,
            totals,
            chart: ChartOutput::Table(ChartTable::from_rows(&aggregated, key, criteria.view)),
            map: MapOutput::Points(rows.iter().map(|r| MapPoint::from(*r)).collect()),
        }
    }
}
