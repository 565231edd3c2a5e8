//! Static year bounds for the year control, derived once from the canonical table.

use crate::models::YearWindow;
use crate::normalize::Dataset;
use serde::{Deserialize, Serialize};

/// Spacing of the year control's tick marks.
pub const YEAR_MARK_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    /// Lower bound is the earliest start year. Upper bound is the latest retired year,
    /// or the latest start year when no record has retired.
    ///
    /// Returns `None` when no record carries a start year.
    pub fn derive(dataset: &Dataset) -> Option<Self> {
        let starts = dataset.records().iter().filter_map(|r| r.start_year);
        let min = starts.clone().min()?;
        let max = match dataset.records().iter().filter_map(|r| r.retired_year).max() {
            Some(retired) => retired,
            None => starts.max()?,
        };
        Some(Self { min, max })
    }

    /// Window covering the whole range, used as the initial year selection.
    pub fn window(&self) -> YearWindow {
        YearWindow::new(self.min, self.max)
    }

    /// Tick marks every five years from `min` (inclusive) up to `max` (exclusive).
    pub fn marks(&self) -> Vec<(i32, String)> {
        (self.min..self.max)
            .step_by(YEAR_MARK_STEP)
            .map(|y| (y, y.to_string()))
            .collect()
    }
}
