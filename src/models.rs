use serde::{Deserialize, Serialize};
use std::fmt;

/// One power facility after normalization (one row = one plant or project unit).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantRecord {
    pub name: String,
    pub status: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    pub country: String,
    pub region: String,
    /// `None` when the source cell was empty or not a number.
    pub start_year: Option<i32>,
    /// `None` means "not retired".
    pub retired_year: Option<i32>,
    pub capacity_mw: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PlantRecord {
    /// Value of the geography column selected by `key`.
    pub fn geography(&self, key: GeographyKey) -> &str {
        match key {
            GeographyKey::Country => &self.country,
            GeographyKey::Region => &self.region,
        }
    }
}

/// Grouping dimension for totals, aggregation, and mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeographyKey {
    /// `Country/area` column.
    #[default]
    Country,
    /// `Region` column.
    Region,
}

impl GeographyKey {
    /// Column label as shown on chart axes and titles.
    pub fn label(self) -> &'static str {
        match self {
            GeographyKey::Country => "Country/area",
            GeographyKey::Region => "Region",
        }
    }
}

impl fmt::Display for GeographyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether chart values are absolute megawatts or a share of the geography total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Absolute,
    Percentage,
}

/// Inclusive year window `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub min: i32,
    pub max: i32,
}

impl YearWindow {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// Inclusive window over per-geography capacity totals, in MW.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityWindow {
    pub min: f64,
    pub max: f64,
}

impl CapacityWindow {
    /// Placeholder `[0, 0]` meaning "no explicit selection yet".
    pub const SENTINEL: CapacityWindow = CapacityWindow { min: 0.0, max: 0.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Full set of filter and view parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub statuses: Vec<String>,
    pub types: Vec<String>,
    pub years: YearWindow,
    /// Previously chosen capacity window; `None` when the control was never set.
    pub capacity: Option<CapacityWindow>,
    pub geography: GeographyKey,
    pub view: ViewMode,
}

/// Sum of capacity for one geography value over the currently filtered rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographyTotal {
    pub geography: String,
    pub capacity_mw: f64,
}

/// Summed capacity for one (geography, type) pair, with the geography's grand total.
///
/// In percentage view `value` holds the 0–100 share instead of megawatts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub geography: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    pub value: f64,
    pub geography_total_mw: f64,
}
