//! Outputs handed to the rendering side: capacity control, chart table, map points.

use crate::aggregate::ChartTable;
use crate::capacity::{Mark, Synchronized};
use crate::models::{CapacityWindow, GeographyTotal, PlantRecord};
use serde::{Deserialize, Serialize};

/// Descriptor of the capacity range control: `{min: 0, max: bound, value, marks}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityControl {
    pub min: f64,
    pub max: f64,
    pub value: CapacityWindow,
    pub marks: Vec<Mark>,
}

impl From<&Synchronized> for CapacityControl {
    fn from(s: &Synchronized) -> Self {
        Self {
            min: 0.0,
            max: s.bound,
            value: s.range,
            marks: s.marks.clone(),
        }
    }
}

/// One surviving plant on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    pub capacity_mw: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&PlantRecord> for MapPoint {
    fn from(r: &PlantRecord) -> Self {
        Self {
            name: r.name.clone(),
            plant_type: r.plant_type.clone(),
            capacity_mw: r.capacity_mw,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

impl MapPoint {
    /// Both coordinates, when present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartOutput {
    Table(ChartTable),
    NoData { title: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapOutput {
    Points(Vec<MapPoint>),
    NoData { title: String },
}

/// Result of one pipeline run. Either both chart and map carry data, or both
/// carry the no-data placeholder; the capacity control is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub control: CapacityControl,
    /// Geography totals that survived the capacity window.
    pub totals: Vec<GeographyTotal>,
    pub chart: ChartOutput,
    pub map: MapOutput,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        matches!(self.chart, ChartOutput::NoData { .. })
    }

    pub fn chart_table(&self) -> Option<&ChartTable> {
        match &self.chart {
            ChartOutput::Table(t) => Some(t),
            ChartOutput::NoData { .. } => None,
        }
    }

    pub fn map_points(&self) -> &[MapPoint] {
        match &self.map {
            MapOutput::Points(p) => p,
            MapOutput::NoData { .. } => &[],
        }
    }
}
