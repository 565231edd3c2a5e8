//! Dataset normalizer: turns a raw string table into the canonical plant table.
//!
//! Categorical columns (status, type, country/area, region) are trimmed and
//! title-cased so that `" operating "` and `"Operating"` select the same rows.
//! Year columns are coerced to integers; anything that does not parse becomes
//! missing rather than a placeholder value.

use crate::error::LoadError;
use crate::models::PlantRecord;
use ahash::AHashSet;
use log::info;

pub const COL_NAME: &str = "Plant / Project name";
pub const COL_STATUS: &str = "Status";
pub const COL_TYPE: &str = "Type";
pub const COL_COUNTRY: &str = "Country/area";
pub const COL_REGION: &str = "Region";
pub const COL_START_YEAR: &str = "Start year";
pub const COL_RETIRED_YEAR: &str = "Retired year";
pub const COL_CAPACITY: &str = "Capacity (MW)";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_NAME,
    COL_STATUS,
    COL_TYPE,
    COL_COUNTRY,
    COL_REGION,
    COL_START_YEAR,
    COL_RETIRED_YEAR,
    COL_CAPACITY,
    COL_LATITUDE,
    COL_LONGITUDE,
];

/// Raw tabular input as handed over by a data source: column names plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    fn column_index(&self, name: &str) -> Result<usize, LoadError> {
        self.columns
            .iter()
            .position(|c| c.trim() == name)
            .ok_or_else(|| LoadError::MissingField(name.to_string()))
    }
}

/// Canonical, read-only plant table. Built once, then shared by every pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<PlantRecord>,
}

struct ColumnMap {
    name: usize,
    status: usize,
    plant_type: usize,
    country: usize,
    region: usize,
    start_year: usize,
    retired_year: usize,
    capacity: usize,
    latitude: usize,
    longitude: usize,
}

impl ColumnMap {
    fn resolve(table: &RawTable) -> Result<Self, LoadError> {
        Ok(Self {
            name: table.column_index(COL_NAME)?,
            status: table.column_index(COL_STATUS)?,
            plant_type: table.column_index(COL_TYPE)?,
            country: table.column_index(COL_COUNTRY)?,
            region: table.column_index(COL_REGION)?,
            start_year: table.column_index(COL_START_YEAR)?,
            retired_year: table.column_index(COL_RETIRED_YEAR)?,
            capacity: table.column_index(COL_CAPACITY)?,
            latitude: table.column_index(COL_LATITUDE)?,
            longitude: table.column_index(COL_LONGITUDE)?,
        })
    }
}

impl Dataset {
    /// Normalize a raw table. Fails fast when a required column is absent.
    pub fn from_raw(table: &RawTable) -> Result<Self, LoadError> {
        let cols = ColumnMap::resolve(table)?;
        let records: Vec<PlantRecord> = table
            .rows
            .iter()
            .map(|row| {
                let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
                PlantRecord {
                    name: cell(cols.name).trim().to_string(),
                    status: title_case(cell(cols.status)),
                    plant_type: title_case(cell(cols.plant_type)),
                    country: title_case(cell(cols.country)),
                    region: title_case(cell(cols.region)),
                    start_year: coerce_year(cell(cols.start_year)),
                    retired_year: coerce_year(cell(cols.retired_year)),
                    capacity_mw: coerce_number(cell(cols.capacity)).unwrap_or(0.0),
                    latitude: coerce_number(cell(cols.latitude)),
                    longitude: coerce_number(cell(cols.longitude)),
                }
            })
            .collect();

        let dataset = Self { records };
        info!(
            "normalized {} plant records ({} statuses, {} types)",
            dataset.len(),
            dataset.statuses().len(),
            dataset.types().len()
        );
        Ok(dataset)
    }

    /// Wrap records that are already in canonical form.
    pub fn from_records(records: Vec<PlantRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PlantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct statuses in first-seen order.
    pub fn statuses(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.status.as_str()))
    }

    /// Distinct technology types in first-seen order.
    pub fn types(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.plant_type.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

/// Trim and title-case: first letter of every alphabetic run upper-case, the rest lower-case.
///
/// `" oil/gas "` becomes `"Oil/Gas"`, `"CÔTE D'IVOIRE"` becomes `"Côte D'Ivoire"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.trim().chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Parse a year cell. Accepts `2020` and `2020.0`; anything else is missing.
pub fn coerce_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    coerce_number(s)
        .filter(|v| v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64)
        .map(|v| v as i32)
}

/// Parse a numeric cell, treating empty or non-finite input as missing.
pub fn coerce_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
