use crate::aggregate::ChartTable;
use crate::models::GeographyTotal;
use crate::view::MapPoint;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn safe_cell(s: &str) -> Cow<'_, str> {
    if s.starts_with(['=', '+', '-', '@']) {
        Cow::Owned(format!("'{s}"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Save the chart rows as CSV with header (`geography,type,value,label`).
pub fn save_chart_csv<P: AsRef<Path>>(table: &ChartTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize((table.geography.label(), "type", "value", "label"))?;
    for r in &table.rows {
        wtr.serialize((
            safe_cell(&r.geography),
            safe_cell(&r.plant_type),
            r.value,
            &r.label,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save map points as CSV with header.
pub fn save_map_csv<P: AsRef<Path>>(points: &[MapPoint], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("name", "type", "capacity_mw", "latitude", "longitude"))?;
    for p in points {
        wtr.serialize((
            safe_cell(&p.name),
            safe_cell(&p.plant_type),
            p.capacity_mw,
            p.latitude,
            p.longitude,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save per-geography totals as CSV with header.
pub fn save_totals_csv<P: AsRef<Path>>(totals: &[GeographyTotal], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("geography", "capacity_mw"))?;
    for t in totals {
        wtr.serialize((safe_cell(&t.geography), t.capacity_mw))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any output as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
