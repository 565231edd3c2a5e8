//! Filter engine: status, type, and year-window selection over the canonical table.

use crate::models::{PlantRecord, YearWindow};
use ahash::AHashSet;

/// Select the records matching every criterion, preserving table order.
///
/// A record passes when its status and type are selected, it has started by
/// `years.max`, and it is not retired before `years.min`. A missing start year
/// fails the year test; a missing retired year means "not retired" and passes.
/// An empty status or type selection yields an empty subset.
pub fn filter<'a, S: AsRef<str>>(
    records: &'a [PlantRecord],
    statuses: &[S],
    types: &[S],
    years: YearWindow,
) -> Vec<&'a PlantRecord> {
    let statuses: AHashSet<&str> = statuses.iter().map(|s| s.as_ref()).collect();
    let types: AHashSet<&str> = types.iter().map(|t| t.as_ref()).collect();
    records
        .iter()
        .filter(|r| statuses.contains(r.status.as_str()))
        .filter(|r| types.contains(r.plant_type.as_str()))
        .filter(|r| in_year_window(r, years))
        .collect()
}

/// Year-window test alone: started by `max`, and still running at `min`.
pub fn in_year_window(record: &PlantRecord, years: YearWindow) -> bool {
    let started = matches!(record.start_year, Some(y) if y <= years.max);
    let not_retired = record.retired_year.is_none_or(|y| y >= years.min);
    started && not_retired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(status: &str, start: Option<i32>, retired: Option<i32>) -> PlantRecord {
        PlantRecord {
            name: "P".into(),
            status: status.into(),
            plant_type: "Wind".into(),
            country: "Spain".into(),
            region: "Europe".into(),
            start_year: start,
            retired_year: retired,
            capacity_mw: 50.0,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn year_window_edges_are_inclusive() {
        let w = YearWindow::new(2000, 2020);
        assert!(in_year_window(&rec("Operating", Some(2020), None), w));
        assert!(in_year_window(&rec("Operating", Some(1980), Some(2000)), w));
        assert!(!in_year_window(&rec("Operating", Some(1980), Some(1999)), w));
        assert!(!in_year_window(&rec("Operating", Some(2021), None), w));
        assert!(!in_year_window(&rec("Operating", None, None), w));
    }

    #[test]
    fn empty_selection_is_an_empty_subset() {
        let rows = vec![rec("Operating", Some(2000), None)];
        let none: [&str; 0] = [];
        assert!(filter(&rows, &none, &["Wind"], YearWindow::new(1900, 2100)).is_empty());
        assert!(filter(&rows, &["Operating"], &none, YearWindow::new(1900, 2100)).is_empty());
    }
}
