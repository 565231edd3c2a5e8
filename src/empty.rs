//! The single place where "no matching geographies" is turned into output.

use crate::view::{CapacityControl, ChartOutput, DashboardView, MapOutput};

pub const NO_DATA_TITLE: &str = "No data available for the selected filters.";

/// Explicitly empty view. The capacity control stays usable so the user can widen the window.
pub fn empty_view(control: CapacityControl) -> DashboardView {
    DashboardView {
        control,
        totals: Vec::new(),
        chart: ChartOutput::NoData {
            title: NO_DATA_TITLE.to_string(),
        },
        map: MapOutput::NoData {
            title: NO_DATA_TITLE.to_string(),
        },
    }
}
