//! ppcap
//!
//! Filtering, aggregation, and capacity-range synchronization for global
//! power-generation capacity records. Pairs with the `ppcap` CLI.
//!
//! ### Features
//! - Normalize a raw plant table (title-cased categories, numeric-or-missing years)
//! - Filter by status, technology type, and year window
//! - Per-geography totals driving a capacity range control with dynamic bound and ten marks
//! - Group by (geography, type) in megawatts or as percentage share
//! - Save chart/map tables as CSV or JSON; render SVG/PNG bar charts and point maps
//!
//! ### Example
//! ```no_run
//! use std::sync::Arc;
//! use ppcap::{Engine, GeographyKey, ViewMode};
//!
//! let dataset = ppcap::source::load_csv("plants.csv")?;
//! let engine = Engine::new(Arc::new(dataset));
//! let mut criteria = engine.default_criteria();
//! criteria.geography = GeographyKey::Region;
//! criteria.view = ViewMode::Percentage;
//! let view = engine.run(&criteria);
//! println!("capacity bound: {}", view.control.max);
//! ppcap::viz::render_chart(&view.chart, "capacity.svg", 1000, 600)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod capacity;
pub mod empty;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod ranges;
pub mod source;
pub mod storage;
pub mod view;
pub mod viz;

pub use capacity::RangePolicy;
pub use error::LoadError;
pub use models::{CapacityWindow, FilterCriteria, GeographyKey, PlantRecord, ViewMode, YearWindow};
pub use normalize::{Dataset, RawTable};
pub use pipeline::Engine;
pub use view::{ChartOutput, DashboardView, MapOutput};
