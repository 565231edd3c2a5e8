//! Rendering adapter: draw the chart table and the map points to **SVG** or **PNG**.
//!
//! - Horizontal stacked bars, one per geography, ordered by ascending total
//! - Segments colored by technology type (Microsoft Office palette), legend band below
//! - Map as a longitude/latitude scatter, marker area proportional to capacity
//! - The no-data placeholder renders as a blank canvas carrying its title

pub mod legend;
pub mod text;
pub mod util;

use crate::aggregate::ChartTable;
use crate::capacity::format_millions;
use crate::models::ViewMode;
use crate::view::{ChartOutput, MapOutput, MapPoint};
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;

use legend::{draw_legend_band, legend_height_px};
use text::{estimate_text_width_px, truncate_to_width};
use util::{label_gutter_px, office_color, type_colors};

/// Title of the map when it carries data.
pub const MAP_TITLE: &str = "Power Plant Locations";

const MARGIN: i32 = 16;
const LABEL_FONT_PX: u32 = 12;
const SEGMENT_FONT_PX: u32 = 11;
const MAX_GUTTER_TEXT_PX: u32 = 200;
const MIN_MARKER_PX: f64 = 2.0;
const MAX_MARKER_PX: f64 = 16.0;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn plot_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// Render the chart output (bars or no-data placeholder) to `out_path`.
pub fn render_chart<P: AsRef<Path>>(
    chart: &ChartOutput,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    if is_svg(out_path) {
        let root = SVGBackend::new(out_path, (width, height)).into_drawing_area();
        draw_chart_output(&root, chart)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(out_path, (width, height)).into_drawing_area();
        draw_chart_output(&root, chart)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// Render the map output (points or no-data placeholder) to `out_path`.
pub fn render_map<P: AsRef<Path>>(
    map: &MapOutput,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    if is_svg(out_path) {
        let root = SVGBackend::new(out_path, (width, height)).into_drawing_area();
        draw_map_output(&root, map)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(out_path, (width, height)).into_drawing_area();
        draw_map_output(&root, map)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn draw_chart_output<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartOutput,
) -> Result<()> {
    match chart {
        ChartOutput::Table(table) if !table.rows.is_empty() => draw_bars(root, table),
        ChartOutput::Table(_) => draw_no_data(root, crate::empty::NO_DATA_TITLE),
        ChartOutput::NoData { title } => draw_no_data(root, title),
    }
}

fn draw_map_output<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    map: &MapOutput,
) -> Result<()> {
    match map {
        MapOutput::Points(points) => draw_points(root, points),
        MapOutput::NoData { title } => draw_no_data(root, title),
    }
}

fn draw_no_data<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, title: &str) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    root.titled(title, (FontFamily::SansSerif, 20))
        .map_err(plot_err)?;
    Ok(())
}

/// Split off a legend band for `colors` at the bottom of `root`.
fn split_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    colors: &BTreeMap<String, RGBAColor>,
    axis_x_start_px: i32,
) -> (DrawingArea<DB, Shift>, DrawingArea<DB, Shift>) {
    let (w, h) = root.dim_in_pixel();
    let labels: Vec<&str> = colors.keys().map(String::as_str).collect();
    let band = legend_height_px(&labels, axis_x_start_px, w as i32);
    root.split_vertically((h as i32 - band).max(40))
}

fn draw_bars<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, table: &ChartTable) -> Result<()> {
    let categories = table.categories_by_total();
    let n = categories.len();
    let labels: Vec<String> = categories
        .iter()
        .map(|(g, _)| truncate_to_width(g, LABEL_FONT_PX, MAX_GUTTER_TEXT_PX))
        .collect();
    let index: BTreeMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, (g, _))| (g.as_str(), i))
        .collect();
    let colors = type_colors(table.rows.iter().map(|r| r.plant_type.as_str()));

    let x_max = match table.view {
        ViewMode::Percentage => 100.0,
        ViewMode::Absolute => categories.iter().map(|(_, v)| *v).fold(0.0, f64::max),
    };
    // room for the axis to breathe past the longest bar
    let x_max = if x_max > 0.0 { x_max * 1.05 } else { 1.0 };

    let gutter = label_gutter_px(&labels, LABEL_FONT_PX);
    let (plot_area, legend_area) = split_legend(root, &colors, MARGIN + gutter as i32);
    plot_area.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN as u32)
        .caption(table.title.as_str(), (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, gutter)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(0f64..x_max, -0.5f64..(n as f64 - 0.5))
        .map_err(plot_err)?;

    let view = table.view;
    let x_fmt = move |v: &f64| match view {
        ViewMode::Absolute => format_millions(*v),
        ViewMode::Percentage => format!("{v:.0}%"),
    };
    let y_fmt = |v: &f64| {
        let i = v.round();
        if (v - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < n {
            labels[i as usize].clone()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(table.axis_title.as_str())
        .y_desc(table.geography.label())
        .x_labels(8)
        .y_labels(n.max(1))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, LABEL_FONT_PX))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(plot_err)?;

    let segment_style = TextStyle::from((FontFamily::SansSerif, SEGMENT_FONT_PX))
        .pos(Pos::new(HPos::Center, VPos::Center));
    let mut offsets = vec![0.0f64; n];
    for row in &table.rows {
        let Some(&i) = index.get(row.geography.as_str()) else {
            continue;
        };
        let x0 = offsets[i];
        let x1 = x0 + row.value.max(0.0);
        offsets[i] = x1;
        let y = i as f64;
        let color = colors
            .get(&row.plant_type)
            .copied()
            .unwrap_or_else(|| office_color(0));
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x0, y - 0.4), (x1, y + 0.4)],
                color.filled(),
            )))
            .map_err(plot_err)?;

        // segment label only where it fits inside the bar
        let (px0, _) = chart.backend_coord(&(x0, y));
        let (px1, _) = chart.backend_coord(&(x1, y));
        if estimate_text_width_px(&row.label, SEGMENT_FONT_PX) as i32 + 4 < px1 - px0 {
            chart
                .draw_series(std::iter::once(Text::new(
                    row.label.clone(),
                    ((x0 + x1) / 2.0, y),
                    segment_style.clone(),
                )))
                .map_err(plot_err)?;
        }
    }

    let items: Vec<(String, RGBAColor)> = colors.into_iter().collect();
    draw_legend_band(&legend_area, &items, MARGIN + gutter as i32)?;
    Ok(())
}

/// Bounding box of the points, padded, clamped to the world.
fn map_extent(points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    let (mut x0, mut x1, mut y0, mut y1) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for (x, y) in points {
        x0 = x0.min(*x);
        x1 = x1.max(*x);
        y0 = y0.min(*y);
        y1 = y1.max(*y);
    }
    if points.is_empty() {
        return ((-180.0, 180.0), (-90.0, 90.0));
    }
    let pad_x = ((x1 - x0) * 0.05).max(2.0);
    let pad_y = ((y1 - y0) * 0.05).max(2.0);
    (
        ((x0 - pad_x).max(-180.0), (x1 + pad_x).min(180.0)),
        ((y0 - pad_y).max(-90.0), (y1 + pad_y).min(90.0)),
    )
}

fn marker_radius(capacity_mw: f64, max_capacity_mw: f64) -> i32 {
    if max_capacity_mw <= 0.0 {
        return MIN_MARKER_PX as i32;
    }
    let share = (capacity_mw.max(0.0) / max_capacity_mw).sqrt();
    (MIN_MARKER_PX + (MAX_MARKER_PX - MIN_MARKER_PX) * share).round() as i32
}

fn draw_points<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[MapPoint],
) -> Result<()> {
    let colors = type_colors(points.iter().map(|p| p.plant_type.as_str()));
    let gutter = 48u32;
    let (plot_area, legend_area) = split_legend(root, &colors, MARGIN + gutter as i32);
    plot_area.fill(&WHITE).map_err(plot_err)?;

    let mut located: Vec<(&MapPoint, (f64, f64))> = points
        .iter()
        .filter_map(|p| p.coordinates().map(|c| (p, c)))
        .collect();
    // large plants first so small markers stay visible on top
    located.sort_by(|a, b| b.0.capacity_mw.total_cmp(&a.0.capacity_mw));
    let coords: Vec<(f64, f64)> = located.iter().map(|(_, c)| *c).collect();
    let ((x0, x1), (y0, y1)) = map_extent(&coords);
    let max_capacity = located
        .iter()
        .map(|(p, _)| p.capacity_mw)
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN as u32)
        .caption(MAP_TITLE, (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, gutter)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .label_style((FontFamily::SansSerif, LABEL_FONT_PX))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(located.iter().map(|(p, c)| {
            let color = colors
                .get(&p.plant_type)
                .copied()
                .unwrap_or_else(|| office_color(0));
            Circle::new(
                *c,
                marker_radius(p.capacity_mw, max_capacity),
                color.mix(0.6).filled(),
            )
        }))
        .map_err(plot_err)?;

    let items: Vec<(String, RGBAColor)> = colors.into_iter().collect();
    draw_legend_band(&legend_area, &items, MARGIN + gutter as i32)?;
    Ok(())
}
