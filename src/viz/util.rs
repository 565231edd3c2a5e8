//! Colors and layout helpers shared by the chart and the map.

use plotters::prelude::*;
use std::collections::BTreeMap;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Assign palette colors to technology types by sorted name, so the chart and
/// the map built from the same rows color every type identically.
pub fn type_colors<'a>(types: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, RGBAColor> {
    let mut names: Vec<&str> = types.into_iter().collect();
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), office_color(i)))
        .collect()
}

/// Width of the category label gutter for the given labels, clamped to a sane range.
pub fn label_gutter_px(labels: &[String], font_px: u32) -> u32 {
    let widest = labels
        .iter()
        .map(|l| estimate_text_width_px(l, font_px))
        .max()
        .unwrap_or(0);
    widest.saturating_add(18).clamp(48, 220)
}
