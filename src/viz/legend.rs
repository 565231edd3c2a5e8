//! Horizontal legend band drawn under the chart or map.
//!
//! Items flow left to right starting at the plot's x-axis and wrap onto new rows
//! when the band runs out of width. Labels longer than a third of the band are
//! truncated with an ellipsis.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, truncate_to_width};

const FONT_PX: u32 = 14;
const LINE_H: i32 = FONT_PX as i32 + 6;
const PAD: i32 = 8;
const SWATCH: i32 = 10;
const SWATCH_GAP: i32 = 6;
const ITEM_GAP: i32 = 16;

fn label_cap_px(start_x: i32, total_w: i32) -> u32 {
    (((total_w - start_x - PAD) as f32) * 0.33).max(80.0) as u32
}

/// Lay items out in rows; returns the label text and top-left of each swatch.
fn layout(labels: &[&str], start_x: i32, total_w: i32) -> Vec<(String, i32, i32)> {
    let cap = label_cap_px(start_x, total_w);
    let mut out = Vec::with_capacity(labels.len());
    let (mut x, mut y) = (start_x, PAD);
    for label in labels {
        let text = truncate_to_width(label, FONT_PX, cap);
        let block = SWATCH + SWATCH_GAP + estimate_text_width_px(&text, FONT_PX) as i32 + ITEM_GAP;
        if x + block > total_w - PAD && x > start_x {
            x = start_x;
            y += LINE_H;
        }
        out.push((text, x, y));
        x += block;
    }
    out
}

/// Height the band needs for these labels.
pub fn legend_height_px(labels: &[&str], start_x: i32, total_w: i32) -> i32 {
    let rows = layout(labels, start_x, total_w)
        .last()
        .map_or(0, |(_, _, y)| (y - PAD) / LINE_H + 1);
    PAD * 2 + rows * LINE_H
}

/// Draw colored swatches with labels into `area`.
pub fn draw_legend_band<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    start_x: i32,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (w, _) = area.dim_in_pixel();
    let labels: Vec<&str> = items.iter().map(|(l, _)| l.as_str()).collect();
    let style =
        TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    for ((text, x, y), (_, color)) in layout(&labels, start_x, w as i32).into_iter().zip(items) {
        let cy = y + LINE_H / 2;
        area.draw(&Rectangle::new(
            [(x, cy - SWATCH / 2), (x + SWATCH, cy + SWATCH / 2)],
            color.filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Text::new(text, (x + SWATCH + SWATCH_GAP, cy), style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_when_band_is_full() {
        let labels = ["Bioenergy", "Coal", "Geothermal", "Hydropower", "Nuclear", "Oil/Gas"];
        let one_row = legend_height_px(&labels, 0, 2000);
        let narrow = legend_height_px(&labels, 0, 300);
        assert_eq!(one_row, PAD * 2 + LINE_H);
        assert!(narrow > one_row);
    }

    #[test]
    fn empty_legend_has_only_padding() {
        assert_eq!(legend_height_px(&[], 40, 800), PAD * 2);
    }
}
