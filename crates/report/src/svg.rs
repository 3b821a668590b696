//! SVG bar charts for [`ChartData`].
//!
//! Logarithmic charts are drawn on a linear axis over `log10(value)` with
//! decade tick labels, so both modes share one coordinate type.

use std::path::Path;

use benchplot_core::ChartData;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::error::Result;
use crate::format::{axis_description, format_value};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;

const TITLE_FONT_SIZE: u32 = 28;
const AXIS_LABEL_FONT_SIZE: u32 = 18;
const TICK_LABEL_FONT_SIZE: u32 = 14;
const DATA_LABEL_FONT_SIZE: u32 = 13;

const BAR_HALF_WIDTH: f64 = 0.35;
const BAR_COLOR: RGBColor = RGBColor(42, 157, 143);
const LABEL_COLOR: RGBColor = RGBColor(38, 70, 83);

/// Vertical extent of the value axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueAxis {
    log: bool,
    floor: f64,
    top: f64,
}

impl ValueAxis {
    fn for_data(data: &ChartData) -> Self {
        let max = data.max_value();
        match data.min_positive() {
            Some(min) if data.log_scale => {
                let floor = min.log10().floor();
                let high = max.log10();
                Self {
                    log: true,
                    floor,
                    top: high + (high - floor).max(1.0) * 0.15,
                }
            }
            _ => Self {
                log: false,
                floor: 0.0,
                top: if max > 0.0 { max * 1.2 } else { 1.0 },
            },
        }
    }

    fn position(&self, value: f64) -> f64 {
        if self.log {
            value.log10()
        } else {
            value
        }
    }

    fn label_offset(&self) -> f64 {
        (self.top - self.floor) * 0.01
    }

    fn tick_label(&self, y: f64, data: &ChartData) -> String {
        if !self.log {
            return format_value(y, data.selector);
        }
        // Only decades are labelled on log axes.
        let nearest = y.round();
        if (y - nearest).abs() < 1e-6 {
            format_value(10f64.powi(nearest as i32), data.selector)
        } else {
            String::new()
        }
    }
}

fn bar_label(names: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 0.3 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

/// Render `data` as a bar chart SVG at `path`.
///
/// An empty dataset yields a blank canvas.
pub fn render_bar_chart(data: &ChartData, title: &str, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    if data.is_empty() {
        root.present()?;
        return Ok(());
    }

    let axis = ValueAxis::for_data(data);
    let bars = data.len();
    let y_desc = if axis.log {
        format!("{} (log scale)", axis_description(data.selector))
    } else {
        axis_description(data.selector).to_string()
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(-0.5..(bars as f64 - 0.5), axis.floor..axis.top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars)
        .x_label_formatter(&|x| bar_label(&data.names, *x))
        .y_labels(8)
        .y_label_formatter(&|y| axis.tick_label(*y, data))
        .y_desc(y_desc)
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (idx, &value) in data.values.iter().enumerate() {
        if value <= 0.0 {
            continue;
        }
        let x = idx as f64;
        let height = axis.position(value);

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - BAR_HALF_WIDTH, axis.floor), (x + BAR_HALF_WIDTH, height)],
            BAR_COLOR.filled(),
        )))?;

        let mut label = format_value(value, data.selector);
        if let Some((selector, secondary)) = data.secondary_at(idx) {
            label = format!("{label} / {}", format_value(secondary, selector));
        }
        chart.draw_series(std::iter::once(Text::new(
            label,
            (x, height + axis.label_offset()),
            ("sans-serif", DATA_LABEL_FONT_SIZE)
                .into_font()
                .color(&LABEL_COLOR)
                .pos(Pos::new(HPos::Center, VPos::Bottom)),
        )))?;
    }

    root.present()?;
    debug!(path = %path.display(), bars, log_scale = axis.log, "Rendered chart");
    Ok(())
}
