//! Line chart of one or more forecast series, written as SVG
//!
//! Series are overlaid by position, not by timestamp, so that the same hour
//! of different years lines up. Tick labels are taken from the longest series
//! and drawn at 45 degrees, which plotters' font transforms cannot express,
//! so they are added to the rendered document directly.

use super::escape_html;
use crate::models::{ForecastDays, ForecastSeries};
use crate::{Result, TripcastError};
use plotters::prelude::*;
use std::fs;
use std::path::Path;
use tracing::info;

pub const CHART_SIZE: (u32, u32) = (1280, 720);
pub const MAX_X_LABELS: usize = 10;
pub const TICK_LABEL_ANGLE: i32 = 45;

/// Gap between the x axis and the start of a tick label, in pixels
const TICK_LABEL_OFFSET: i32 = 10;

/// Caption shown above the chart
#[must_use]
pub fn chart_title(days: ForecastDays, city: &str) -> String {
    format!("{days} days Forecast for {city}")
}

/// Y range covering every value of every series, padded by 10%
#[must_use]
pub fn y_range(series: &[ForecastSeries]) -> (f64, f64) {
    let bounds = series
        .iter()
        .filter_map(ForecastSeries::value_bounds)
        .reduce(|(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)));

    match bounds {
        Some((min, max)) if (max - min).abs() > 1e-6 => {
            let padding = (max - min) * 0.1;
            (min - padding, max + padding)
        }
        Some((min, _)) => (min - 1.0, min + 1.0),
        None => (0.0, 1.0),
    }
}

/// Evenly spaced positions of at most `max` labels out of `len` samples
#[must_use]
pub fn tick_positions(len: usize, max: usize) -> Vec<usize> {
    if len == 0 || max == 0 {
        return Vec::new();
    }
    let step = len.div_ceil(max).max(1);
    (0..len).step_by(step).collect()
}

/// SVG text element for one tick label anchored at the axis point `(x, y)`
#[must_use]
pub fn rotated_label((x, y): (i32, i32), text: &str) -> String {
    let y = y + TICK_LABEL_OFFSET;
    format!(
        r##"<text x="{x}" y="{y}" font-family="sans-serif" font-size="12" fill="#000000" transform="rotate({TICK_LABEL_ANGLE}, {x}, {y})">{}</text>"##,
        escape_html(text)
    )
}

fn with_tick_labels(mut svg: String, anchors: &[((i32, i32), String)]) -> String {
    let labels: String = anchors
        .iter()
        .map(|(anchor, text)| rotated_label(*anchor, text))
        .collect();
    match svg.rfind("</svg>") {
        Some(end) => svg.insert_str(end, &labels),
        None => svg.push_str(&labels),
    }
    svg
}

/// Consecutive runs of present values, as (position, value) points
fn segments(series: &ForecastSeries) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (index, (_, value)) in series.points.iter().enumerate() {
        match value {
            Some(v) => current.push((index as f64, *v)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn render_err<E: std::fmt::Display>(err: E) -> TripcastError {
    TripcastError::render(err.to_string())
}

/// Draw all `series` on one chart and return the SVG document
pub fn render_svg(title: &str, series: &[ForecastSeries]) -> Result<String> {
    let longest = series
        .iter()
        .max_by_key(|s| s.len())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TripcastError::render("No data to plot"))?;

    let labels: Vec<&str> = longest.points.iter().map(|(time, _)| time.as_str()).collect();
    let x_end = (labels.len().saturating_sub(1)).max(1) as f64;
    let (y_start, y_end) = y_range(series);

    let mut svg = String::new();
    let anchors = {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(140)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..x_end, y_start..y_end)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc("Data")
            .x_labels(MAX_X_LABELS)
            .x_label_formatter(&|_: &f64| String::new())
            .light_line_style(BLACK.mix(0.1))
            .draw()
            .map_err(render_err)?;

        for (index, s) in series.iter().enumerate() {
            let color = Palette99::pick(index).mix(1.0);
            chart
                .draw_series(
                    segments(s)
                        .into_iter()
                        .map(move |points| PathElement::new(points, color.stroke_width(2))),
                )
                .map_err(render_err)?
                .label(s.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        let anchors: Vec<((i32, i32), String)> = tick_positions(labels.len(), MAX_X_LABELS)
            .into_iter()
            .map(|position| {
                (
                    chart.backend_coord(&(position as f64, y_start)),
                    labels[position].to_string(),
                )
            })
            .collect();

        root.present().map_err(render_err)?;
        anchors
    };

    Ok(with_tick_labels(svg, &anchors))
}

/// Draw all `series` on one chart and write it to `path`
pub fn render_chart(path: impl AsRef<Path>, title: &str, series: &[ForecastSeries]) -> Result<()> {
    let path = path.as_ref();
    let svg = render_svg(title, series)?;
    fs::write(path, svg)?;
    info!("Chart saved to {}", path.display());
    Ok(())
}
