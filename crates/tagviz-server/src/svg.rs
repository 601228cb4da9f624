//! Server-side SVG rendering of a [`TagChart`].

use std::fmt;

use tagviz_core::TagChart;

use crate::page::escape_html;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 130.0;

const BORDER_FILL: &str = "#fafafa";
const BACKGROUND_FILL: &str = "#f5f5f5";
const GRID_COLOR: &str = "white";
const POINT_COLOR: &str = "navy";
const POINT_ALPHA: f64 = 0.5;
/// Marker diameter in pixels.
const POINT_SIZE: f64 = 20.0;
const TARGET_TICKS: usize = 6;

/// Render the chart as a standalone `<svg>` element.
pub fn render_chart(chart: &TagChart) -> String {
    SvgChart(chart).to_string()
}

/// Display adapter writing a [`TagChart`] as SVG markup.
///
/// Tags are categorical on the x axis, counts linear on the y axis. Each
/// point carries a `<title>` tooltip with the tag and its count.
pub struct SvgChart<'a>(pub &'a TagChart);

impl fmt::Display for SvgChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.0;
        let width = f64::from(chart.width);
        let height = f64::from(chart.height);
        let plot_w = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_h = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);

        let (y_start, y_end) = chart.y_range;
        let span = y_end.saturating_sub(y_start).max(1) as f64;
        let y_at = |v: usize| MARGIN_TOP + plot_h * (1.0 - (v as f64 - y_start as f64) / span);

        let band = plot_w / chart.points.len().max(1) as f64;
        let x_at = |i: usize| MARGIN_LEFT + band * (i as f64 + 0.5);

        write!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="tag-chart" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="12">"#
        )?;
        write!(
            f,
            r#"<rect width="{width}" height="{height}" fill="{BORDER_FILL}"/>"#
        )?;
        write!(
            f,
            r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{plot_w}" height="{plot_h}" fill="{BACKGROUND_FILL}"/>"#
        )?;

        // grid + y ticks
        let step = tick_step(y_end.saturating_sub(y_start));
        let first_tick = y_start.div_ceil(step) * step;
        for tick in (first_tick..=y_end).step_by(step) {
            let y = y_at(tick);
            write!(
                f,
                r#"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{GRID_COLOR}"/>"#,
                MARGIN_LEFT + plot_w
            )?;
            write!(
                f,
                r#"<text x="{:.1}" y="{y:.1}" text-anchor="end" dominant-baseline="middle">{tick}</text>"#,
                MARGIN_LEFT - 6.0
            )?;
        }

        // x grid, points, labels
        let label_y = MARGIN_TOP + plot_h + 12.0;
        for (i, point) in chart.points.iter().enumerate() {
            let x = x_at(i);
            let y = y_at(point.count);
            let tag = escape_html(&point.tag);
            write!(
                f,
                r#"<line x1="{x:.1}" y1="{MARGIN_TOP}" x2="{x:.1}" y2="{:.1}" stroke="{GRID_COLOR}"/>"#,
                MARGIN_TOP + plot_h
            )?;
            write!(
                f,
                r#"<circle cx="{x:.1}" cy="{y:.1}" r="{}" fill="{POINT_COLOR}" fill-opacity="{POINT_ALPHA}"><title>tag: {tag}&#10;tag count: {}</title></circle>"#,
                POINT_SIZE / 2.0,
                point.count
            )?;
            write!(
                f,
                r#"<text x="{x:.1}" y="{label_y:.1}" text-anchor="end" transform="rotate(-45 {x:.1} {label_y:.1})">{tag}</text>"#
            )?;
        }

        // axis labels
        write!(
            f,
            r#"<text class="x-label" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            height - 8.0,
            escape_html(&chart.x_label)
        )?;
        let y_mid = MARGIN_TOP + plot_h / 2.0;
        write!(
            f,
            r#"<text class="y-label" x="16" y="{y_mid:.1}" text-anchor="middle" transform="rotate(-90 16 {y_mid:.1})">{}</text>"#,
            escape_html(&chart.y_label)
        )?;
        f.write_str("</svg>")
    }
}

/// Smallest step from 1, 2, 5, 10, 20, 50, ... giving at most [`TARGET_TICKS`] intervals.
fn tick_step(span: usize) -> usize {
    let mut magnitude = 1;
    loop {
        for factor in [1, 2, 5] {
            let step = factor * magnitude;
            if span / step <= TARGET_TICKS {
                return step;
            }
        }
        magnitude *= 10;
    }
}
