//! Rendering of a [`ChartSpec`] onto any plotters backend.
//!
//! - Legend band on top, plot below, both inside the layout padding
//! - Time x axis (UTC), locale-aware value labels
//! - Gradient-filled area under a smoothed, glowing line
//!
//! The glow is applied by [`glow::GlowContext`] around the line element only;
//! grid, axes and text go straight to the backend.

pub mod curve;
pub mod fill;
pub mod glow;
pub mod legend;
pub mod ticks;

use crate::chart::{ChartSpec, LEGEND_BAND_PX, PLOT_MARGIN_RIGHT, PLOT_MARGIN_TOP, X_LABEL_AREA_PX};
use crate::error::{ChartError, render_err};
use crate::models::PlotPoint;
use crate::series;
use crate::style::{Glow, Rgba};
use chrono::{DateTime, Utc};
use curve::Bounds;
use fill::GradientArea;
use glow::GlowLine;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

const FONT_PX: u32 = 12;
const Y_TITLE_PX: u32 = 20;
const X_LABELS: usize = 6;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
#[cfg(not(target_arch = "wasm32"))]
static INIT_FONTS: std::sync::Once = std::sync::Once::new();

#[cfg(not(target_arch = "wasm32"))]
fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let registered = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
        if registered.is_err() {
            log::warn!("bundled font rejected; text falls back to the backend default");
        }
    });
}

// The browser resolves font families itself.
#[cfg(target_arch = "wasm32")]
fn ensure_fonts_registered() {}

fn to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}

fn value_range_error(points: &[PlotPoint]) -> ChartError {
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    ChartError::ValueRange { lo, hi }
}

/// Value-axis tick budget: roughly one label per 40px, as a canvas chart would.
pub fn max_value_ticks(plot_height_px: u32) -> usize {
    ((plot_height_px / 40) as usize).clamp(2, 11)
}

pub(crate) fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    backdrop: Option<Rgba>,
) -> Result<(), ChartError> {
    ensure_fonts_registered();
    let options = &spec.options;
    let dataset = &spec.dataset;

    // ---- 1) Canvas, padding, aspect ----
    if let Some(color) = backdrop {
        root.fill(&color.to_plotters()).map_err(render_err)?;
    }
    let (w, h) = root.dim_in_pixel();
    let letterbox = if options.maintain_aspect_ratio {
        h.saturating_sub(w / 2)
    } else {
        0
    };
    let pad = options.layout.padding;
    let canvas = root.margin(pad, pad + letterbox, pad, pad);

    let text = options.text_color.to_plotters();
    let label_style = (FontFamily::SansSerif, FONT_PX).into_font().color(&text);

    // ---- 2) Legend band ----
    let plot_area = if options.legend.display {
        let (legend_area, rest) = canvas.split_vertically(LEGEND_BAND_PX);
        legend::draw_legend(&legend_area, dataset, &label_style)?;
        rest
    } else {
        canvas
    };

    // ---- 3) Scales ----
    let (t0, t1) = series::time_bounds(&dataset.data);
    let (_, area_h) = plot_area.dim_in_pixel();
    let plot_h = area_h.saturating_sub(PLOT_MARGIN_TOP + X_LABEL_AREA_PX);
    let (y_lo, y_hi, y_step) = series::value_bounds(&dataset.data, max_value_ticks(plot_h))
        .ok_or_else(|| value_range_error(&dataset.data))?;
    let locale = ticks::map_locale(&options.locale);

    let y_ticks = ticks::tick_values(y_lo, y_hi, y_step);
    let y_labels: Vec<String> = y_ticks
        .iter()
        .map(|v| ticks::format_value(*v, y_step, locale))
        .collect();
    let mut left_px = ticks::value_label_area_px(&y_labels, FONT_PX);
    if options.scales.y.title.display {
        left_px += Y_TITLE_PX;
    }

    let mut chart = ChartBuilder::on(&plot_area)
        .margin_top(PLOT_MARGIN_TOP)
        .margin_right(PLOT_MARGIN_RIGHT)
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, X_LABEL_AREA_PX)
        .build_cartesian_2d(to_datetime(t0)..to_datetime(t1), y_lo..y_hi)
        .map_err(render_err)?;

    // ---- 4) Grid, axes, titles ----
    let time_fmt = ticks::time_label_format(t1 - t0);
    let x_label_fmt = |t: &DateTime<Utc>| t.format(time_fmt).to_string();
    let y_label_fmt = |v: &f64| ticks::format_value(*v, y_step, locale);

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(X_LABELS)
        .y_labels(y_ticks.len())
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(label_style.clone())
        .axis_desc_style(label_style.clone())
        .bold_line_style(options.grid_color.to_plotters().stroke_width(1))
        .light_line_style(TRANSPARENT.stroke_width(1))
        .axis_style(text.stroke_width(1));
    if options.scales.x.title.display {
        mesh.x_desc(options.scales.x.title.text.as_str());
    }
    if options.scales.y.title.display {
        mesh.y_desc(options.scales.y.title.text.as_str());
    }
    mesh.draw().map_err(render_err)?;

    // ---- 5) Dataset: fill, then the glowing line ----
    let line: Vec<(DateTime<Utc>, f64)> = dataset
        .data
        .iter()
        .map(|p| (to_datetime(p.x), p.y))
        .collect();
    let bounds = Bounds::of_area(chart.plotting_area());

    if dataset.fill {
        let baseline = 0.0_f64.clamp(y_lo, y_hi);
        let area = GradientArea::new(
            line.clone(),
            baseline,
            dataset.background.clone(),
            dataset.tension,
        )
        .with_bounds(bounds);
        chart
            .draw_series(std::iter::once(area))
            .map_err(render_err)?;
    }

    let border = dataset.border_color.to_plotters();
    let glow = options.shadow_color.map(Glow::new);
    let stroke = GlowLine::new(
        line.clone(),
        border.stroke_width(dataset.border_width),
        dataset.tension,
        glow,
    )
    .with_bounds(bounds);
    chart
        .draw_series(std::iter::once(stroke))
        .map_err(render_err)?;

    if dataset.point_radius > 0 {
        let radius = dataset.point_radius;
        chart
            .draw_series(line.iter().map(|&c| Circle::new(c, radius, border.filled())))
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    log::debug!(
        "chart drawn: {}x{} px, {} points, y {}..{} step {}",
        w,
        h,
        dataset.data.len(),
        y_lo,
        y_hi,
        y_step
    );
    Ok(())
}
