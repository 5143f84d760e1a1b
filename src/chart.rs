//! Chart assembly: dataset + options for the balance chart, and the drawable [`Chart`].

use crate::error::ChartError;
use crate::models::PlotPoint;
use crate::style::{GLOW, GRID, LinearGradient, PURPLE, Rgba, TEXT};
use crate::viz;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;

/// Height of the legend band above the plot.
pub const LEGEND_BAND_PX: u32 = 32;
/// Gap between the legend band and the plot area, so the top tick label fits.
pub const PLOT_MARGIN_TOP: u32 = 8;
pub const PLOT_MARGIN_RIGHT: u32 = 16;
/// Time-axis tick labels plus the axis title.
pub const X_LABEL_AREA_PX: u32 = 44;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Time,
    Linear,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: ScaleKind,
    pub title: AxisTitle,
}

impl Axis {
    fn titled(kind: ScaleKind, text: &str) -> Self {
        Self {
            kind,
            title: AxisTitle {
                display: true,
                text: text.to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub padding: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LegendOptions {
    pub display: bool,
}

/// Chart-level options.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// Glow around the dataset line; `None` draws a plain stroke.
    pub shadow_color: Option<Rgba>,
    /// Follow the size of the hosting element (web host only).
    pub responsive: bool,
    /// Letterbox to a 2:1 plot instead of filling the canvas.
    pub maintain_aspect_ratio: bool,
    pub layout: Layout,
    pub legend: LegendOptions,
    pub scales: Scales,
    /// Default color of text, ticks and axis lines.
    pub text_color: Rgba,
    pub grid_color: Rgba,
    /// Number formatting of value labels (`en`, `de`, ...).
    pub locale: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            shadow_color: Some(GLOW),
            responsive: true,
            maintain_aspect_ratio: false,
            layout: Layout { padding: 10 },
            legend: LegendOptions { display: true },
            scales: Scales {
                x: Axis::titled(ScaleKind::Time, "Time"),
                y: Axis::titled(ScaleKind::Linear, "Profit (Price)"),
            },
            text_color: TEXT,
            grid_color: GRID,
            locale: "en".to_string(),
        }
    }
}

impl ChartOptions {
    /// Pixels between the canvas edges and the plot area: `(top, bottom)`.
    ///
    /// The fill gradient is bound to this band when the chart is mounted.
    pub fn plot_insets(&self) -> (u32, u32) {
        let legend = if self.legend.display { LEGEND_BAND_PX } else { 0 };
        let top = self.layout.padding + legend + PLOT_MARGIN_TOP;
        let bottom = self.layout.padding + X_LABEL_AREA_PX;
        (top, bottom)
    }
}

/// The single balance series.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// Fill to the zero line.
    pub fill: bool,
    #[serde(rename = "backgroundColor")]
    pub background: LinearGradient,
    pub border_color: Rgba,
    pub border_width: u32,
    /// Curve smoothing, 0 is a straight polyline.
    #[serde(rename = "lineTension")]
    pub tension: f64,
    pub point_radius: u32,
    pub data: Vec<PlotPoint>,
}

/// Everything needed to draw the chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub dataset: Dataset,
    pub options: ChartOptions,
}

/// Build the balance chart: one filled, smoothed line labeled `label`.
pub fn assemble_chart(label: &str, points: Vec<PlotPoint>, gradient: LinearGradient) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        dataset: Dataset {
            label: label.to_string(),
            fill: true,
            background: gradient,
            border_color: PURPLE,
            border_width: 2,
            tension: 0.2,
            point_radius: 0,
            data: points,
        },
        options: ChartOptions::default(),
    }
}

/// A chart bound to a drawing surface.
pub struct Chart<DB: DrawingBackend> {
    root: DrawingArea<DB, Shift>,
    spec: ChartSpec,
    backdrop: Option<Rgba>,
}

impl<DB: DrawingBackend> Chart<DB> {
    pub fn new(backend: DB, spec: ChartSpec) -> Self {
        Self {
            root: backend.into_drawing_area(),
            spec,
            backdrop: None,
        }
    }

    /// Paint the whole canvas before drawing; `None` leaves it untouched.
    pub fn with_backdrop(mut self, backdrop: Option<Rgba>) -> Self {
        self.backdrop = backdrop;
        self
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.root.dim_in_pixel()
    }

    /// Draw (or redraw) the chart and present it.
    pub fn draw(&self) -> Result<(), ChartError> {
        if log::log_enabled!(log::Level::Debug) {
            match serde_json::to_string(&self.spec) {
                Ok(json) => log::debug!("drawing chart {json}"),
                Err(e) => log::debug!("drawing chart (spec not serializable: {e})"),
            }
        }
        viz::draw_chart(&self.root, &self.spec, self.backdrop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{GradientBand, fill_gradient};

    #[test]
    fn balance_defaults() {
        let o = ChartOptions::default();
        assert_eq!(o.shadow_color, Some(GLOW));
        assert!(o.responsive);
        assert!(!o.maintain_aspect_ratio);
        assert_eq!(o.layout.padding, 10);
        assert_eq!(o.scales.x.kind, ScaleKind::Time);
        assert_eq!(o.scales.x.title.text, "Time");
        assert_eq!(o.scales.y.title.text, "Profit (Price)");
        assert!(o.scales.x.title.display && o.scales.y.title.display);
    }

    #[test]
    fn insets_include_legend_band() {
        let mut o = ChartOptions::default();
        assert_eq!(o.plot_insets(), (10 + LEGEND_BAND_PX + PLOT_MARGIN_TOP, 10 + X_LABEL_AREA_PX));
        o.legend.display = false;
        assert_eq!(o.plot_insets().0, 10 + PLOT_MARGIN_TOP);
    }

    #[test]
    fn spec_serializes_like_a_chart_config() {
        let g = fill_gradient(GradientBand::new(25.0, 300.0).unwrap()).unwrap();
        let spec = assemble_chart("USD", vec![PlotPoint { x: 1, y: 2.0 }], g);
        let v = serde_json::to_value(&spec).unwrap();
        assert_eq!(v["type"], "line");
        assert_eq!(v["dataset"]["label"], "USD");
        assert_eq!(v["dataset"]["lineTension"], 0.2);
        assert_eq!(v["dataset"]["borderColor"], "rgba(149, 76, 233, 1)");
        assert_eq!(v["options"]["shadowColor"], "rgba(225, 91, 255, 1)");
        assert_eq!(v["options"]["scales"]["x"]["type"], "time");
        assert_eq!(v["options"]["maintainAspectRatio"], false);
    }
}
