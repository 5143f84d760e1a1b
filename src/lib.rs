//! balance_chart
//!
//! Renders a trading bot's balance history as a single-series time chart: a
//! smoothed purple line with a glow, over a purple-to-transparent gradient fill.
//! The data arrives as percent-encoded JSON in the page's address fragment
//! (`chart.html#%7B%22baseAsset%22...`).
//!
//! ### Pipeline
//! 1. [`payload::decode_fragment`]: fragment → [`ChartPayload`]
//! 2. [`series::map_observations`]: observations → [`PlotPoint`]s
//! 3. [`style::fill_gradient`]: fill gradient bound to the plot's pixel band
//! 4. [`chart::assemble_chart`]: dataset and options → [`ChartSpec`]
//! 5. [`Chart::draw`]: render through `plotters`
//!
//! [`host::mount`] runs all five against a [`ChartHost`] (browser page with the
//! `web` feature on wasm32, or an SVG/PNG file on native targets).
//!
//! ### Example
//! ```no_run
//! use balance_chart::{SvgFileHost, mount};
//!
//! let fragment = "%7B%22baseAsset%22%3A%22USD%22%2C%22chartData%22%3A%5B%5D%7D";
//! let mut host = SvgFileHost::new(fragment, "balance.svg", (800, 400));
//! let chart = mount(&mut host)?;
//! println!("{} points", chart.spec().dataset.data.len());
//! # Ok::<(), balance_chart::ChartError>(())
//! ```

pub mod chart;
pub mod error;
pub mod host;
pub mod models;
pub mod payload;
pub mod series;
pub mod style;
pub mod viz;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use chart::{Chart, ChartOptions, ChartSpec, Dataset, assemble_chart};
pub use error::{ChartError, CoercionError, DecodeError, StyleError};
pub use host::{CANVAS_SELECTOR, ChartHost, mount};
#[cfg(not(target_arch = "wasm32"))]
pub use host::{PngFileHost, SvgFileHost};
pub use models::{ChartPayload, Observation, PlotPoint, Profit};
pub use payload::{decode_fragment, encode_fragment};
pub use series::map_observations;
pub use style::{Glow, GradientBand, LinearGradient, Rgba, fill_gradient};
