//! Hosts own the canvas and supply the fragment; [`mount`] runs the pipeline against one.

use crate::chart::{Chart, ChartOptions, assemble_chart};
use crate::error::{ChartError, DecodeError};
use crate::payload::decode_fragment;
use crate::series::map_observations;
use crate::style::{GradientBand, Rgba, fill_gradient};
use plotters_backend::DrawingBackend;

/// Where the chart is drawn: the first `<canvas>` inside an element of class `chart`.
pub const CANVAS_SELECTOR: &str = ".chart canvas";

/// Backdrop of file output; a page canvas stays transparent over its CSS background.
pub const FILE_BACKDROP: Rgba = Rgba::opaque(24, 24, 32);

/// Environment the chart is mounted in.
pub trait ChartHost {
    type Backend<'h>: DrawingBackend
    where
        Self: 'h;

    /// The address fragment, `None` if there is none.
    fn fragment(&self) -> Option<String>;

    /// Locate the canvas and hand out its drawing context. Called at most once per mount.
    fn acquire_canvas(&mut self, selector: &str) -> Result<Self::Backend<'_>, ChartError>;

    /// Paint behind the chart, if any.
    fn backdrop(&self) -> Option<Rgba> {
        None
    }

    fn options(&self) -> ChartOptions {
        ChartOptions::default()
    }
}

/// Decode, map, acquire the canvas, assemble and draw the first frame.
///
/// Decoding and mapping finish before the canvas is touched, so a bad
/// fragment never reaches the drawing engine.
pub fn mount<H: ChartHost>(host: &mut H) -> Result<Chart<H::Backend<'_>>, ChartError> {
    let fragment = host.fragment().ok_or(DecodeError::Empty)?;
    let payload = decode_fragment(&fragment)?;
    let label = payload
        .series_label()
        .ok_or(DecodeError::MissingLabel)?
        .to_string();
    let points = map_observations(&payload.observations)?;

    let options = host.options();
    let backdrop = host.backdrop();
    let backend = host.acquire_canvas(CANVAS_SELECTOR)?;
    let (width, height) = backend.get_size();
    log::debug!("canvas {CANVAS_SELECTOR:?} acquired: {width}x{height}");

    let (top, bottom) = options.plot_insets();
    let gradient = fill_gradient(GradientBand::for_canvas(height, top, bottom))?;
    let mut spec = assemble_chart(&label, points, gradient);
    spec.options = options;

    let chart = Chart::new(backend, spec).with_backdrop(backdrop);
    chart.draw()?;
    Ok(chart)
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::{PngFileHost, SvgFileHost};

/// File output for native builds; wasm32 has no filesystem to write to.
#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{ChartHost, FILE_BACKDROP};
    use crate::chart::ChartOptions;
    use crate::error::ChartError;
    use crate::style::Rgba;
    use plotters_bitmap::BitMapBackend;
    use plotters_svg::SVGBackend;
    use std::path::{Path, PathBuf};

    /// Common state of the file hosts.
    #[derive(Debug, Clone)]
    struct FileCanvas {
        fragment: String,
        path: PathBuf,
        size: (u32, u32),
        backdrop: Option<Rgba>,
        options: ChartOptions,
    }

    impl FileCanvas {
        fn new(fragment: String, path: PathBuf, size: (u32, u32)) -> Self {
            Self {
                fragment,
                path,
                size,
                backdrop: Some(FILE_BACKDROP),
                options: ChartOptions::default(),
            }
        }

        fn check_target(&self, selector: &str) -> Result<&Path, ChartError> {
            if let Some(dir) = self.path.parent()
                && !dir.as_os_str().is_empty()
                && !dir.is_dir()
            {
                return Err(ChartError::canvas(
                    selector,
                    format!("output directory {} does not exist", dir.display()),
                ));
            }
            if self.size.0 == 0 || self.size.1 == 0 {
                return Err(ChartError::canvas(selector, "canvas has zero size"));
            }
            Ok(&self.path)
        }
    }

    macro_rules! file_host {
        ($(#[$doc:meta])* $name:ident, $backend:ident) => {
            $(#[$doc])*
            #[derive(Debug, Clone)]
            pub struct $name(FileCanvas);

            impl $name {
                pub fn new(fragment: impl Into<String>, path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
                    Self(FileCanvas::new(fragment.into(), path.into(), size))
                }

                /// Replace the default dark backdrop; `None` keeps the canvas transparent.
                pub fn with_backdrop(mut self, backdrop: Option<Rgba>) -> Self {
                    self.0.backdrop = backdrop;
                    self
                }

                pub fn with_options(mut self, options: ChartOptions) -> Self {
                    self.0.options = options;
                    self
                }
            }

            impl ChartHost for $name {
                type Backend<'h> = $backend<'h>;

                fn fragment(&self) -> Option<String> {
                    Some(self.0.fragment.clone())
                }

                fn acquire_canvas(&mut self, selector: &str) -> Result<$backend<'_>, ChartError> {
                    let path = self.0.check_target(selector)?;
                    Ok($backend::new(path, self.0.size))
                }

                fn backdrop(&self) -> Option<Rgba> {
                    self.0.backdrop
                }

                fn options(&self) -> ChartOptions {
                    self.0.options.clone()
                }
            }
        };
    }

    file_host!(
        /// Draws into an SVG file.
        SvgFileHost,
        SVGBackend
    );

    file_host!(
        /// Draws into a PNG (or any format the `image` crate infers from the extension).
        PngFileHost,
        BitMapBackend
    );

}
