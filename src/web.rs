//! Browser host: the chart page loads the wasm module, whose start function
//! mounts the chart on the page's `.chart canvas`.
//!
//! A responsive chart follows its layout box: on every window `resize` the
//! canvas is resized and the chart redrawn from the mounted spec. The fill
//! gradient keeps the band it was built with.

use crate::chart::{Chart, ChartOptions, ChartSpec};
use crate::error::ChartError;
use crate::host::{CANVAS_SELECTOR, ChartHost, mount};
use plotters_canvas::CanvasBackend;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, Window};

/// The current page.
pub struct PageHost {
    window: Window,
    document: Document,
    options: ChartOptions,
    canvas: Option<HtmlCanvasElement>,
}

impl PageHost {
    pub fn from_window() -> Result<Self, ChartError> {
        let window = web_sys::window()
            .ok_or_else(|| ChartError::canvas(CANVAS_SELECTOR, "no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| ChartError::canvas(CANVAS_SELECTOR, "window has no document"))?;
        Ok(Self {
            window,
            document,
            options: ChartOptions::default(),
            canvas: None,
        })
    }

    /// The canvas handed out by the last acquisition.
    pub fn canvas(&self) -> Option<&HtmlCanvasElement> {
        self.canvas.as_ref()
    }
}

/// Match the canvas bitmap to its layout box. Returns false while the box is empty.
fn fit_to_layout(canvas: &HtmlCanvasElement) -> bool {
    let (w, h) = (canvas.client_width(), canvas.client_height());
    if w <= 0 || h <= 0 {
        return false;
    }
    if canvas.width() != w as u32 || canvas.height() != h as u32 {
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
    }
    true
}

fn redraw(canvas: &HtmlCanvasElement, spec: &ChartSpec) -> Result<(), ChartError> {
    let backend = CanvasBackend::with_canvas_object(canvas.clone())
        .ok_or_else(|| ChartError::canvas(CANVAS_SELECTOR, "2d context unavailable"))?;
    Chart::new(backend, spec.clone()).draw()
}

/// Redraw on every window `resize`. The listener lives as long as the page.
fn watch_resize(window: &Window, canvas: HtmlCanvasElement, spec: ChartSpec) -> Result<(), JsValue> {
    let on_resize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        if !fit_to_layout(&canvas) {
            return;
        }
        if let Err(e) = redraw(&canvas, &spec) {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
        }
    }));
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

impl ChartHost for PageHost {
    type Backend<'h> = CanvasBackend;

    fn fragment(&self) -> Option<String> {
        self.window
            .location()
            .hash()
            .ok()
            .filter(|hash| !hash.is_empty())
    }

    fn acquire_canvas(&mut self, selector: &str) -> Result<CanvasBackend, ChartError> {
        let element = self
            .document
            .query_selector(selector)
            .map_err(|e| ChartError::canvas(selector, format!("{:?}", e)))?
            .ok_or_else(|| ChartError::canvas(selector, "no matching element"))?;
        let canvas: HtmlCanvasElement = element
            .dyn_into()
            .map_err(|_| ChartError::canvas(selector, "element is not a <canvas>"))?;

        if self.options.responsive {
            fit_to_layout(&canvas);
        }
        self.canvas = Some(canvas.clone());
        CanvasBackend::with_canvas_object(canvas)
            .ok_or_else(|| ChartError::canvas(selector, "2d context unavailable"))
    }

    fn options(&self) -> ChartOptions {
        self.options.clone()
    }
}

/// Module entry point, run when the page loads the wasm module.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let mut host = PageHost::from_window().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let spec = mount(&mut host)
        .map(|chart| chart.spec().clone())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if spec.options.responsive
        && let Some(canvas) = host.canvas().cloned()
    {
        watch_resize(&host.window, canvas, spec)?;
    }
    Ok(())
}
