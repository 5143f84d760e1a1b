//! Stroke hooks and the drawing-context decorator that applies them.
//!
//! [`GlowContext`] wraps a backend for the duration of one element draw. Every
//! stroke issued through it runs as: save state → `before_stroke` → shadow
//! passes → the original stroke → `after_stroke` → restore state. The wrapped
//! backend itself is never reconfigured, so anything drawn on it directly
//! (grid, axes, text) is unaffected, during and after the draw.

use crate::style::{Glow, Rgba};
use crate::viz::curve::{self, Bounds};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};
use plotters::element::{Drawable, PointCollection};
use plotters::style::ShapeStyle;

/// Canvas-style shadow parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f64,
    pub offset: (i32, i32),
}

impl Shadow {
    /// Blur is approximated by stacked translucent strokes, widest first.
    fn passes(&self, stroke_width: u32) -> impl Iterator<Item = ShadowPass> + '_ {
        let n = ((self.blur / 4.0).ceil() as u32).max(1);
        let alpha = self.color.a / (n as f64 + 1.0);
        (1..=n).rev().map(move |i| {
            let spread = self.blur * i as f64 / n as f64;
            ShadowPass {
                color: self.color.with_alpha(alpha).to_backend(),
                width: stroke_width + spread.round() as u32,
            }
        })
    }
}

struct ShadowPass {
    color: BackendColor,
    width: u32,
}

impl BackendStyle for ShadowPass {
    fn color(&self) -> BackendColor {
        self.color
    }
    fn stroke_width(&self) -> u32 {
        self.width
    }
}

/// Mutable drawing state hooks may adjust for a single stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawState {
    pub shadow: Option<Shadow>,
}

/// Callbacks around each stroke drawn through a [`GlowContext`].
///
/// Changes made to the state are visible to that stroke only; the context
/// restores the previous state afterwards.
pub trait StrokeHooks {
    fn before_stroke(&self, state: &mut DrawState);
    fn after_stroke(&self, _state: &mut DrawState) {}
}

impl<H: StrokeHooks> StrokeHooks for Option<H> {
    fn before_stroke(&self, state: &mut DrawState) {
        if let Some(hooks) = self {
            hooks.before_stroke(state);
        }
    }
    fn after_stroke(&self, state: &mut DrawState) {
        if let Some(hooks) = self {
            hooks.after_stroke(state);
        }
    }
}

/// Restores the saved state on drop, including when a stroke unwinds.
struct StateGuard<'s> {
    state: &'s mut DrawState,
    saved: DrawState,
}

impl<'s> StateGuard<'s> {
    fn save(state: &'s mut DrawState) -> Self {
        let saved = *state;
        Self { state, saved }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        *self.state = self.saved;
    }
}

/// Decorator over a drawing backend that runs [`StrokeHooks`] around strokes.
pub struct GlowContext<'a, DB: DrawingBackend, H: StrokeHooks> {
    inner: &'a mut DB,
    hooks: &'a H,
    state: DrawState,
}

impl<'a, DB: DrawingBackend, H: StrokeHooks> GlowContext<'a, DB, H> {
    pub fn new(inner: &'a mut DB, hooks: &'a H) -> Self {
        Self {
            inner,
            hooks,
            state: DrawState::default(),
        }
    }

    /// State outside of any stroke.
    pub fn state(&self) -> DrawState {
        self.state
    }

    fn stroke_with_hooks<S: BackendStyle>(
        &mut self,
        path: &[BackendCoord],
        style: &S,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let hooks = self.hooks;
        let guard = StateGuard::save(&mut self.state);
        hooks.before_stroke(guard.state);
        let result = stroke(self.inner, guard.state, path, style);
        hooks.after_stroke(guard.state);
        result
    }
}

fn stroke<DB: DrawingBackend, S: BackendStyle>(
    backend: &mut DB,
    state: &DrawState,
    path: &[BackendCoord],
    style: &S,
) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
    if let Some(shadow) = state.shadow.filter(|s| !s.color.is_transparent()) {
        let (dx, dy) = shadow.offset;
        for pass in shadow.passes(style.stroke_width()) {
            backend.draw_path(path.iter().map(|&(x, y)| (x + dx, y + dy)), &pass)?;
        }
    }
    backend.draw_path(path.iter().copied(), style)
}

impl<DB: DrawingBackend, H: StrokeHooks> DrawingBackend for GlowContext<'_, DB, H> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.stroke_with_hooks(&[from, to], style)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        let path: Vec<BackendCoord> = path.into_iter().collect();
        self.stroke_with_hooks(&path, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_text(text, style, pos)
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        self.inner.estimate_text_size(text, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }
}

/// The dataset line: a smoothed polyline stroked through a [`GlowContext`].
pub struct GlowLine<Coord> {
    points: Vec<Coord>,
    style: ShapeStyle,
    tension: f64,
    glow: Option<Glow>,
    bounds: Option<Bounds>,
}

impl<Coord> GlowLine<Coord> {
    pub fn new(points: Vec<Coord>, style: ShapeStyle, tension: f64, glow: Option<Glow>) -> Self {
        Self {
            points,
            style,
            tension,
            glow,
            bounds: None,
        }
    }

    /// Keep curve control points inside the plotting area.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl<'a, Coord> PointCollection<'a, Coord> for &'a GlowLine<Coord> {
    type Point = &'a Coord;
    type IntoIter = &'a [Coord];
    fn point_iter(self) -> &'a [Coord] {
        &self.points
    }
}

impl<Coord, DB: DrawingBackend> Drawable<DB> for GlowLine<Coord> {
    fn draw<I: Iterator<Item = BackendCoord>>(
        &self,
        points: I,
        backend: &mut DB,
        _: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let coords: Vec<BackendCoord> = points.collect();
        if coords.len() < 2 {
            return Ok(());
        }
        let path = curve::spline(&coords, self.tension, self.bounds);
        let mut ctx = GlowContext::new(backend, &self.glow);
        ctx.draw_path(path, &self.style)
    }
}
