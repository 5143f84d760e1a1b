//! Area under the balance line, painted with a vertical [`LinearGradient`].
//!
//! Backends only fill polygons with a flat color, so the area polygon is cut
//! into horizontal slabs and each slab is filled with the gradient's color at
//! its middle row. Slabs are thin inside the gradient band and single pieces
//! above and below it, where the color is constant.

use crate::style::LinearGradient;
use crate::viz::curve::{self, Bounds};
use plotters_backend::{BackendColor, BackendCoord, BackendStyle, DrawingBackend, DrawingErrorKind};
use plotters::element::{Drawable, PointCollection};

const STRIPE_PX: f64 = 2.0;

struct Fill(BackendColor);

impl BackendStyle for Fill {
    fn color(&self) -> BackendColor {
        self.0
    }
}

/// Closed area between the line and a horizontal baseline.
pub struct GradientArea<Coord> {
    // line points followed by the two baseline corners (under the last, then the first point)
    points: Vec<Coord>,
    line_len: usize,
    gradient: LinearGradient,
    tension: f64,
    bounds: Option<Bounds>,
}

impl<X: Clone> GradientArea<(X, f64)> {
    pub fn new(line: Vec<(X, f64)>, baseline: f64, gradient: LinearGradient, tension: f64) -> Self {
        let line_len = line.len();
        let mut points = line;
        if let (Some(first), Some(last)) = (points.first().cloned(), points.last().cloned()) {
            points.push((last.0, baseline));
            points.push((first.0, baseline));
        }
        Self {
            points,
            line_len,
            gradient,
            tension,
            bounds: None,
        }
    }
}

impl<Coord> GradientArea<Coord> {
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl<'a, Coord> PointCollection<'a, Coord> for &'a GradientArea<Coord> {
    type Point = &'a Coord;
    type IntoIter = &'a [Coord];
    fn point_iter(self) -> &'a [Coord] {
        &self.points
    }
}

impl<Coord, DB: DrawingBackend> Drawable<DB> for GradientArea<Coord> {
    fn draw<I: Iterator<Item = BackendCoord>>(
        &self,
        points: I,
        backend: &mut DB,
        _: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let coords: Vec<BackendCoord> = points.collect();
        if self.line_len < 2 || coords.len() < self.line_len + 2 {
            return Ok(());
        }
        let (line, corners) = coords.split_at(self.line_len);
        let polygon: Vec<(f64, f64)> = curve::spline(line, self.tension, self.bounds)
            .into_iter()
            .chain(corners.iter().copied())
            .map(|(x, y)| (x as f64, y as f64))
            .collect();
        fill_with_gradient(backend, &polygon, &self.gradient)
    }
}

/// Fill `polygon` slab by slab with the gradient's colors.
pub fn fill_with_gradient<DB: DrawingBackend>(
    backend: &mut DB,
    polygon: &[(f64, f64)],
    gradient: &LinearGradient,
) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
    let (y_min, y_max) = polygon
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.1), hi.max(p.1))
        });
    if polygon.len() < 3 || !(y_max > y_min) {
        return Ok(());
    }
    for (lo, hi) in slabs(y_min.floor(), y_max.ceil(), gradient) {
        let color = gradient.color_at((lo + hi) / 2.0);
        if color.is_transparent() {
            continue;
        }
        let piece = clip_to_slab(polygon, lo, hi);
        if piece.len() < 3 {
            continue;
        }
        let vertices = piece.iter().map(|&(x, y)| (x.round() as i32, y.round() as i32));
        backend.fill_polygon(vertices, &Fill(color.to_backend()))?;
    }
    Ok(())
}

/// Row ranges covering `y_min..y_max`: one above the band, stripes inside it,
/// one below it.
fn slabs(y_min: f64, y_max: f64, gradient: &LinearGradient) -> Vec<(f64, f64)> {
    let band = gradient.band;
    let mut edges = vec![y_min, y_max];
    let mut y = band.top.floor();
    while y < band.bottom {
        edges.push(y);
        y += STRIPE_PX;
    }
    edges.push(band.bottom.ceil());
    edges.retain(|e| (y_min..=y_max).contains(e));
    edges.sort_by(f64::total_cmp);
    edges.dedup();
    edges.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Sutherland–Hodgman clip of `polygon` to the rows `lo..=hi`.
fn clip_to_slab(polygon: &[(f64, f64)], lo: f64, hi: f64) -> Vec<(f64, f64)> {
    let upper = clip_edge(polygon, |p| p.1 >= lo, lo);
    clip_edge(&upper, |p| p.1 <= hi, hi)
}

fn clip_edge(
    polygon: &[(f64, f64)],
    inside: impl Fn((f64, f64)) -> bool,
    y_edge: f64,
) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(polygon.len() + 4);
    let Some(&last) = polygon.last() else {
        return out;
    };
    let mut prev = last;
    for &cur in polygon {
        match (inside(prev), inside(cur)) {
            (true, true) => out.push(cur),
            (true, false) => out.push(crossing(prev, cur, y_edge)),
            (false, true) => {
                out.push(crossing(prev, cur, y_edge));
                out.push(cur);
            }
            (false, false) => {}
        }
        prev = cur;
    }
    out
}

fn crossing(a: (f64, f64), b: (f64, f64), y: f64) -> (f64, f64) {
    let t = (y - a.1) / (b.1 - a.1);
    (a.0 + (b.0 - a.0) * t, y)
}
