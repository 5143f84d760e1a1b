//! Line smoothing in pixel space.
//!
//! Interior points get a pair of Bézier control points along the chord to their
//! neighbours, scaled by `tension` and by the relative length of the adjacent
//! segments. Segments are then sampled as cubic curves. A tension of zero gives
//! the straight polyline back.

use plotters_backend::BackendCoord;
use plotters::coord::CoordTranslate;
use plotters::drawing::DrawingArea;
use plotters::prelude::DrawingBackend;

/// Pixel rectangle control points are clamped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn of_area<DB: DrawingBackend, CT: CoordTranslate>(area: &DrawingArea<DB, CT>) -> Self {
        let (x, y) = area.get_pixel_range();
        Self {
            left: x.start as f64,
            right: x.end as f64,
            top: y.start as f64,
            bottom: y.end as f64,
        }
    }

    fn clamp(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x.clamp(self.left, self.right), y.clamp(self.top, self.bottom))
    }
}

const SAMPLE_PX: f64 = 3.0;
const MAX_SAMPLES: usize = 32;

/// Smooth `points` into a denser polyline.
pub fn spline(points: &[BackendCoord], tension: f64, bounds: Option<Bounds>) -> Vec<BackendCoord> {
    if tension <= 0.0 || points.len() < 3 {
        return points.to_vec();
    }
    let pts: Vec<(f64, f64)> = points.iter().map(|&(x, y)| (x as f64, y as f64)).collect();
    let controls = control_points(&pts, tension, bounds);

    let mut out = Vec::with_capacity(pts.len() * 4);
    out.push(points[0]);
    for i in 0..pts.len() - 1 {
        let (p0, p3) = (pts[i], pts[i + 1]);
        let (p1, p2) = (controls[i].1, controls[i + 1].0);
        let chord = distance(p0, p3);
        let steps = ((chord / SAMPLE_PX).ceil() as usize).clamp(1, MAX_SAMPLES);
        for s in 1..=steps {
            let t = s as f64 / steps as f64;
            let (x, y) = bezier(p0, p1, p2, p3, t);
            let c = (x.round() as i32, y.round() as i32);
            if out.last() != Some(&c) {
                out.push(c);
            }
        }
    }
    out
}

/// `(previous, next)` control point for every point.
fn control_points(
    pts: &[(f64, f64)],
    tension: f64,
    bounds: Option<Bounds>,
) -> Vec<((f64, f64), (f64, f64))> {
    let last = pts.len() - 1;
    (0..pts.len())
        .map(|i| {
            let prev = pts[i.saturating_sub(1)];
            let cur = pts[i];
            let next = pts[(i + 1).min(last)];
            let d01 = distance(prev, cur);
            let d12 = distance(cur, next);
            let total = d01 + d12;
            let (s01, s12) = if total > 0.0 {
                (d01 / total, d12 / total)
            } else {
                (0.0, 0.0)
            };
            let (fa, fb) = (tension * s01, tension * s12);
            let (dx, dy) = (next.0 - prev.0, next.1 - prev.1);
            let before = (cur.0 - fa * dx, cur.1 - fa * dy);
            let after = (cur.0 + fb * dx, cur.1 + fb * dy);
            match bounds {
                Some(b) => (b.clamp(before), b.clamp(after)),
                None => (before, after),
            }
        })
        .collect()
}

fn bezier(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}
