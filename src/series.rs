//! Observation → plot point mapping and the axis extents derived from the points.

use crate::error::CoercionError;
use crate::models::{Observation, PlotPoint};
use chrono::{DateTime, Utc};

/// Map observations 1:1 to plot points, preserving order.
///
/// Values pass through untouched (no rounding, clamping or outlier removal).
/// A profit that is not a finite number fails the whole mapping.
pub fn map_observations(observations: &[Observation]) -> Result<Vec<PlotPoint>, CoercionError> {
    let points = observations
        .iter()
        .enumerate()
        .map(|(index, o)| {
            if DateTime::<Utc>::from_timestamp_millis(o.timestamp).is_none() {
                return Err(CoercionError::Timestamp {
                    index,
                    timestamp: o.timestamp,
                });
            }
            let y = o.profit.to_f64().ok_or_else(|| CoercionError::Profit {
                index,
                raw: o.profit.raw(),
            })?;
            Ok(PlotPoint { x: o.timestamp, y })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !is_chronological(&points) {
        log::warn!("chart data is not in ascending time order; drawing as given");
    }
    Ok(points)
}

/// True if timestamps never decrease.
pub fn is_chronological(points: &[PlotPoint]) -> bool {
    points.windows(2).all(|w| w[0].x <= w[1].x)
}

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// X extent in epoch milliseconds.
///
/// - empty series: the first day of the epoch (a stable, empty axis)
/// - single point: one hour either side
pub fn time_bounds(points: &[PlotPoint]) -> (i64, i64) {
    let min = points.iter().map(|p| p.x).min();
    let max = points.iter().map(|p| p.x).max();
    match (min, max) {
        (Some(lo), Some(hi)) if lo < hi => (lo, hi),
        (Some(t), Some(_)) => (t.saturating_sub(HOUR_MS), t.saturating_add(HOUR_MS)),
        _ => (0, DAY_MS),
    }
}

/// Y extent widened to "nice" tick boundaries, plus the tick step.
///
/// `max_ticks` bounds the number of tick marks. Flat series get ±5% of their
/// value (±1 around zero); an empty series spans `0..1`. `None` when the values
/// are finite but their spread is not representable as an `f64` axis.
pub fn value_bounds(points: &[PlotPoint], max_ticks: usize) -> Option<(f64, f64, f64)> {
    let (mut lo, mut hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    if !lo.is_finite() || !hi.is_finite() {
        lo = 0.0;
        hi = 1.0;
    }
    if (hi - lo).abs() < f64::EPSILON {
        let offset = if hi == 0.0 { 1.0 } else { (hi * 0.05).abs() };
        lo -= offset;
        hi += offset;
    }
    let spaces = max_ticks.max(2) - 1;
    let step = nice_num((hi - lo) / spaces as f64);
    let (lo, hi) = ((lo / step).floor() * step, (hi / step).ceil() * step);
    let representable = step.is_finite()
        && step > 0.0
        && lo.is_finite()
        && hi.is_finite()
        && (hi - lo).is_finite();
    representable.then_some((lo, hi, step))
}

/// Round `range` to 1, 2, 5 or 10 times a power of ten.
fn nice_num(range: f64) -> f64 {
    let exponent = range.log10().floor();
    let fraction = range / 10f64.powf(exponent);
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * 10f64.powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(i64, f64)]) -> Vec<PlotPoint> {
        v.iter().map(|&(x, y)| PlotPoint { x, y }).collect()
    }

    #[test]
    fn chronology() {
        assert!(is_chronological(&[]));
        assert!(is_chronological(&pts(&[(1, 0.0), (1, 1.0), (2, 0.0)])));
        assert!(!is_chronological(&pts(&[(2, 0.0), (1, 1.0)])));
    }

    #[test]
    fn time_bounds_cases() {
        assert_eq!(time_bounds(&[]), (0, DAY_MS));
        assert_eq!(time_bounds(&pts(&[(10 * HOUR_MS, 1.0)])), (9 * HOUR_MS, 11 * HOUR_MS));
        assert_eq!(time_bounds(&pts(&[(5, 1.0), (2, 1.0), (9, 1.0)])), (2, 9));
    }

    #[test]
    fn value_bounds_are_nice_and_cover_data() {
        let p = pts(&[(0, 3.62997), (1, 4.25412), (2, 3.679)]);
        let (lo, hi, step) = value_bounds(&p, 11).unwrap();
        assert!(lo <= 3.62997 && hi >= 4.25412);
        assert!((step - 0.1).abs() < 1e-12);
        assert!((lo - 3.6).abs() < 1e-9);
        assert!((hi - 4.3).abs() < 1e-9);
    }

    #[test]
    fn value_bounds_flat_and_empty() {
        let (lo, hi, _) = value_bounds(&pts(&[(0, 0.0)]), 6).unwrap();
        assert!(lo <= -1.0 && hi >= 1.0);
        let (lo, hi, _) = value_bounds(&pts(&[(0, 100.0), (1, 100.0)]), 6).unwrap();
        assert!(lo <= 95.0 && hi >= 105.0);
        let (lo, hi, _) = value_bounds(&[], 6).unwrap();
        assert!(lo <= 0.0 && hi >= 1.0);
    }

    #[test]
    fn value_bounds_reject_unrepresentable_spread() {
        assert_eq!(value_bounds(&pts(&[(0, -1e308), (1, 1e308)]), 6), None);
        assert_eq!(value_bounds(&pts(&[(0, f64::MAX), (1, f64::MAX)]), 6), None);
        let (lo, hi, step) = value_bounds(&pts(&[(0, -1e300), (1, 1e300)]), 6).unwrap();
        assert!(lo <= -1e300 && hi >= 1e300 && step.is_finite());
    }

    #[test]
    fn nice_numbers() {
        assert!((nice_num(0.07) - 0.1).abs() < 1e-12);
        assert_eq!(nice_num(1.5), 2.0);
        assert_eq!(nice_num(3.0), 5.0);
        assert_eq!(nice_num(7.0), 10.0);
    }
}
