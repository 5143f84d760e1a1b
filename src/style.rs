//! Colors, the fill gradient and the glow effect of the balance line.
//!
//! The gradient is defined in absolute canvas pixels: it is bound to a vertical
//! band of the canvas when the chart is constructed, independent of the data.

use crate::error::StyleError;
use crate::viz::glow::{DrawState, Shadow, StrokeHooks};
use plotters_backend::BackendColor;
use plotters::style::RGBAColor;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// RGBA color with a fractional alpha, as in CSS `rgba(...)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    pub fn to_plotters(self) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, self.a)
    }

    pub fn to_backend(self) -> BackendColor {
        BackendColor {
            alpha: self.a,
            rgb: (self.r, self.g, self.b),
        }
    }

    fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
impl FromStr for Rgba {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StyleError::InvalidColor(s.to_string());
        let t = s.trim();
        if let Some(hex) = t.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(invalid());
            }
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            return match hex.len() {
                3 => Ok(Rgba::opaque(
                    nibble(0).map_err(|_| invalid())?,
                    nibble(1).map_err(|_| invalid())?,
                    nibble(2).map_err(|_| invalid())?,
                )),
                6 | 8 => {
                    let r = byte(0).map_err(|_| invalid())?;
                    let g = byte(2).map_err(|_| invalid())?;
                    let b = byte(4).map_err(|_| invalid())?;
                    let a = if hex.len() == 8 {
                        byte(6).map_err(|_| invalid())? as f64 / 255.0
                    } else {
                        1.0
                    };
                    Ok(Rgba::new(r, g, b, a))
                }
                _ => Err(invalid()),
            };
        }

        let lower = t.to_ascii_lowercase();
        let (args, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let args = args.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != if with_alpha { 4 } else { 3 } {
            return Err(invalid());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
        let a = if with_alpha {
            let a = parts[3].parse::<f64>().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(invalid());
            }
            a
        } else {
            1.0
        };
        Ok(Rgba::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            a,
        ))
    }
}

// Balance chart palette.
pub const PURPLE: Rgba = Rgba::new(149, 76, 233, 1.0);
pub const PURPLE_HALF: Rgba = Rgba::new(149, 76, 233, 0.5);
pub const PURPLE_QUARTER: Rgba = Rgba::new(149, 76, 233, 0.25);
pub const PURPLE_ZERO: Rgba = Rgba::new(149, 76, 233, 0.0);
/// Glow around the balance line (`#e15bff`).
pub const GLOW: Rgba = Rgba::opaque(0xe1, 0x5b, 0xff);
/// Default color of text, ticks and axis lines (`#ddd`).
pub const TEXT: Rgba = Rgba::opaque(0xdd, 0xdd, 0xdd);
/// Gridlines.
pub const GRID: Rgba = Rgba::new(0xdd, 0xdd, 0xdd, 0.1);

/// Vertical pixel band a gradient is bound to, in absolute canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GradientBand {
    pub top: f64,
    pub bottom: f64,
}

impl GradientBand {
    pub fn new(top: f64, bottom: f64) -> Result<Self, StyleError> {
        if !(bottom > top) {
            return Err(StyleError::EmptyBand { top, bottom });
        }
        Ok(Self { top, bottom })
    }

    /// Band for a canvas of `height` pixels whose plot area is inset by
    /// `top_inset` / `bottom_inset`. Canvases too short for the insets get the
    /// full height.
    pub fn for_canvas(height: u32, top_inset: u32, bottom_inset: u32) -> Self {
        let h = height.max(1) as f64;
        let top = top_inset as f64;
        let bottom = h - bottom_inset as f64;
        if bottom > top {
            Self { top, bottom }
        } else {
            Self { top: 0.0, bottom: h }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Vertical linear gradient, the counterpart of a canvas `createLinearGradient(0, top, 0, bottom)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinearGradient {
    pub band: GradientBand,
    stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn new(band: GradientBand) -> Self {
        Self {
            band,
            stops: Vec::new(),
        }
    }

    /// Append a stop. Offsets must lie in `[0, 1]` and never decrease.
    pub fn add_color_stop(&mut self, offset: f64, color: Rgba) -> Result<(), StyleError> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(StyleError::OffsetOutOfRange(offset));
        }
        if let Some(last) = self.stops.last()
            && offset < last.offset
        {
            return Err(StyleError::UnorderedStops {
                prev: last.offset,
                next: offset,
            });
        }
        self.stops.push(GradientStop { offset, color });
        Ok(())
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at canvas row `y`. Rows above the band take the first stop's color,
    /// rows below it the last stop's.
    pub fn color_at(&self, y: f64) -> Rgba {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return PURPLE_ZERO;
        };
        let span = self.band.bottom - self.band.top;
        let t = ((y - self.band.top) / span).clamp(0.0, 1.0);
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        for w in self.stops.windows(2) {
            let (a, b) = (w[0], w[1]);
            if t >= a.offset && t <= b.offset {
                let width = b.offset - a.offset;
                if width <= 0.0 {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / width);
            }
        }
        last.color
    }
}

/// The balance fill: half-opacity purple at the top of the band, a quarter at
/// 35% down, transparent at the bottom.
pub fn fill_gradient(band: GradientBand) -> Result<LinearGradient, StyleError> {
    let mut gradient = LinearGradient::new(band);
    gradient.add_color_stop(0.0, PURPLE_HALF)?;
    gradient.add_color_stop(0.35, PURPLE_QUARTER)?;
    gradient.add_color_stop(1.0, PURPLE_ZERO)?;
    Ok(gradient)
}

/// Drop-shadow glow applied to every stroke of the dataset line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f64,
    pub offset: (i32, i32),
}

impl Glow {
    pub const BLUR: f64 = 20.0;

    pub fn new(color: Rgba) -> Self {
        Self {
            color,
            blur: Self::BLUR,
            offset: (0, 0),
        }
    }
}

impl StrokeHooks for Glow {
    fn before_stroke(&self, state: &mut DrawState) {
        state.shadow = Some(Shadow {
            color: self.color,
            blur: self.blur,
            offset: self.offset,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_colors() {
        assert_eq!("#e15bff".parse::<Rgba>().unwrap(), GLOW);
        assert_eq!("#ddd".parse::<Rgba>().unwrap(), TEXT);
        assert_eq!(
            "rgba(149, 76, 233, 0.5)".parse::<Rgba>().unwrap(),
            PURPLE_HALF
        );
        assert_eq!("rgb(1,2,3)".parse::<Rgba>().unwrap(), Rgba::opaque(1, 2, 3));
        let c = "#00000080".parse::<Rgba>().unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_colors() {
        for bad in ["", "#12", "#ggg", "rgba(1,2,3)", "rgb(1,2,300)", "rgba(1,2,3,2)", "purple"] {
            assert!(bad.parse::<Rgba>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let c: Rgba = PURPLE_QUARTER.to_string().parse().unwrap();
        assert_eq!(c, PURPLE_QUARTER);
    }

    #[test]
    fn fill_gradient_stops_are_ordered() {
        let g = fill_gradient(GradientBand::new(25.0, 300.0).unwrap()).unwrap();
        let offsets: Vec<f64> = g.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.35, 1.0]);
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn unordered_or_out_of_range_stops_fail() {
        let mut g = LinearGradient::new(GradientBand::new(0.0, 10.0).unwrap());
        g.add_color_stop(0.5, PURPLE).unwrap();
        assert_eq!(
            g.add_color_stop(0.2, PURPLE),
            Err(StyleError::UnorderedStops { prev: 0.5, next: 0.2 })
        );
        assert_eq!(
            g.add_color_stop(1.5, PURPLE),
            Err(StyleError::OffsetOutOfRange(1.5))
        );
        // equal offsets are allowed (hard color change)
        assert!(g.add_color_stop(0.5, PURPLE_ZERO).is_ok());
    }

    #[test]
    fn color_at_clamps_and_interpolates() {
        let g = fill_gradient(GradientBand::new(100.0, 200.0).unwrap()).unwrap();
        assert_eq!(g.color_at(0.0), PURPLE_HALF);
        assert_eq!(g.color_at(100.0), PURPLE_HALF);
        assert_eq!(g.color_at(135.0).a, 0.25);
        assert_eq!(g.color_at(500.0), PURPLE_ZERO);
        let mid = g.color_at(117.5);
        assert!((mid.a - 0.375).abs() < 1e-9);
        assert_eq!((mid.r, mid.g, mid.b), (149, 76, 233));
    }

    #[test]
    fn band_for_canvas() {
        let b = GradientBand::for_canvas(400, 35, 50);
        assert_eq!(b, GradientBand { top: 35.0, bottom: 350.0 });
        let tiny = GradientBand::for_canvas(20, 35, 50);
        assert_eq!(tiny, GradientBand { top: 0.0, bottom: 20.0 });
        assert!(GradientBand::new(5.0, 5.0).is_err());
    }

    #[test]
    fn glow_installs_shadow() {
        let mut state = DrawState::default();
        Glow::new(GLOW).before_stroke(&mut state);
        let shadow = state.shadow.expect("shadow set");
        assert_eq!(shadow.color, GLOW);
        assert_eq!(shadow.blur, 20.0);
        assert_eq!(shadow.offset, (0, 0));
    }
}
