#![allow(dead_code)]

use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// `{"baseAsset":"USD","chartData":[...]}` with two observations, percent-encoded.
pub const USD_FRAGMENT: &str = "%7B%22baseAsset%22%3A%22USD%22%2C%22chartData%22%3A%5B%7B%22timestamp%22%3A1713260476000%2C%22profit%22%3A%224.25412%22%7D%2C%7B%22timestamp%22%3A1713269445000%2C%22profit%22%3A%223.67900%22%7D%5D%7D";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Path {
        points: Vec<BackendCoord>,
        rgb: (u8, u8, u8),
        alpha: f64,
        width: u32,
    },
    Line {
        rgb: (u8, u8, u8),
        alpha: f64,
        width: u32,
    },
    Fill {
        vertices: usize,
        rgb: (u8, u8, u8),
        alpha: f64,
    },
    Rect {
        rgb: (u8, u8, u8),
        filled: bool,
    },
    Circle,
    Pixel,
    Text(String),
    Present,
}

impl Call {
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Call::Path { rgb, .. }
            | Call::Line { rgb, .. }
            | Call::Fill { rgb, .. }
            | Call::Rect { rgb, .. } => Some(*rgb),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("recording backend refused to draw")]
pub struct Refused;

pub type Calls = Rc<RefCell<Vec<Call>>>;

/// Backend that records draw calls instead of rasterizing them.
pub struct RecordingBackend {
    size: (u32, u32),
    calls: Calls,
    fail_paths: Cell<usize>,
    panic_paths: Cell<usize>,
}

impl RecordingBackend {
    pub fn new(size: (u32, u32)) -> (Self, Calls) {
        let calls = Calls::default();
        (Self::with_calls(size, calls.clone()), calls)
    }

    pub fn with_calls(size: (u32, u32), calls: Calls) -> Self {
        Self {
            size,
            calls,
            fail_paths: Cell::new(0),
            panic_paths: Cell::new(0),
        }
    }

    /// Refuse the next `n` `draw_path` calls.
    pub fn failing_paths(self, n: usize) -> Self {
        self.fail_paths.set(n);
        self
    }

    /// Panic in the next `n` `draw_path` calls.
    pub fn panicking_paths(self, n: usize) -> Self {
        self.panic_paths.set(n);
        self
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn color_of<S: BackendStyle>(style: &S) -> ((u8, u8, u8), f64) {
    let BackendColor { alpha, rgb } = style.color();
    (rgb, alpha)
}

impl DrawingBackend for RecordingBackend {
    type ErrorType = Refused;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Refused>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Refused>> {
        self.record(Call::Present);
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        _point: BackendCoord,
        _color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Refused>> {
        self.record(Call::Pixel);
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        _from: BackendCoord,
        _to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Refused>> {
        let (rgb, alpha) = color_of(style);
        self.record(Call::Line {
            rgb,
            alpha,
            width: style.stroke_width(),
        });
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Refused>> {
        let panics = self.panic_paths.get();
        if panics > 0 {
            self.panic_paths.set(panics - 1);
            panic!("recording backend panicked mid-stroke");
        }
        let pending = self.fail_paths.get();
        if pending > 0 {
            self.fail_paths.set(pending - 1);
            return Err(DrawingErrorKind::DrawingError(Refused));
        }
        let (rgb, alpha) = color_of(style);
        self.record(Call::Path {
            points: path.into_iter().collect(),
            rgb,
            alpha,
            width: style.stroke_width(),
        });
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        _upper_left: BackendCoord,
        _bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Refused>> {
        let (rgb, _) = color_of(style);
        self.record(Call::Rect { rgb, filled: fill });
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        _center: BackendCoord,
        _radius: u32,
        _style: &S,
        _fill: bool,
    ) -> Result<(), DrawingErrorKind<Refused>> {
        self.record(Call::Circle);
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Refused>> {
        let (rgb, alpha) = color_of(style);
        self.record(Call::Fill {
            vertices: vert.into_iter().count(),
            rgb,
            alpha,
        });
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        _style: &TStyle,
        _pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Refused>> {
        self.record(Call::Text(text.to_string()));
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        _style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Refused>> {
        Ok((text.chars().count() as u32 * 7, 12))
    }
}
