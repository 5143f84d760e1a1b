//! Error types for every stage of the chart pipeline.
//!
//! Each stage has its own error so callers (and tests) can tell *where* the
//! pipeline stopped; [`ChartError`] wraps them all for `?` propagation.

use thiserror::Error;

/// The address fragment could not be turned into a [`crate::ChartPayload`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("address fragment is missing or empty")]
    Empty,
    #[error("malformed percent-escape at byte {offset}")]
    MalformedEscape { offset: usize },
    #[error("decoded fragment is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("fragment is not a valid chart payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload carries neither `baseAsset` nor `botName`")]
    MissingLabel,
}

/// An observation could not be turned into a plot point.
#[derive(Debug, Error, PartialEq)]
pub enum CoercionError {
    #[error("observation #{index}: profit {raw:?} is not a finite number")]
    Profit { index: usize, raw: String },
    #[error("observation #{index}: timestamp {timestamp} is out of range")]
    Timestamp { index: usize, timestamp: i64 },
}

/// Invalid style input (gradient stops, color strings).
#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    #[error("gradient stop offset {0} lies outside [0, 1]")]
    OffsetOutOfRange(f64),
    #[error("gradient stop offsets must be non-decreasing ({prev} followed by {next})")]
    UnorderedStops { prev: f64, next: f64 },
    #[error("gradient band is empty ({top}..{bottom})")]
    EmptyBand { top: f64, bottom: f64 },
    #[error("invalid color {0:?}")]
    InvalidColor(String),
}

/// Anything that stops a chart from being mounted or drawn.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error("canvas `{selector}` unavailable: {reason}")]
    Canvas { selector: String, reason: String },
    #[error("profit values {lo}..{hi} span more than a value axis can hold")]
    ValueRange { lo: f64, hi: f64 },
    #[error("drawing failed: {0}")]
    Render(String),
}

impl ChartError {
    pub fn canvas(selector: &str, reason: impl Into<String>) -> Self {
        ChartError::Canvas {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

/// Map a plotters drawing error into [`ChartError::Render`].
pub(crate) fn render_err<E: std::fmt::Debug>(e: E) -> ChartError {
    ChartError::Render(format!("{:?}", e))
}
