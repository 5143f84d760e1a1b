//! Payload decoding: address fragment → [`ChartPayload`].
//!
//! The bot builds the chart URL as `page.html#<encodeURIComponent(json)>`; this
//! module performs the inverse, strictly. A malformed escape is an error (as it is
//! for `decodeURIComponent`), not something to pass through.

use crate::error::DecodeError;
use crate::models::ChartPayload;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

// Characters `encodeURIComponent` leaves unescaped besides alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Decode a fragment (with or without its leading `#`) into a payload.
///
/// ### Errors
/// - [`DecodeError::Empty`] for an empty fragment
/// - [`DecodeError::MalformedEscape`] for a `%` not followed by two hex digits
/// - [`DecodeError::InvalidUtf8`] if the decoded bytes are not UTF-8
/// - [`DecodeError::Json`] for malformed JSON or missing `chartData`
/// - [`DecodeError::MissingLabel`] if neither `baseAsset` nor `botName` is present
pub fn decode_fragment(fragment: &str) -> Result<ChartPayload, DecodeError> {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    if raw.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    check_escapes(raw)?;
    let json = percent_decode_str(raw).decode_utf8()?;
    let payload: ChartPayload = serde_json::from_str(&json)?;
    if payload.series_label().is_none() {
        return Err(DecodeError::MissingLabel);
    }
    log::debug!(
        "decoded payload: label={:?} observations={}",
        payload.series_label(),
        payload.observations.len()
    );
    Ok(payload)
}

/// Producer side: serialize a payload and percent-encode it like `encodeURIComponent`.
pub fn encode_fragment(payload: &ChartPayload) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(payload)?;
    Ok(utf8_percent_encode(&json, URI_COMPONENT).to_string())
}

/// The fragment part of a URL (everything after the first `#`), if any.
pub fn fragment_from_url(url: &str) -> Option<&str> {
    url.split_once('#').map(|(_, f)| f)
}

fn check_escapes(raw: &str) -> Result<(), DecodeError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let ok = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !ok {
                return Err(DecodeError::MalformedEscape { offset: i });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
