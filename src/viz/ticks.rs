//! Tick label formatting and the gutter sizes derived from it.

use num_format::{Locale, ToFormattedString};

const MINUTE_MS: i64 = 60_000;
const DAY_MS: i64 = 86_400_000;

/// `strftime` pattern for time-axis labels, picked from the visible span.
pub fn time_label_format(span_ms: i64) -> &'static str {
    if span_ms <= MINUTE_MS {
        "%H:%M:%S"
    } else if span_ms <= 2 * DAY_MS {
        "%H:%M"
    } else if span_ms <= 90 * DAY_MS {
        "%b %-d"
    } else {
        "%b %Y"
    }
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Anything else is English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Decimals needed to tell ticks `step` apart (0.1 → 1, 0.05 → 2, 5 → 0).
pub fn decimals_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    (-step.log10() - 1e-9).ceil().clamp(0.0, 12.0) as usize
}

/// Value-axis label: thousands separators and decimal mark of `locale`.
pub fn format_value(v: f64, step: f64, locale: &Locale) -> String {
    let decimals = decimals_for_step(step);
    let digits = format!("{:.*}", decimals, v.abs());
    let (int_part, frac) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let is_zero = digits.bytes().all(|b| b == b'0' || b == b'.');

    let mut out = String::new();
    if v < 0.0 && !is_zero {
        out.push_str(locale.minus_sign());
    }
    match int_part.parse::<u64>() {
        Ok(n) => out.push_str(&n.to_formatted_string(locale)),
        Err(_) => out.push_str(int_part),
    }
    if !frac.is_empty() {
        out.push_str(locale.decimal());
        out.push_str(frac);
    }
    out
}

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Left gutter wide enough for the widest value label.
pub fn value_label_area_px(labels: &[String], font_px: u32) -> u32 {
    let widest = labels
        .iter()
        .map(|s| estimate_text_width_px(s, font_px))
        .max()
        .unwrap_or(0);
    (widest + 12).clamp(36, 160)
}

/// Tick values `lo, lo + step, ..., hi`.
pub fn tick_values(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !(hi >= lo) {
        return vec![lo];
    }
    let n = ((hi - lo) / step).round() as usize;
    (0..=n.min(1000)).map(|i| lo + step * i as f64).collect()
}
