//! Magnitude-suffix number parsing.
//!
//! Screener pages render large values in shorthand ("2.5M", "10B"). A missing
//! cell yields NaN; an unrecognized suffix is an error — new suffixes mean the
//! source changed its format and the caller should know.

use crate::error::ScrapeError;

/// Parse a shorthand magnitude string into a number.
///
/// `None` and NA-rendered cells (empty or `-`) become NaN. Suffix-free input
/// must parse as a plain integer. Suffixed input is parsed as a float prefix
/// scaled by K/M/B/T (case-insensitive) and truncated toward zero.
pub fn parse(value: Option<&str>) -> Result<f64, ScrapeError> {
    let raw = match value {
        Some(s) => s.trim(),
        None => return Ok(f64::NAN),
    };
    if raw.is_empty() || raw == "-" {
        return Ok(f64::NAN);
    }

    let last = raw.chars().next_back().expect("non-empty string");
    if last.is_ascii_digit() {
        return raw
            .parse::<i64>()
            .map(|n| n as f64)
            .map_err(|_| ScrapeError::MalformedNumber(raw.to_string()));
    }

    let factor = suffix_factor(last).ok_or(ScrapeError::UnknownSuffix {
        suffix: last,
        input: raw.to_string(),
    })?;

    let prefix = &raw[..raw.len() - last.len_utf8()];
    let base: f64 = prefix
        .parse()
        .map_err(|_| ScrapeError::MalformedNumber(raw.to_string()))?;

    Ok((base * factor).trunc())
}

fn suffix_factor(suffix: char) -> Option<f64> {
    match suffix.to_ascii_uppercase() {
        'K' => Some(1e3),
        'M' => Some(1e6),
        'B' => Some(1e9),
        'T' => Some(1e12),
        _ => None,
    }
}
