//! Percentage-change series derivation.
//!
//! Both transforms are pure and order-preserving, and both are attached as
//! derived columns alongside the raw price series: `step_change` is the
//! bar-over-bar move, `cumulative_change` is the move since the origin.

/// Percentage change of each element relative to the first element.
///
/// Element 0 is 0.0 whenever the origin is non-zero and non-NaN; a zero or
/// NaN origin propagates into every element, which is not guarded against.
pub fn cumulative_change(series: &[f64]) -> Vec<f64> {
    match series.first() {
        Some(&origin) => series.iter().map(|v| v / origin - 1.0).collect(),
        None => Vec::new(),
    }
}

/// Percentage change of each element relative to its predecessor.
///
/// Element 0 has no predecessor and is NaN.
pub fn step_change(series: &[f64]) -> Vec<f64> {
    series
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if i == 0 {
                f64::NAN
            } else {
                v / series[i - 1] - 1.0
            }
        })
        .collect()
}
