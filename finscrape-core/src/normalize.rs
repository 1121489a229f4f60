//! Table normalization: raw string cells to a typed, consistently ordered frame.
//!
//! Steps run in a fixed order — drop, rename, numeric cleanup, magnitude
//! parsing, date parsing, sort — and each is a no-op when reapplied to
//! already-normalized data, so normalizing twice is safe.

use crate::error::ScrapeError;
use crate::magnitude;
use polars::prelude::*;

/// Declarative description of how to normalize one source's table.
#[derive(Debug, Clone, Default)]
pub struct NormalizeSpec {
    /// Raw columns to discard before renaming. Missing ones are ignored.
    pub drop: Vec<String>,
    /// Canonical column names, applied positionally to whatever remains.
    pub rename: Vec<String>,
    /// Canonical columns holding currency/quantity strings (`$1,234`, `+500`).
    pub numeric: Vec<String>,
    /// Canonical columns holding magnitude shorthand (`2.5M`, `10B`).
    pub magnitude: Vec<String>,
    /// Canonical columns holding date or datetime strings.
    pub dates: Vec<String>,
    /// Primary date column to sort by, ascending. `None` keeps source order.
    pub sort_by: Option<String>,
}

/// Normalize a collected table into its canonical typed form.
///
/// Fails with `ColumnCountMismatch` when the remaining columns cannot be
/// renamed positionally, and with `MissingColumn` when a typed column named
/// by the spec is absent after the rename.
pub fn normalize(df: DataFrame, spec: &NormalizeSpec) -> Result<DataFrame, ScrapeError> {
    let mut df = df.drop_many(spec.drop.iter().map(String::as_str));

    rename_columns(&mut df, &spec.rename)?;

    for name in spec
        .numeric
        .iter()
        .chain(&spec.magnitude)
        .chain(&spec.dates)
        .chain(&spec.sort_by)
    {
        if df.column(name).is_err() {
            return Err(ScrapeError::MissingColumn(name.clone()));
        }
    }

    // String columns still awaiting conversion; typed ones pass through.
    let raw_numeric = string_columns(&df, &spec.numeric);
    let raw_dates = string_columns(&df, &spec.dates);

    let mut lf = df.lazy();
    for name in &raw_numeric {
        lf = lf.with_column(
            col(name.as_str())
                .str()
                .replace_all(lit("$"), lit(""), true)
                .str()
                .replace_all(lit(","), lit(""), true)
                .str()
                .replace_all(lit("+"), lit(""), true)
                .strict_cast(DataType::Float64)
                .alias(name.as_str()),
        );
    }
    for name in &raw_dates {
        lf = lf.with_column(
            col(name.as_str())
                .str()
                .to_datetime(
                    Some(TimeUnit::Milliseconds),
                    None,
                    StrptimeOptions::default(),
                    lit("raise"),
                )
                .alias(name.as_str()),
        );
    }
    let mut df = lf.collect()?;

    for name in string_columns(&df, &spec.magnitude) {
        let parsed: Vec<f64> = df
            .column(&name)?
            .str()?
            .iter()
            .map(magnitude::parse)
            .collect::<Result<_, _>>()?;
        df.with_column(Column::new(name.as_str().into(), parsed))?;
    }

    if let Some(key) = &spec.sort_by {
        df = df
            .lazy()
            .sort(
                [key.as_str()],
                SortMultipleOptions::default()
                    .with_order_descending(false)
                    .with_maintain_order(true),
            )
            .collect()?;
    }

    Ok(df)
}

/// Apply the canonical names positionally. A frame already carrying the
/// canonical names is left alone, which is what makes renaming idempotent.
fn rename_columns(df: &mut DataFrame, canonical: &[String]) -> Result<(), ScrapeError> {
    if canonical.is_empty() {
        return Ok(());
    }

    let current: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    if current == canonical {
        return Ok(());
    }
    if current.len() != canonical.len() {
        return Err(ScrapeError::ColumnCountMismatch {
            expected: canonical.len(),
            found: current.len(),
        });
    }

    df.set_column_names(canonical.iter().map(String::as_str))?;
    Ok(())
}

fn string_columns(df: &DataFrame, names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| {
            df.column(name)
                .map(|c| c.dtype() == &DataType::String)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}
