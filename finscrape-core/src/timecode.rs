//! Calendar date to epoch-offset conversion.
//!
//! Source URLs take Unix timestamps; user-facing dates arrive as mm/dd/yyyy.
//! Offsets are whole-day counts of seconds from 1970-01-01 — no partial-day
//! precision, no timezone handling. Dates before the epoch are negative.

use crate::error::ScrapeError;
use chrono::{Duration, NaiveDate};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Convert a `mm/dd/yyyy` date string to seconds since 1970-01-01.
///
/// With `inclusive_end` the date is advanced by one calendar day, so an
/// end-date filter includes the named day itself.
pub fn to_epoch_offset(date: &str, inclusive_end: bool) -> Result<i64, ScrapeError> {
    let parts: Vec<&str> = date.split('/').collect();
    if parts.len() != 3 {
        return Err(malformed(date, "expected three slash-separated components"));
    }

    let month: u32 = parts[0]
        .trim()
        .parse()
        .map_err(|_| malformed(date, "month is not an integer"))?;
    let day: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| malformed(date, "day is not an integer"))?;
    let year: i32 = parts[2]
        .trim()
        .parse()
        .map_err(|_| malformed(date, "year is not an integer"))?;

    let mut parsed = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| malformed(date, "not a valid calendar date"))?;

    if inclusive_end {
        parsed = parsed + Duration::days(1);
    }

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date is valid");
    Ok(parsed.signed_duration_since(epoch).num_days() * SECONDS_PER_DAY)
}

fn malformed(input: &str, reason: &str) -> ScrapeError {
    ScrapeError::MalformedDate {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_zero() {
        assert_eq!(to_epoch_offset("01/01/1970", false).unwrap(), 0);
    }

    #[test]
    fn day_before_epoch_is_negative() {
        assert_eq!(to_epoch_offset("12/31/1969", false).unwrap(), -SECONDS_PER_DAY);
    }

    #[test]
    fn inclusive_end_adds_exactly_one_day() {
        assert_eq!(
            to_epoch_offset("01/01/2000", true).unwrap(),
            to_epoch_offset("01/02/2000", false).unwrap()
        );
    }

    #[test]
    fn inclusive_end_crosses_month_boundary() {
        assert_eq!(
            to_epoch_offset("01/31/2000", true).unwrap(),
            to_epoch_offset("02/01/2000", false).unwrap()
        );
    }

    #[test]
    fn rejects_invalid_calendar_date() {
        assert!(matches!(
            to_epoch_offset("01/32/2000", false),
            Err(ScrapeError::MalformedDate { .. })
        ));
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert!(to_epoch_offset("2000-01-01", false).is_err());
        assert!(to_epoch_offset("01/01", false).is_err());
    }

    #[test]
    fn rejects_non_integer_components() {
        assert!(to_epoch_offset("Jan/01/2000", false).is_err());
    }

    #[test]
    fn known_offset() {
        // 2000-01-01 is 10,957 days after the epoch.
        assert_eq!(
            to_epoch_offset("01/01/2000", false).unwrap(),
            10_957 * SECONDS_PER_DAY
        );
    }
}
