//! Day-of-month validation backed by `chrono`'s proleptic Gregorian calendar.
use chrono::{Month, NaiveDate};

use crate::error::PredictionError;

/// Number of days in `month` of `year`, or `None` when the month is outside
/// 1..=12 or the year is outside what `chrono` can represent.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// English month name ("February") for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    Month::try_from(month).ok().map(|m| m.name())
}

/// Check that `day` exists in `(year, month)`.
pub fn validate_day(year: i32, month: u32, day: u32) -> Result<(), PredictionError> {
    let name = month_name(month).ok_or(PredictionError::InvalidMonth(month))?;
    let last = days_in_month(year, month).ok_or(PredictionError::InvalidMonth(month))?;

    if day == 0 || day > last {
        return Err(PredictionError::InvalidDay {
            day,
            month_name: name.to_string(),
            year,
        });
    }
    Ok(())
}
