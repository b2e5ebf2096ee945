//! Calendar-to-instant helpers for filter time ranges

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};

/// Build a UTC instant from calendar fields.
///
/// Out-of-range fields are rejected rather than normalised, so day `0` of a
/// month is an error here instead of silently rolling back a month.
pub fn utc_instant(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::invalid(format!("no such calendar date: {year:04}-{month:02}-{day:02}"))
    })?;
    let naive = date.and_hms_opt(hour, minute, 0).ok_or_else(|| {
        Error::invalid(format!("no such time of day: {hour:02}:{minute:02}"))
    })?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Lower bound used for "everything since the beginning" queries.
pub fn start_of_record() -> DateTime<Utc> {
    // 1980-10-31T00:00:00Z
    DateTime::<Utc>::from_timestamp(341_798_400, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}
