//! Calendar-day helpers.
//!
//! Days cross the crate boundary as `YYYY-MM-DD` strings in UTC. Inside the
//! crate they are `NaiveDate`s; there is no time-of-day component.

use crate::{Error, Result};
use chrono::{NaiveDate, Utc};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` calendar day.
///
/// Rejects anything that is not exactly ten characters in that shape, as
/// well as impossible days such as `2023-02-29`.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(Error::InvalidDate(s.to_string()));
    }

    NaiveDate::parse_from_str(s, DAY_FORMAT).map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Parse a batch of days; the first invalid one fails the whole batch.
pub fn parse_days<I, S>(days: I) -> Result<Vec<NaiveDate>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    days.into_iter().map(|d| parse_day(d.as_ref())).collect()
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Current UTC calendar day from the system clock
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
