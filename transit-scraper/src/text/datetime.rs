//! Tolerant date and time parsing.
//!
//! Board and connection payloads carry dates as `dd.MM.yy` (sometimes with a
//! four-digit year, sometimes without leading zeros) and times as `HH:mm`.
//! The date and the time of one event arrive in separate fields and are
//! merged with [`join_date_time`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Two-digit years below this value belong to the 21st century.
const CENTURY_PIVOT: i32 = 70;

/// Error returned when parsing an invalid date or time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {what} '{input}': {reason}")]
pub struct DateTimeError {
    what: &'static str,
    input: String,
    reason: &'static str,
}

impl DateTimeError {
    fn date(input: &str, reason: &'static str) -> Self {
        Self {
            what: "date",
            input: input.to_string(),
            reason,
        }
    }

    fn time(input: &str, reason: &'static str) -> Self {
        Self {
            what: "time",
            input: input.to_string(),
            reason,
        }
    }
}

/// Parse a date in `d.M.yy` or `d.M.yyyy` form.
///
/// Surrounding whitespace is ignored. Two-digit years 00-69 map to
/// 2000-2069 and 70-99 to 1970-1999.
///
/// # Examples
///
/// ```
/// use transit_scraper::text::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2012, 5, 1).unwrap();
/// assert_eq!(parse_date("01.05.12").unwrap(), expected);
/// assert_eq!(parse_date("1.5.2012").unwrap(), expected);
/// assert!(parse_date("2012-05-01").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate, DateTimeError> {
    let trimmed = s.trim();
    let mut parts = trimmed.split('.');

    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DateTimeError::date(s, "expected d.M.yy"));
    };

    let day = parse_digits(day, 1, 2).ok_or_else(|| DateTimeError::date(s, "invalid day"))?;
    let month =
        parse_digits(month, 1, 2).ok_or_else(|| DateTimeError::date(s, "invalid month"))?;
    let year = match year.len() {
        2 => {
            let yy = parse_digits(year, 2, 2)
                .ok_or_else(|| DateTimeError::date(s, "invalid year"))?
                as i32;
            if yy < CENTURY_PIVOT { 2000 + yy } else { 1900 + yy }
        }
        4 => parse_digits(year, 4, 4).ok_or_else(|| DateTimeError::date(s, "invalid year"))?
            as i32,
        _ => return Err(DateTimeError::date(s, "year must have 2 or 4 digits")),
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateTimeError::date(s, "no such calendar date"))
}

/// Parse a time in `H:mm` or `HH:mm` form.
///
/// A trailing `:ss` component is accepted and dropped: only hours and
/// minutes are significant on a timetable.
///
/// # Examples
///
/// ```
/// use transit_scraper::text::parse_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time("08:15").unwrap(), NaiveTime::from_hms_opt(8, 15, 0).unwrap());
/// assert_eq!(parse_time("8:15:42").unwrap(), NaiveTime::from_hms_opt(8, 15, 0).unwrap());
/// assert!(parse_time("25:00").is_err());
/// ```
pub fn parse_time(s: &str) -> Result<NaiveTime, DateTimeError> {
    let trimmed = s.trim();
    let mut parts = trimmed.split(':');

    let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
        return Err(DateTimeError::time(s, "expected H:mm"));
    };
    if let Some(seconds) = parts.next()
        && parse_digits(seconds, 2, 2).is_none()
    {
        return Err(DateTimeError::time(s, "invalid seconds"));
    }
    if parts.next().is_some() {
        return Err(DateTimeError::time(s, "too many components"));
    }

    let hour = parse_digits(hour, 1, 2).ok_or_else(|| DateTimeError::time(s, "invalid hour"))?;
    let minute =
        parse_digits(minute, 2, 2).ok_or_else(|| DateTimeError::time(s, "invalid minute"))?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| DateTimeError::time(s, "hour must be 0-23 and minute 0-59"))
}

/// Merge a date and a time of day into one instant.
///
/// Year, month and day come from `date`; hour and minute come from `time`.
/// Whatever calendar date `time` itself carries is discarded, and seconds
/// are never carried from either side.
///
/// # Examples
///
/// ```
/// use transit_scraper::text::join_date_time;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let date = NaiveDate::from_ymd_opt(2012, 5, 1).unwrap();
/// // A time value parsed on some other day
/// let time = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(8, 15, 59).unwrap();
///
/// let joined = join_date_time(&date, &time).unwrap();
/// assert_eq!(joined.to_string(), "2012-05-01 08:15:00");
/// ```
pub fn join_date_time<D: Datelike, T: Timelike>(date: &D, time: &T) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(date.year(), date.month(), date.day())?;
    let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)?;
    Some(date.and_time(time))
}

/// Parse an all-digit string with a length in `min..=max`.
fn parse_digits(s: &str, min: usize, max: usize) -> Option<u32> {
    if s.len() < min || s.len() > max || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
