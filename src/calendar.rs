use chrono::{Datelike, NaiveDate, TimeDelta};
use std::fmt;
use thiserror::Error;

/// Text layout used for task dates in exported records, e.g. `Mon 01.09.25`.
pub const TASK_DATE_FORMAT: &str = "%a %d.%m.%y";

/// Layout accepted for the project start date.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDateError {
    input: String,
}

impl TaskDateError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

impl fmt::Display for TaskDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid task date '{}' (expected e.g. 'Mon 01.09.25')",
            self.input
        )
    }
}

impl std::error::Error for TaskDateError {}

pub fn format_task_date(date: NaiveDate) -> String {
    date.format(TASK_DATE_FORMAT).to_string()
}

/// Parse a task date the way chart consumers do: take the last whitespace
/// separated token, split on `.` and read the two digit year as 20YY.
/// The weekday prefix is not checked.
pub fn parse_task_date(input: &str) -> Result<NaiveDate, TaskDateError> {
    let token = input
        .split_whitespace()
        .last()
        .ok_or_else(|| TaskDateError::new(input))?;
    let mut parts = token.split('.');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TaskDateError::new(input));
    };
    if year.len() != 2 {
        return Err(TaskDateError::new(input));
    }
    let day: u32 = day.parse().map_err(|_| TaskDateError::new(input))?;
    let month: u32 = month.parse().map_err(|_| TaskDateError::new(input))?;
    let year: i32 = year.parse().map_err(|_| TaskDateError::new(input))?;
    NaiveDate::from_ymd_opt(2000 + year, month, day).ok_or_else(|| TaskDateError::new(input))
}

pub fn parse_input_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), INPUT_DATE_FORMAT).ok()
}

/// Date arithmetic that left the range chrono can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{start} shifted by {days} days is outside the supported calendar")]
pub struct DateOutOfRange {
    pub start: NaiveDate,
    pub days: i64,
}

pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, DateOutOfRange> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(DateOutOfRange { start: date, days })
}

/// Inclusive end date of a task starting on `start` that lasts `duration_days`.
pub fn end_date_for(start: NaiveDate, duration_days: i64) -> Result<NaiveDate, DateOutOfRange> {
    let offset = duration_days.checked_sub(1).ok_or(DateOutOfRange {
        start,
        days: duration_days,
    })?;
    add_days(start, offset)
}

pub fn next_day(date: NaiveDate) -> Result<NaiveDate, DateOutOfRange> {
    add_days(date, 1)
}

/// Inclusive number of calendar days between two dates.
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

pub(crate) fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub(crate) fn date_from_i32(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

// NaiveDate::from_ymd(1970, 1, 1).num_days_from_ce()
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_with_weekday_and_short_year() {
        assert_eq!(format_task_date(d(2025, 9, 1)), "Mon 01.09.25");
        assert_eq!(format_task_date(d(2024, 1, 6)), "Sat 06.01.24");
    }

    #[test]
    fn parses_last_token_only() {
        assert_eq!(parse_task_date("Mon 01.09.25").unwrap(), d(2025, 9, 1));
        assert_eq!(parse_task_date("01.09.25").unwrap(), d(2025, 9, 1));
        assert_eq!(parse_task_date("Xyz 31.12.99").unwrap(), d(2099, 12, 31));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_task_date("").is_err());
        assert!(parse_task_date("Mon 2025-09-01").is_err());
        assert!(parse_task_date("Mon 31.02.25").is_err());
        assert!(parse_task_date("Mon 01.09.2025").is_err());
    }

    #[test]
    fn epoch_offset_matches_unix_epoch() {
        assert_eq!(date_to_i32(d(1970, 1, 1)), 0);
        assert_eq!(date_from_i32(1), Some(d(1970, 1, 2)));
    }

    #[test]
    fn end_date_is_inclusive() {
        assert_eq!(end_date_for(d(2024, 1, 1), 5), Ok(d(2024, 1, 5)));
        assert_eq!(end_date_for(d(2024, 1, 1), 1), Ok(d(2024, 1, 1)));
        assert_eq!(span_days(d(2024, 1, 1), d(2024, 1, 5)), 5);
    }

    #[test]
    fn out_of_range_shifts_are_errors() {
        assert!(end_date_for(d(2024, 1, 1), 9_000_000_000_000).is_err());
        assert!(end_date_for(d(2024, 1, 1), i64::MIN).is_err());
        assert!(add_days(d(2024, 1, 1), i64::MAX).is_err());
        assert!(next_day(NaiveDate::MAX).is_err());
    }
}
