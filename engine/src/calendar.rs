//! Working-day calendar arithmetic.
//!
//! Saturday and Sunday are non-working; durations count working days only.
//! Dates cross the application boundary as ISO `YYYY-MM-DD` strings; the
//! structured entry points operate on `NaiveDate` and have no error
//! conditions.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;

/// Format of dates crossing the application boundary.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from the string-boundary calendar functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The supplied string is not a valid `YYYY-MM-DD` date.
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
}

/// A single day in an enumerated range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInfo {
    pub date: NaiveDate,
    pub is_weekend: bool,
}

/// True iff `date` falls on a Saturday or Sunday.
pub fn is_weekend_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// True iff `date` is a working day.
pub fn is_working_day(date: NaiveDate) -> bool {
    !is_weekend_day(date)
}

/// End date of work starting at `start` and occupying `working_days`
/// working days.
///
/// A weekend start first rolls forward to the next working day. The end
/// date is the day the last working day lands on, so a duration of 1 on a
/// working-day start is the start itself.
pub fn calculate_end_date(start: NaiveDate, working_days: u32) -> NaiveDate {
    let mut current = start;
    while is_weekend_day(current) {
        current += Duration::days(1);
    }

    let mut remaining = working_days;
    while remaining > 0 {
        if is_working_day(current) {
            remaining -= 1;
        }
        if remaining > 0 {
            current += Duration::days(1);
        }
    }
    current
}

/// First working day strictly after `date`.
pub fn next_working_day(date: NaiveDate) -> NaiveDate {
    let mut current = date + Duration::days(1);
    while is_weekend_day(current) {
        current += Duration::days(1);
    }
    current
}

/// Every calendar day from `start` to `end` inclusive, tagged with its
/// weekend flag. Empty when `start` is after `end`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> DayRange {
    DayRange { next: start, end }
}

/// Number of working days from `start` to `end` inclusive.
pub fn working_days_between(start: NaiveDate, end: NaiveDate) -> usize {
    days_in_range(start, end).filter(|day| !day.is_weekend).count()
}

/// Iterator over the days of an inclusive date range.
///
/// Holds no state beyond its bounds; clone it to restart the enumeration.
#[derive(Clone, Debug)]
pub struct DayRange {
    next: NaiveDate,
    end: NaiveDate,
}

impl Iterator for DayRange {
    type Item = DayInfo;

    fn next(&mut self) -> Option<DayInfo> {
        if self.next > self.end {
            return None;
        }
        let day = DayInfo {
            date: self.next,
            is_weekend: is_weekend_day(self.next),
        };
        self.next += Duration::days(1);
        Some(day)
    }
}

/// Parse an ISO `YYYY-MM-DD` boundary string.
pub fn parse_date(value: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| CalendarError::InvalidDate(value.to_string()))
}

/// Format a date back into the boundary `YYYY-MM-DD` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// String-boundary form of [`calculate_end_date`].
pub fn calculate_end_date_iso(start: &str, working_days: u32) -> Result<String, CalendarError> {
    Ok(format_date(calculate_end_date(parse_date(start)?, working_days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekend_predicate() {
        assert!(is_weekend_day(date(2025, 8, 9))); // Saturday
        assert!(is_weekend_day(date(2025, 8, 10))); // Sunday
        assert!(!is_weekend_day(date(2025, 8, 8))); // Friday
        assert!(is_working_day(date(2025, 8, 11))); // Monday
    }

    #[test]
    fn test_end_date_spans_weekend() {
        // Friday start, 5 working days: Fri, Mon, Tue, Wed, Thu
        assert_eq!(
            calculate_end_date(date(2025, 8, 8), 5),
            date(2025, 8, 14)
        );
    }

    #[test]
    fn test_end_date_single_day_is_start() {
        assert_eq!(calculate_end_date(date(2025, 8, 8), 1), date(2025, 8, 8));
    }

    #[test]
    fn test_end_date_weekend_start_rolls_forward() {
        // Saturday start rolls to Monday; one working day lands there
        assert_eq!(calculate_end_date(date(2025, 8, 9), 1), date(2025, 8, 11));
        // ...and three working days land on Wednesday
        assert_eq!(calculate_end_date(date(2025, 8, 9), 3), date(2025, 8, 13));
    }

    #[test]
    fn test_end_date_within_week() {
        // Monday start, 4 working days: Mon..Thu
        assert_eq!(calculate_end_date(date(2025, 8, 11), 4), date(2025, 8, 14));
    }

    #[test]
    fn test_next_working_day_skips_weekend() {
        assert_eq!(next_working_day(date(2025, 8, 8)), date(2025, 8, 11)); // Fri -> Mon
        assert_eq!(next_working_day(date(2025, 8, 9)), date(2025, 8, 11)); // Sat -> Mon
        assert_eq!(next_working_day(date(2025, 8, 11)), date(2025, 8, 12)); // Mon -> Tue
    }

    #[test]
    fn test_days_in_range_inclusive_with_weekend_tags() {
        let days: Vec<DayInfo> = days_in_range(date(2025, 8, 8), date(2025, 8, 11)).collect();

        assert_eq!(days.len(), 4); // Fri, Sat, Sun, Mon
        assert_eq!(days[0].date, date(2025, 8, 8));
        assert!(!days[0].is_weekend);
        assert!(days[1].is_weekend);
        assert!(days[2].is_weekend);
        assert!(!days[3].is_weekend);
    }

    #[test]
    fn test_days_in_range_empty_when_inverted() {
        let mut range = days_in_range(date(2025, 8, 11), date(2025, 8, 8));
        assert!(range.next().is_none());
    }

    #[test]
    fn test_days_in_range_restartable() {
        let range = days_in_range(date(2025, 8, 8), date(2025, 8, 10));
        assert_eq!(range.clone().count(), 3);
        assert_eq!(range.count(), 3);
    }

    #[test]
    fn test_working_days_between() {
        // Fri..Mon inclusive spans one weekend
        assert_eq!(working_days_between(date(2025, 8, 8), date(2025, 8, 11)), 2);
        // A full calendar week holds five working days
        assert_eq!(working_days_between(date(2025, 8, 11), date(2025, 8, 17)), 5);
    }

    #[test]
    fn test_parse_date_rejects_malformed_input() {
        assert_eq!(
            parse_date("08/15/2025"),
            Err(CalendarError::InvalidDate("08/15/2025".to_string()))
        );
        assert!(parse_date("2025-13-40").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_iso_boundary_round_trip() {
        assert_eq!(
            calculate_end_date_iso("2025-08-08", 5).unwrap(),
            "2025-08-14"
        );
        assert_eq!(format_date(parse_date("2025-08-08").unwrap()), "2025-08-08");
    }
}
