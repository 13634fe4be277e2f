//! Calendar date keys for study sessions
//!
//! Sessions carry their date as a `DD-MM-YYYY` string. Inside the engine the
//! string is parsed once into a [`DateKey`], a small `Copy` wrapper around
//! [`chrono::NaiveDate`], and only rendered back to text at the edges.
//!
//! Keys are limited to years 1 through 9999. Day arithmetic is checked and
//! returns `None` when it would leave that range.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Earliest year a [`DateKey`] can hold.
pub const MIN_YEAR: i32 = 1;
/// Latest year a [`DateKey`] can hold.
pub const MAX_YEAR: i32 = 9999;

/// Number of days in a 1-based month of the given year.
///
/// Returns 0 for months outside 1..=12 or years chrono cannot represent.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    let next_month = if month == 12 {
        year.checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1))
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month
        .and_then(|first| first.pred_opt())
        .map_or(0, |last| last.day())
}

/// ISO day of week, Monday = 1 through Sunday = 7.
///
/// Returns 0 when the parts do not form a calendar date.
pub fn day_of_week(day: u32, month: u32, year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, day).map_or(0, |date| date.weekday().number_from_monday())
}

/// Render a `DD-MM-YYYY` key without validating the parts.
pub fn format_date_key(day: u32, month: u32, year: i32) -> String {
    format!("{:02}-{:02}-{}", day, month, year)
}

/// A validated calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Build a key, checking the year range and that the day exists.
    pub fn new(day: u32, month: u32, year: i32) -> Result<Self> {
        let input = format_date_key(day, month, year);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::malformed(
                &input,
                format!("year must be between {} and {}", MIN_YEAR, MAX_YEAR),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::malformed(&input, format!("invalid month {}", month)));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                Error::malformed(
                    &input,
                    format!(
                        "invalid day {} (month has {} days)",
                        day,
                        days_in_month(month, year)
                    ),
                )
            })
    }

    /// Parse a strict `DD-MM-YYYY` key with zero-padded day and month.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split('-');
        let (day, month, year) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(d), Some(m), Some(y), None) => (d, m, y),
            _ => return Err(Error::malformed(s, "expected DD-MM-YYYY")),
        };

        if day.len() != 2 || !all_digits(day) {
            return Err(Error::malformed(s, "day must be two digits"));
        }
        if month.len() != 2 || !all_digits(month) {
            return Err(Error::malformed(s, "month must be two digits"));
        }
        if year.is_empty() || !all_digits(year) {
            return Err(Error::malformed(s, "year must be numeric"));
        }

        let day: u32 = day
            .parse()
            .map_err(|_| Error::malformed(s, "day out of range"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| Error::malformed(s, "month out of range"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| Error::malformed(s, "year out of range"))?;

        Self::new(day, month, year).map_err(|e| match e {
            Error::MalformedDate { reason, .. } => Error::malformed(s, reason),
            other => other,
        })
    }

    /// Nearest valid key to the given parts. Year, month and day are each
    /// clamped into range.
    pub(crate) fn clamped(day: u32, month: u32, year: i32) -> Self {
        let year = year.clamp(MIN_YEAR, MAX_YEAR);
        let month = month.clamp(1, 12);
        let day = day.clamp(1, days_in_month(month, year));
        Self(NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default())
    }

    /// Convert from a chrono date, rejecting years outside the key range.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        (MIN_YEAR..=MAX_YEAR)
            .contains(&date.year())
            .then_some(Self(date))
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Self::clamped(now.day(), now.month(), now.year())
    }

    /// First day of a 1-based month.
    pub fn first_of_month(month: u32, year: i32) -> Result<Self> {
        Self::new(1, month, year)
    }

    /// Last day of a 1-based month.
    pub fn last_of_month(month: u32, year: i32) -> Result<Self> {
        Self::new(days_in_month(month, year), month, year)
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// ISO day of week, Monday = 1.
    pub fn weekday(&self) -> u32 {
        self.0.weekday().number_from_monday()
    }

    /// Shift by `delta` days. `None` past either end of the key range.
    pub fn add_days(&self, delta: i64) -> Option<Self> {
        let days = Days::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            self.0.checked_add_days(days)
        } else {
            self.0.checked_sub_days(days)
        };
        shifted.and_then(Self::from_naive)
    }

    /// Monday of the week containing this date.
    pub fn monday(&self) -> Self {
        // 01-01-0001 is a Monday, so this never leaves the key range.
        Self(self.0.week(Weekday::Mon).first_day())
    }

    /// Short `DD/MM` label used on chart axes.
    pub fn short_label(&self) -> String {
        format!("{:02}/{:02}", self.day(), self.month())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_date_key(self.day(), self.month(), self.year()))
    }
}

impl FromStr for DateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateKey,
    pub end: DateKey,
}

impl DateRange {
    /// Create a range; the bounds are swapped if given out of order.
    pub fn new(a: DateKey, b: DateKey) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn single(day: DateKey) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// The whole calendar month.
    pub fn month(month: u32, year: i32) -> Result<Self> {
        Ok(Self {
            start: DateKey::first_of_month(month, year)?,
            end: DateKey::last_of_month(month, year)?,
        })
    }

    /// The whole calendar year.
    pub fn year(year: i32) -> Result<Self> {
        Ok(Self {
            start: DateKey::new(1, 1, year)?,
            end: DateKey::new(31, 12, year)?,
        })
    }

    /// Seven days starting at the Monday of `day`'s week.
    ///
    /// The last week of year 9999 is cut short at 31 December.
    pub fn week_of(day: DateKey) -> Self {
        let monday = day.monday();
        Self {
            start: monday,
            end: monday
                .add_days(6)
                .unwrap_or_else(|| DateKey::clamped(31, 12, MAX_YEAR)),
        }
    }

    pub fn contains(&self, day: DateKey) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn len_days(&self) -> usize {
        let span = self.end.0.signed_duration_since(self.start.0).num_days();
        usize::try_from(span + 1).unwrap_or(0)
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = DateKey> {
        let end = self.end.0;
        self.start
            .0
            .iter_days()
            .take_while(move |day| *day <= end)
            .map(DateKey)
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_format() {
        let k = key("01-03-2024");
        assert_eq!((k.day(), k.month(), k.year()), (1, 3, 2024));
        assert_eq!(k.to_string(), "01-03-2024");
        assert_eq!(format_date_key(5, 7, 987), "05-07-987");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in [
            "1-03-2024",
            "01-3-2024",
            "2024-03-01",
            "01/03/2024",
            "01-03-",
            "aa-03-2024",
            "01-03-2024-1",
            "",
        ] {
            assert!(
                matches!(DateKey::parse(bad), Err(Error::MalformedDate { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(DateKey::parse("31-02-2024").is_err());
        assert!(DateKey::parse("29-02-2023").is_err());
        assert!(DateKey::parse("00-01-2024").is_err());
        assert!(DateKey::parse("10-13-2024").is_err());
        assert!(DateKey::parse("10-01-0000").is_err());
        assert!(DateKey::parse("29-02-2024").is_ok());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2023), 28);
        assert_eq!(days_in_month(2, 1900), 28);
        assert_eq!(days_in_month(2, 2000), 29);
        assert_eq!(days_in_month(4, 2024), 30);
        assert_eq!(days_in_month(12, 2024), 31);
        assert_eq!(days_in_month(13, 2024), 0);
        assert_eq!(days_in_month(12, i32::MAX), 0);
    }

    #[test]
    fn test_day_of_week() {
        // 1 January 2024 was a Monday
        assert_eq!(day_of_week(1, 1, 2024), 1);
        assert_eq!(day_of_week(7, 1, 2024), 7);
        assert_eq!(day_of_week(29, 2, 2024), 4);
        assert_eq!(day_of_week(1, 1, 1970), 4);
        assert_eq!(day_of_week(30, 2, 2024), 0);
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(key("31-12-2023") < key("01-01-2024"));
        assert!(key("02-01-2024") < key("01-02-2024"));
        assert!(key("01-02-2024") < key("02-02-2024"));
    }

    #[test]
    fn test_day_arithmetic_carries() {
        assert_eq!(key("31-12-2023").add_days(1), Some(key("01-01-2024")));
        assert_eq!(key("01-03-2024").add_days(-1), Some(key("29-02-2024")));
        assert_eq!(key("15-06-2024").add_days(0), Some(key("15-06-2024")));
        assert_eq!(key("17-08-1999").add_days(-365), Some(key("17-08-1998")));
    }

    #[test]
    fn test_day_arithmetic_stops_at_range_ends() {
        assert_eq!(key("31-12-9999").add_days(1), None);
        assert_eq!(key("01-01-0001").add_days(-1), None);
        assert_eq!(key("01-01-2024").add_days(i64::MAX), None);
        assert_eq!(key("01-01-2024").add_days(i64::MIN), None);
    }

    #[test]
    fn test_parse_rejects_years_outside_range() {
        assert!(DateKey::parse("31-12-9999").is_ok());
        assert!(matches!(
            DateKey::parse("01-01-10000"),
            Err(Error::MalformedDate { .. })
        ));
        assert!(matches!(
            DateKey::parse("31-12-2147483647"),
            Err(Error::MalformedDate { .. })
        ));
        assert!(DateKey::parse("01-01-99999999999").is_err());
    }

    #[test]
    fn test_last_week_is_clipped() {
        // 31 December 9999 is a Friday
        let week = DateRange::week_of(key("31-12-9999"));
        assert_eq!(week.start, key("27-12-9999"));
        assert_eq!(week.end, key("31-12-9999"));
        assert_eq!(week.len_days(), 5);
        assert_eq!(key("01-01-0001").monday(), key("01-01-0001"));
    }

    #[test]
    fn test_clamped() {
        assert_eq!(DateKey::clamped(31, 2, 2023), key("28-02-2023"));
        assert_eq!(DateKey::clamped(1, 13, 0), key("01-12-0001"));
        assert_eq!(DateKey::clamped(40, 12, i32::MAX), key("31-12-9999"));
    }

    #[test]
    fn test_monday_alignment() {
        // Sunday 3 March 2024 belongs to the week starting Monday 26 February
        assert_eq!(key("03-03-2024").monday(), key("26-02-2024"));
        assert_eq!(key("26-02-2024").monday(), key("26-02-2024"));
    }

    #[test]
    fn test_range_days() {
        let range = DateRange::month(2, 2024).unwrap();
        assert_eq!(range.len_days(), 29);
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.first(), Some(&key("01-02-2024")));
        assert_eq!(days.last(), Some(&key("29-02-2024")));

        let week = DateRange::week_of(key("01-03-2024"));
        assert_eq!(week.start, key("26-02-2024"));
        assert_eq!(week.end, key("03-03-2024"));
        assert!(week.contains(key("29-02-2024")));
    }

    #[test]
    fn test_serde_as_string() {
        let k = key("09-11-2025");
        let json = serde_json::to_string(&k).unwrap();
        assert_eq!(json, "\"09-11-2025\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, k);
        assert!(serde_json::from_str::<DateKey>("\"2025-11-09\"").is_err());
    }
}
