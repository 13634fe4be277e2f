//! Bucketing engine: sessions → ordered, zero-filled series.
//!
//! A bucket is always a whole calendar unit (a day, a Monday-aligned week, a
//! month or a year). The window decides *which* units appear in a series;
//! each unit then sums every session that falls inside it. This is what lets
//! a week straddling two months pull data from both, and what makes a month
//! window render one bar per day whether or not anything was logged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::window::Window;
use super::{data_bounds, entries, Entry};
use crate::date_key::{DateKey, DateRange};
use crate::format::month_name;
use crate::types::{StudySession, StudyType};

/// Time resolution of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// The bucket a date belongs to at this granularity.
    pub fn key_for(&self, date: DateKey) -> BucketKey {
        match self {
            Granularity::Day => BucketKey::Day { date },
            Granularity::Week => BucketKey::Week {
                monday: date.monday(),
            },
            Granularity::Month => BucketKey::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Year => BucketKey::Year { year: date.year() },
        }
    }

    /// Every bucket of this granularity that overlaps `range`, ascending.
    pub fn units(&self, range: DateRange) -> Vec<BucketKey> {
        match self {
            Granularity::Day => range.days().map(|date| BucketKey::Day { date }).collect(),
            Granularity::Week => {
                let mut keys = Vec::new();
                let mut monday = range.start.monday();
                while monday <= range.end {
                    keys.push(BucketKey::Week { monday });
                    match monday.add_days(7) {
                        Some(next) => monday = next,
                        None => break,
                    }
                }
                keys
            }
            Granularity::Month => {
                let mut keys = Vec::new();
                let mut first = Some(range.start);
                while let Some(day) = first.filter(|day| *day <= range.end) {
                    keys.push(BucketKey::Month {
                        year: day.year(),
                        month: day.month(),
                    });
                    // Last day of this month, plus one
                    first = BucketKey::Month {
                        year: day.year(),
                        month: day.month(),
                    }
                    .end()
                    .add_days(1);
                }
                keys
            }
            Granularity::Year => (range.start.year()..=range.end.year())
                .map(|year| BucketKey::Year { year })
                .collect(),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            _ => Err(format!("unknown granularity: {}", s)),
        }
    }
}

/// Identity of a bucket. Ordering within one granularity is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "granularity", rename_all = "lowercase")]
pub enum BucketKey {
    Day { date: DateKey },
    Week { monday: DateKey },
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl BucketKey {
    /// First day covered by this bucket.
    ///
    /// Hand-built keys outside the calendar are clamped to the nearest day.
    pub fn start(&self) -> DateKey {
        match *self {
            BucketKey::Day { date } => date,
            BucketKey::Week { monday } => monday,
            BucketKey::Month { year, month } => DateKey::clamped(1, month, year),
            BucketKey::Year { year } => DateKey::clamped(1, 1, year),
        }
    }

    /// Last day covered by this bucket.
    pub fn end(&self) -> DateKey {
        match *self {
            BucketKey::Day { date } => date,
            BucketKey::Week { monday } => DateRange::week_of(monday).end,
            BucketKey::Month { year, month } => DateKey::clamped(31, month, year),
            BucketKey::Year { year } => DateKey::clamped(31, 12, year),
        }
    }

    /// Year of the bucket's first day.
    pub fn year(&self) -> i32 {
        self.start().year()
    }

    /// Display label for this period.
    pub fn label(&self) -> String {
        match self {
            BucketKey::Day { date } => date.short_label(),
            BucketKey::Week { monday } => {
                format!("{} - {}", monday.short_label(), self.end().short_label())
            }
            BucketKey::Month { year, month } => format!("{} {}", month_name(*month), year),
            BucketKey::Year { year } => year.to_string(),
        }
    }
}

/// Summed metrics for a set of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_hours: f64,
    pub theoretical_hours: f64,
    pub practical_hours: f64,
    pub session_count: usize,
}

impl Totals {
    pub(crate) fn add(&mut self, entry: &Entry<'_>) {
        self.total_hours += entry.hours;
        match entry.study_type {
            Some(StudyType::Theoretical) => self.theoretical_hours += entry.hours,
            Some(StudyType::Practical) => self.practical_hours += entry.hours,
            None => {}
        }
        self.session_count += 1;
    }

    pub(crate) fn from_entries<'a, 's: 'a>(entries: impl IntoIterator<Item = &'a Entry<'s>>) -> Self {
        let mut totals = Totals::default();
        for entry in entries {
            totals.add(entry);
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.session_count == 0
    }
}

/// One aggregated period of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub key: BucketKey,
    pub period_label: String,
    #[serde(flatten)]
    pub totals: Totals,
}

impl Bucket {
    fn new(key: BucketKey, totals: Totals) -> Self {
        Self {
            period_label: key.label(),
            key,
            totals,
        }
    }
}

/// Chart series for a window, ascending and zero-filled.
///
/// Returns an empty series only when the window resolves to nothing (the
/// `all` zoom level over an empty or fully-invalid snapshot).
pub fn compute_series(
    sessions: &[StudySession],
    granularity: Granularity,
    window: &Window,
    today: DateKey,
) -> Vec<Bucket> {
    let entries = entries(sessions);
    match window.resolve(today, data_bounds(&entries)) {
        Some(range) => fill(&entries, granularity, range),
        None => Vec::new(),
    }
}

/// Chart series over an explicit range, ascending and zero-filled.
pub fn compute_series_in(
    sessions: &[StudySession],
    granularity: Granularity,
    range: DateRange,
) -> Vec<Bucket> {
    fill(&entries(sessions), granularity, range)
}

/// Periods that contain at least one session, newest first.
pub fn compute_history(sessions: &[StudySession], granularity: Granularity) -> Vec<Bucket> {
    let mut grouped: BTreeMap<BucketKey, Totals> = BTreeMap::new();
    for entry in entries(sessions) {
        grouped
            .entry(granularity.key_for(entry.date))
            .or_default()
            .add(&entry);
    }

    grouped
        .into_iter()
        .rev()
        .map(|(key, totals)| Bucket::new(key, totals))
        .collect()
}

fn fill(entries: &[Entry<'_>], granularity: Granularity, range: DateRange) -> Vec<Bucket> {
    let mut buckets: BTreeMap<BucketKey, Totals> = granularity
        .units(range)
        .into_iter()
        .map(|key| (key, Totals::default()))
        .collect();

    for entry in entries {
        if let Some(totals) = buckets.get_mut(&granularity.key_for(entry.date)) {
            totals.add(entry);
        }
    }

    buckets
        .into_iter()
        .map(|(key, totals)| Bucket::new(key, totals))
        .collect()
}
