//! Derived metrics: subject distribution, theoretical/practical split,
//! available years and multi-year comparison.
//!
//! All percentages go through [`percent_of`], which returns 0 for an empty
//! denominator instead of NaN or infinity.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::bucketing::{compute_history, Bucket, BucketKey, Granularity, Totals};
use super::{entries, Entry};
use crate::date_key::{DateKey, DateRange};
use crate::types::{StudySession, StudyType, Subject};

/// `part` as a percentage of `whole`; 0 when `whole` is zero or not finite.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 || !whole.is_finite() || !part.is_finite() {
        0.0
    } else {
        (part / whole) * 100.0
    }
}

// ============================================
// Subject distribution
// ============================================

/// Hours spent on one subject and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectShare {
    pub name: String,
    pub color: String,
    pub hours: f64,
    pub percent: f64,
}

/// Hours per catalog subject, largest first.
///
/// Sessions are matched to catalog subjects by their name snapshot. Subjects
/// with no time are left out. Percentages are relative to every screened
/// session's hours, so they add up to 100 only when every session matches a
/// catalog subject. Ties keep catalog order.
pub fn compute_subject_distribution(
    sessions: &[StudySession],
    subjects: &[Subject],
) -> Vec<SubjectShare> {
    let entries = entries(sessions);
    let grand_total: f64 = entries.iter().map(|e| e.hours).sum();

    let mut seen = HashSet::new();
    let mut shares: Vec<SubjectShare> = subjects
        .iter()
        .filter(|subject| seen.insert(subject.name.as_str()))
        .map(|subject| {
            let hours: f64 = entries
                .iter()
                .filter(|e| e.session.subject_name() == Some(subject.name.as_str()))
                .map(|e| e.hours)
                .sum();
            SubjectShare {
                name: subject.name.clone(),
                color: subject.color.clone(),
                hours,
                percent: percent_of(hours, grand_total),
            }
        })
        .filter(|share| share.hours > 0.0)
        .collect();

    shares.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    shares
}

// ============================================
// Theoretical vs practical
// ============================================

/// Theoretical and practical hours with their relative shares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub theoretical_hours: f64,
    pub practical_hours: f64,
    /// Theoretical share of theoretical + practical, 0-100
    pub theoretical_percent: f64,
    /// Practical share of theoretical + practical, 0-100
    pub practical_percent: f64,
}

impl Split {
    pub fn new(theoretical_hours: f64, practical_hours: f64) -> Self {
        let both = theoretical_hours + practical_hours;
        Self {
            theoretical_hours,
            practical_hours,
            theoretical_percent: percent_of(theoretical_hours, both),
            practical_percent: percent_of(practical_hours, both),
        }
    }
}

/// Theoretical vs practical hours across a snapshot.
///
/// Sessions without a recognised study type are in neither side.
pub fn compute_theoretical_practical_split(sessions: &[StudySession]) -> Split {
    split_of(&entries(sessions))
}

pub(crate) fn split_of(entries: &[Entry<'_>]) -> Split {
    let sum_of = |kind: StudyType| -> f64 {
        entries
            .iter()
            .filter(|e| e.study_type == Some(kind))
            .map(|e| e.hours)
            .sum()
    };
    Split::new(sum_of(StudyType::Theoretical), sum_of(StudyType::Practical))
}

// ============================================
// Years
// ============================================

/// Distinct years with at least one session, newest first.
pub fn compute_available_years(sessions: &[StudySession]) -> Vec<i32> {
    let years: BTreeSet<i32> = entries(sessions).iter().map(|e| e.date.year()).collect();
    years.into_iter().rev().collect()
}

/// Year a history view opens on: the current year if it has data, else the
/// most recent year with data, else the current year.
pub fn default_year(years: &[i32], today: DateKey) -> i32 {
    if years.contains(&today.year()) {
        today.year()
    } else {
        years.first().copied().unwrap_or(today.year())
    }
}

/// Initial pair for the comparison view: the default year and the most
/// recent other year. None with fewer than two years.
pub fn default_comparison(years: &[i32], today: DateKey) -> Option<(i32, i32)> {
    if years.len() < 2 {
        return None;
    }
    let selected = default_year(years, today);
    let other = years.iter().copied().find(|&y| y != selected)?;
    Some((selected, other))
}

/// Bounded cursor over the available years (newest first), used by the
/// year pickers in the history views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearCursor {
    years: Vec<i32>,
    index: usize,
}

impl YearCursor {
    /// Cursor positioned on [`default_year`].
    pub fn new(years: Vec<i32>, today: DateKey) -> Self {
        let selected = default_year(&years, today);
        let index = years.iter().position(|&y| y == selected).unwrap_or(0);
        Self { years, index }
    }

    /// Currently selected year; None when there are no years.
    pub fn selected(&self) -> Option<i32> {
        self.years.get(self.index).copied()
    }

    /// Jump to a year if it is available.
    pub fn select(mut self, year: i32) -> Self {
        if let Some(index) = self.years.iter().position(|&y| y == year) {
            self.index = index;
        }
        self
    }

    pub fn can_previous(&self) -> bool {
        self.index + 1 < self.years.len()
    }

    pub fn can_next(&self) -> bool {
        self.index > 0 && !self.years.is_empty()
    }

    /// Move to the next older year; no-op at the oldest.
    pub fn previous(mut self) -> Self {
        if self.can_previous() {
            self.index += 1;
        }
        self
    }

    /// Move to the next newer year; no-op at the newest.
    pub fn next(mut self) -> Self {
        if self.can_next() {
            self.index -= 1;
        }
        self
    }
}

/// Totals for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearTotals {
    pub year: i32,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Per-year totals for every year with data, newest first.
pub fn yearly_totals(sessions: &[StudySession]) -> Vec<YearTotals> {
    compute_history(sessions, Granularity::Year)
        .into_iter()
        .map(|bucket| YearTotals {
            year: bucket.key.year(),
            totals: bucket.totals,
        })
        .collect()
}

/// Why a comparison cannot be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unavailable {
    /// Fewer than two years have data
    InsufficientYears { found: usize },
    /// A requested year has no sessions
    YearWithoutData { year: i32 },
    /// Both sides are the same year
    SameYear { year: i32 },
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailable::InsufficientYears { found } => {
                write!(f, "need at least 2 years with data, found {}", found)
            }
            Unavailable::YearWithoutData { year } => write!(f, "no sessions in {}", year),
            Unavailable::SameYear { year } => write!(f, "cannot compare {} with itself", year),
        }
    }
}

/// One category row of a year comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub category: &'static str,
    pub first: f64,
    pub second: f64,
}

/// Side-by-side yearly totals, or the reason they are unavailable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Comparison {
    Available {
        first: YearTotals,
        second: YearTotals,
    },
    Unavailable {
        reason: Unavailable,
    },
}

impl Comparison {
    pub fn is_available(&self) -> bool {
        matches!(self, Comparison::Available { .. })
    }

    /// Theoretical, practical and total rows, when available.
    pub fn rows(&self) -> Option<[ComparisonRow; 3]> {
        match self {
            Comparison::Available { first, second } => Some([
                ComparisonRow {
                    category: "theoretical",
                    first: first.totals.theoretical_hours,
                    second: second.totals.theoretical_hours,
                },
                ComparisonRow {
                    category: "practical",
                    first: first.totals.practical_hours,
                    second: second.totals.practical_hours,
                },
                ComparisonRow {
                    category: "total",
                    first: first.totals.total_hours,
                    second: second.totals.total_hours,
                },
            ]),
            Comparison::Unavailable { .. } => None,
        }
    }
}

/// Compare two years.
///
/// Unavailable unless the data has at least two distinct years, both
/// requested years have sessions, and they differ.
pub fn compute_year_comparison(sessions: &[StudySession], first: i32, second: i32) -> Comparison {
    let totals = yearly_totals(sessions);
    let unavailable = |reason| Comparison::Unavailable { reason };

    if totals.len() < 2 {
        return unavailable(Unavailable::InsufficientYears {
            found: totals.len(),
        });
    }
    if first == second {
        return unavailable(Unavailable::SameYear { year: first });
    }

    let find = |year: i32| totals.iter().copied().find(|t| t.year == year);
    match (find(first), find(second)) {
        (Some(first), Some(second)) => Comparison::Available { first, second },
        (None, _) => unavailable(Unavailable::YearWithoutData { year: first }),
        (_, None) => unavailable(Unavailable::YearWithoutData { year: second }),
    }
}

// ============================================
// Period totals
// ============================================

/// Totals for every session inside `range`.
pub fn period_total(sessions: &[StudySession], range: DateRange) -> Totals {
    let entries = entries(sessions);
    Totals::from_entries(entries.iter().filter(|e| range.contains(e.date)))
}

/// A series point with its cumulative sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTotal {
    pub key: BucketKey,
    pub period_label: String,
    pub hours: f64,
    pub cumulative_hours: f64,
}

/// Cumulative hours along an ascending series.
pub fn running_totals(series: &[Bucket]) -> Vec<RunningTotal> {
    let mut cumulative = 0.0;
    series
        .iter()
        .map(|bucket| {
            cumulative += bucket.totals.total_hours;
            RunningTotal {
                key: bucket.key,
                period_label: bucket.period_label.clone(),
                hours: bucket.totals.total_hours,
                cumulative_hours: cumulative,
            }
        })
        .collect()
}
