//! Stats-panel summary.

use serde::Serialize;

use super::bucketing::{BucketKey, Totals};
use super::entries;
use super::metrics::{
    compute_available_years, compute_subject_distribution, split_of, Split, SubjectShare,
};
use crate::date_key::{DateKey, DateRange};
use crate::format::month_name;
use crate::types::{StudySession, Subject};

/// Headline numbers for the dashboard, relative to `today`.
///
/// Subject shares and the split cover the whole snapshot; the month and year
/// totals cover the calendar month and year containing `today`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today: DateKey,
    /// e.g. "October 2026"
    pub month_label: String,
    pub month_total: Totals,
    pub year_total: Totals,
    pub all_time: Totals,
    pub split: Split,
    pub subjects: Vec<SubjectShare>,
    pub available_years: Vec<i32>,
}

pub fn compute_summary(
    sessions: &[StudySession],
    subjects: &[Subject],
    today: DateKey,
) -> DashboardSummary {
    let entries = entries(sessions);
    let month = period_of(BucketKey::Month {
        year: today.year(),
        month: today.month(),
    });
    let year = period_of(BucketKey::Year { year: today.year() });

    DashboardSummary {
        today,
        month_label: format!("{} {}", month_name(today.month()), today.year()),
        month_total: Totals::from_entries(entries.iter().filter(|e| month.contains(e.date))),
        year_total: Totals::from_entries(entries.iter().filter(|e| year.contains(e.date))),
        all_time: Totals::from_entries(&entries),
        split: split_of(&entries),
        subjects: compute_subject_distribution(sessions, subjects),
        available_years: compute_available_years(sessions),
    }
}

fn period_of(key: BucketKey) -> DateRange {
    DateRange::new(key.start(), key.end())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{session, subject_session};
    use super::*;
    use crate::types::StudyType;

    #[test]
    fn test_summary_scopes() {
        let subjects = vec![Subject {
            id: "1".to_string(),
            name: "Math".to_string(),
            color: "#f00".to_string(),
        }];
        let sessions = vec![
            subject_session("1", "03-10-2026", "Math", 2.0),
            session("2", "14-10-2026", 1.5, Some(StudyType::Practical)),
            session("3", "20-01-2026", 4.0, Some(StudyType::Practical)),
            subject_session("4", "30-12-2025", "Math", 2.5),
        ];
        let today = DateKey::parse("14-10-2026").unwrap();

        let summary = compute_summary(&sessions, &subjects, today);
        assert_eq!(summary.month_label, "October 2026");
        assert_eq!(summary.month_total.total_hours, 3.5);
        assert_eq!(summary.year_total.total_hours, 7.5);
        assert_eq!(summary.all_time.total_hours, 10.0);
        assert_eq!(summary.all_time.session_count, 4);
        assert_eq!(summary.split.theoretical_hours, 4.5);
        assert_eq!(summary.split.practical_hours, 5.5);
        assert_eq!(summary.subjects.len(), 1);
        assert_eq!(summary.subjects[0].hours, 4.5);
        assert_eq!(summary.available_years, vec![2026, 2025]);
    }

    #[test]
    fn test_summary_empty() {
        let today = DateKey::parse("01-02-2024").unwrap();
        let summary = compute_summary(&[], &[], today);
        assert!(summary.month_total.is_empty());
        assert_eq!(summary.split.theoretical_percent, 0.0);
        assert!(summary.subjects.is_empty());
        assert!(summary.available_years.is_empty());
    }
}
