//! Analytics module for studytrack
//!
//! Turns a flat snapshot of study sessions into chart-ready series and
//! derived metrics:
//! - Bucketed series by day, week, month or year ([`bucketing`])
//! - The navigable time window behind each chart ([`window`])
//! - Subject distribution, theoretical/practical split, year comparison
//!   ([`metrics`])
//! - Reverse-chronological listings for the history views ([`history`])
//! - Stats-panel summary ([`dashboard`])
//!
//! Every function here is pure: inputs are borrowed snapshots, nothing is
//! cached between calls and nothing is mutated.
//!
//! ## Data quality
//!
//! Sessions are screened once per call before aggregation. Soft-deleted
//! sessions and sessions whose date does not parse are dropped; they are
//! logged at `debug` level and never surface as errors.

pub mod bucketing;
pub mod dashboard;
pub mod history;
pub mod metrics;
pub mod window;

pub use bucketing::{
    compute_history, compute_series, compute_series_in, Bucket, BucketKey, Granularity, Totals,
};
pub use dashboard::{compute_summary, DashboardSummary};
pub use history::{group_by_month, sorted_listing, MonthGroup};
pub use metrics::{
    compute_available_years, compute_subject_distribution, compute_theoretical_practical_split,
    compute_year_comparison, default_comparison, default_year, percent_of, period_total,
    running_totals, yearly_totals, Comparison, ComparisonRow, RunningTotal, Split, SubjectShare,
    Unavailable, YearCursor, YearTotals,
};
pub use window::{Window, ZoomLevel};

use crate::date_key::{DateKey, DateRange};
use crate::types::{StudySession, StudyType};

/// A session that passed screening, with its date parsed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry<'a> {
    pub date: DateKey,
    pub hours: f64,
    pub study_type: Option<StudyType>,
    pub session: &'a StudySession,
}

/// Screen a snapshot: drop deleted sessions and unparseable dates.
///
/// Input order is preserved.
pub(crate) fn entries(sessions: &[StudySession]) -> Vec<Entry<'_>> {
    let mut dropped = 0usize;
    let entries: Vec<_> = sessions
        .iter()
        .filter(|session| !session.deleted)
        .filter_map(|session| match session.date_key() {
            Ok(date) => Some(Entry {
                date,
                hours: session.effective_hours(),
                study_type: session.study_type,
                session,
            }),
            Err(e) => {
                dropped += 1;
                tracing::debug!(session_id = %session.id, error = %e, "Dropping session with malformed date");
                None
            }
        })
        .collect();

    if dropped > 0 {
        tracing::debug!(dropped, kept = entries.len(), "Screened session snapshot");
    }
    entries
}

/// First and last dated entry, if any.
pub(crate) fn data_bounds(entries: &[Entry<'_>]) -> Option<DateRange> {
    let first = entries.iter().map(|e| e.date).min()?;
    let last = entries.iter().map(|e| e.date).max()?;
    Some(DateRange::new(first, last))
}
