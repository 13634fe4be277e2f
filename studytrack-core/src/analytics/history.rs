//! Reverse-chronological views for the history dialogs.

use std::collections::BTreeMap;

use serde::Serialize;

use super::bucketing::{BucketKey, Totals};
use super::{entries, Entry};
use crate::types::StudySession;

/// Sessions of one calendar month, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGroup<'a> {
    pub year: i32,
    pub month: u32,
    /// e.g. "March 2024"
    pub label: String,
    #[serde(flatten)]
    pub totals: Totals,
    pub sessions: Vec<&'a StudySession>,
}

/// Group sessions by `(year, month)`, most recent month first.
///
/// Only months with at least one session appear.
pub fn group_by_month(sessions: &[StudySession]) -> Vec<MonthGroup<'_>> {
    let mut months: BTreeMap<(i32, u32), Vec<Entry<'_>>> = BTreeMap::new();
    for entry in entries(sessions) {
        months
            .entry((entry.date.year(), entry.date.month()))
            .or_default()
            .push(entry);
    }

    months
        .into_iter()
        .rev()
        .map(|((year, month), mut entries)| {
            sort_newest_first(&mut entries);
            MonthGroup {
                year,
                month,
                label: BucketKey::Month { year, month }.label(),
                totals: Totals::from_entries(&entries),
                sessions: entries.iter().map(|e| e.session).collect(),
            }
        })
        .collect()
}

/// Sessions newest first, optionally restricted to one `(year, month)`.
///
/// Sessions on the same day keep their original order. Deleted sessions and
/// unparseable dates are left out.
pub fn sorted_listing(
    sessions: &[StudySession],
    month: Option<(i32, u32)>,
) -> Vec<&StudySession> {
    let mut entries: Vec<_> = entries(sessions)
        .into_iter()
        .filter(|e| month.map_or(true, |(y, m)| e.date.year() == y && e.date.month() == m))
        .collect();
    sort_newest_first(&mut entries);
    entries.into_iter().map(|e| e.session).collect()
}

// sort_by is stable, so same-day entries stay in input order.
fn sort_newest_first(entries: &mut [Entry<'_>]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}
