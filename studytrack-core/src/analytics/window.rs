//! Time window selection and navigation for charts.
//!
//! A [`Window`] is plain state owned by the caller. Navigation never mutates
//! in place: `next`, `previous`, `with_zoom` and `reset_to_today` take the
//! current state and return the next one.
//!
//! Months are held 0-based (`month_index` 0 = January) so wrap-around is the
//! familiar 11 → 0 / 0 → 11 with a year carry.

use serde::{Deserialize, Serialize};

use crate::date_key::{DateKey, DateRange};

/// Day of the month used as the reference for weeks of historical months.
pub const HISTORICAL_REFERENCE_DAY: u32 = 15;

/// How much time a chart window covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    /// A single day
    Day,
    /// A Monday-aligned week
    Week,
    /// A calendar month
    #[default]
    Month,
    /// A calendar year
    Year,
    /// Everything in the data set
    All,
}

impl ZoomLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoomLevel::Day => "day",
            ZoomLevel::Week => "week",
            ZoomLevel::Month => "month",
            ZoomLevel::Year => "year",
            ZoomLevel::All => "all",
        }
    }
}

impl std::fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ZoomLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(ZoomLevel::Day),
            "week" => Ok(ZoomLevel::Week),
            "month" => Ok(ZoomLevel::Month),
            "year" => Ok(ZoomLevel::Year),
            "all" => Ok(ZoomLevel::All),
            _ => Err(format!("unknown zoom level: {}", s)),
        }
    }
}

/// Navigation state for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub zoom: ZoomLevel,
    /// Anchor month, 0 = January .. 11 = December
    pub month_index: u32,
    /// Anchor year
    pub year: i32,
    /// Weeks away from the reference week (week zoom only)
    pub week_offset: i64,
    /// Days away from the reference day (day zoom only)
    pub day_offset: i64,
}

impl Window {
    /// A window at `zoom`, anchored on today's month.
    pub fn new(zoom: ZoomLevel, today: DateKey) -> Self {
        Self {
            zoom,
            month_index: today.month() - 1,
            year: today.year(),
            week_offset: 0,
            day_offset: 0,
        }
    }

    /// A window anchored on a specific 1-based month.
    ///
    /// Out-of-range months are clamped into 1..=12.
    pub fn at_month(zoom: ZoomLevel, month: u32, year: i32) -> Self {
        Self {
            zoom,
            month_index: month.clamp(1, 12) - 1,
            year,
            week_offset: 0,
            day_offset: 0,
        }
    }

    /// Anchor month as 1-based.
    pub fn month(&self) -> u32 {
        self.month_index + 1
    }

    /// Advance by one unit of the current zoom level.
    pub fn next(self) -> Self {
        match self.zoom {
            ZoomLevel::Day => Self {
                day_offset: self.day_offset.saturating_add(1),
                ..self
            },
            ZoomLevel::Week => Self {
                week_offset: self.week_offset.saturating_add(1),
                ..self
            },
            ZoomLevel::Month => {
                let (month_index, year) = if self.month_index >= 11 {
                    (0, self.year.saturating_add(1))
                } else {
                    (self.month_index + 1, self.year)
                };
                self.moved_to(month_index, year)
            }
            ZoomLevel::Year => Self {
                year: self.year.saturating_add(1),
                ..self
            },
            ZoomLevel::All => self,
        }
    }

    /// Retreat by one unit of the current zoom level.
    pub fn previous(self) -> Self {
        match self.zoom {
            ZoomLevel::Day => Self {
                day_offset: self.day_offset.saturating_sub(1),
                ..self
            },
            ZoomLevel::Week => Self {
                week_offset: self.week_offset.saturating_sub(1),
                ..self
            },
            ZoomLevel::Month => {
                let (month_index, year) = if self.month_index == 0 {
                    (11, self.year.saturating_sub(1))
                } else {
                    (self.month_index - 1, self.year)
                };
                self.moved_to(month_index, year)
            }
            ZoomLevel::Year => Self {
                year: self.year.saturating_sub(1),
                ..self
            },
            ZoomLevel::All => self,
        }
    }

    /// Like [`Window::next`], but year windows only move to the next newer
    /// year present in `years`. No-op when there is none.
    pub fn next_within(self, years: &[i32]) -> Self {
        if self.zoom != ZoomLevel::Year {
            return self.next();
        }
        match years.iter().copied().filter(|&y| y > self.year).min() {
            Some(year) => Self { year, ..self },
            None => self,
        }
    }

    /// Like [`Window::previous`], but year windows only move to the next
    /// older year present in `years`. No-op when there is none.
    pub fn previous_within(self, years: &[i32]) -> Self {
        if self.zoom != ZoomLevel::Year {
            return self.previous();
        }
        match years.iter().copied().filter(|&y| y < self.year).max() {
            Some(year) => Self { year, ..self },
            None => self,
        }
    }

    /// Whether [`Window::next_within`] would move.
    pub fn can_next_within(&self, years: &[i32]) -> bool {
        self.next_within(years) != *self
    }

    /// Whether [`Window::previous_within`] would move.
    pub fn can_previous_within(&self, years: &[i32]) -> bool {
        self.previous_within(years) != *self
    }

    /// Jump back to today's month and clear all offsets.
    pub fn reset_to_today(self, today: DateKey) -> Self {
        Self::new(self.zoom, today)
    }

    /// Switch zoom level, clearing the offset that belonged to the level
    /// being left. Anchors are kept.
    pub fn with_zoom(self, zoom: ZoomLevel) -> Self {
        if zoom == self.zoom {
            return self;
        }
        let mut next = Self { zoom, ..self };
        match self.zoom {
            ZoomLevel::Week => next.week_offset = 0,
            ZoomLevel::Day => next.day_offset = 0,
            _ => {}
        }
        next
    }

    /// True when the anchor month is the month containing `today`.
    pub fn is_current_month(&self, today: DateKey) -> bool {
        self.month() == today.month() && self.year == today.year()
    }

    /// Reference date for week windows.
    ///
    /// Today when the anchor is the current month and no week offset is
    /// applied, otherwise the 15th of the anchor month. `None` when the
    /// anchor year is outside the calendar.
    pub fn week_reference(&self, today: DateKey) -> Option<DateKey> {
        if self.is_current_month(today) && self.week_offset == 0 {
            Some(today)
        } else {
            self.mid_month()
        }
    }

    /// Reference date for day windows, before `day_offset` is applied.
    pub fn day_reference(&self, today: DateKey) -> Option<DateKey> {
        if self.is_current_month(today) {
            Some(today)
        } else {
            self.mid_month()
        }
    }

    fn mid_month(&self) -> Option<DateKey> {
        DateKey::new(HISTORICAL_REFERENCE_DAY, self.month(), self.year).ok()
    }

    /// The calendar days this window covers.
    ///
    /// `data_bounds` is only consulted for [`ZoomLevel::All`], which returns
    /// `None` when there is no data. Other levels return `None` when the
    /// anchor year or the offset lands outside the calendar.
    pub fn resolve(&self, today: DateKey, data_bounds: Option<DateRange>) -> Option<DateRange> {
        match self.zoom {
            ZoomLevel::Day => self
                .day_reference(today)?
                .add_days(self.day_offset)
                .map(DateRange::single),
            ZoomLevel::Week => {
                let monday = self.week_reference(today)?.monday();
                let shift = self.week_offset.checked_mul(7)?;
                monday.add_days(shift).map(DateRange::week_of)
            }
            ZoomLevel::Month => DateRange::month(self.month(), self.year).ok(),
            ZoomLevel::Year => DateRange::year(self.year).ok(),
            ZoomLevel::All => data_bounds,
        }
    }

    fn moved_to(self, month_index: u32, year: i32) -> Self {
        Self {
            month_index,
            year,
            week_offset: 0,
            day_offset: 0,
            ..self
        }
    }
}
