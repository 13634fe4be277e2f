//! Core domain types for studytrack
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **StudySession** | One logged block of study time on a given day |
//! | **Subject** | A catalog entry (name + color) a session can be filed under |
//! | **SubjectRef** | The name/color snapshot copied onto a session when it is saved |
//! | **StudyType** | Whether the time was theoretical or practical work |
//!
//! ### Subject vs SubjectRef
//!
//! Sessions do not point at live catalog records. When a session is saved the
//! subject's name and color are copied onto it, so renaming or deleting a
//! [`Subject`] never relabels history. Aggregations that need catalog colors
//! join on the name at read time.

use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::Result;

// ============================================
// Subjects
// ============================================

/// A subject in the user's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique identifier
    pub id: String,
    /// Display name, unique (case-insensitively) among subjects
    pub name: String,
    /// Color token used for this subject on every chart
    pub color: String,
}

/// Subject snapshot stored on a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<&Subject> for SubjectRef {
    fn from(subject: &Subject) -> Self {
        Self {
            name: subject.name.clone(),
            color: Some(subject.color.clone()),
        }
    }
}

// ============================================
// Study type
// ============================================

/// Category of study time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyType {
    Theoretical,
    Practical,
}

impl StudyType {
    /// Canonical identifier used in serialized data
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyType::Theoretical => "theoretical",
            StudyType::Practical => "practical",
        }
    }

    /// Returns the display name for this study type
    pub fn display_name(&self) -> &'static str {
        match self {
            StudyType::Theoretical => "Theoretical",
            StudyType::Practical => "Practical",
        }
    }

    /// Lenient label parsing.
    ///
    /// Case and the Spanish accents are folded away, so "Teórico", "teorico"
    /// and "THEORETICAL" all map to [`StudyType::Theoretical`].
    pub fn from_label(label: &str) -> Option<Self> {
        match fold_label(label).as_str() {
            "teorico" | "theoretical" | "theory" => Some(StudyType::Theoretical),
            "practico" | "practical" | "practice" => Some(StudyType::Practical),
            _ => None,
        }
    }
}

impl std::fmt::Display for StudyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StudyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        StudyType::from_label(s).ok_or_else(|| format!("unknown study type: {}", s))
    }
}

/// Lowercase and strip the diacritics that occur in category labels, in
/// both precomposed and combining-mark form.
fn fold_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| !('\u{300}'..='\u{36f}').contains(c))
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            other => other,
        })
        .collect()
}

// ============================================
// Study sessions
// ============================================

/// A single logged study session.
///
/// The date stays in its `DD-MM-YYYY` text form here because upstream data
/// is not guaranteed to be valid; the analytics layer parses it once per
/// computation and drops sessions whose date does not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    /// Unique identifier
    pub id: String,
    /// Calendar date as `DD-MM-YYYY`
    pub date: String,
    /// Subject snapshot (None when the session was saved without one)
    #[serde(default)]
    pub subject: Option<SubjectRef>,
    /// Hours studied
    #[serde(default)]
    pub hours: f64,
    /// Theoretical or practical, if known
    #[serde(default)]
    pub study_type: Option<StudyType>,
    /// Soft-delete marker; deleted sessions stay in the collection
    #[serde(default)]
    pub deleted: bool,
}

impl StudySession {
    /// Parse the session date.
    pub fn date_key(&self) -> Result<DateKey> {
        DateKey::parse(&self.date)
    }

    /// Hours this session contributes to totals.
    ///
    /// Deleted sessions and non-positive or non-finite hours contribute 0.
    pub fn effective_hours(&self) -> f64 {
        if self.deleted || !self.hours.is_finite() || self.hours <= 0.0 {
            0.0
        } else {
            self.hours
        }
    }

    /// Subject name, if the session has one.
    pub fn subject_name(&self) -> Option<&str> {
        self.subject
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|name| !name.is_empty())
    }
}
