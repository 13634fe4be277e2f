//! Data source boundary.
//!
//! The analytics layer only ever sees an in-memory [`Snapshot`]. A
//! [`SessionSource`] is whatever produces one: an already-built snapshot or
//! a JSON file in the remote API's wire shape ([`SnapshotFile`]).
//!
//! ## Wire shape
//!
//! ```json
//! {
//!   "sessions": [
//!     { "id": 12, "date": "2024-03-15", "subject": { "name": "Math" },
//!       "hours": 2.5, "studyType": "teórico" }
//!   ],
//!   "subjects": [ { "id": 1, "name": "Math", "color": "#f00" } ]
//! }
//! ```
//!
//! Ids may be numbers or strings. Dates are accepted as `YYYY-MM-DD` (turned
//! into `DD-MM-YYYY` by reversing the parts) or already as `DD-MM-YYYY`.
//! Study type labels go through [`StudyType::from_label`].
//!
//! Older exports mark soft-deleted sessions by emptying them instead of
//! setting `deleted`. A record with no `deleted` field whose subject, hours
//! and type are all empty is read as deleted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entry::validate_subject_name;
use crate::error::{Error, Result};
use crate::types::{StudySession, StudyType, Subject, SubjectRef};

/// Produces the session and subject collections the analytics consume.
pub trait SessionSource {
    fn fetch_sessions(&self) -> Result<Vec<StudySession>>;
    fn fetch_subjects(&self) -> Result<Vec<Subject>>;
}

/// An in-memory copy of every session and subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub sessions: Vec<StudySession>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl SessionSource for Snapshot {
    fn fetch_sessions(&self) -> Result<Vec<StudySession>> {
        Ok(self.sessions.clone())
    }

    fn fetch_subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.subjects.clone())
    }
}

impl Snapshot {
    /// Build a snapshot from any source.
    pub fn fetch(source: &dyn SessionSource) -> Result<Self> {
        Ok(Self {
            sessions: source.fetch_sessions()?,
            subjects: source.fetch_subjects()?,
        })
    }

    pub fn session(&self, id: &str) -> Option<&StudySession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Append a new session. Ids must be unique.
    pub fn add_session(&mut self, session: StudySession) -> Result<()> {
        if self.session(&session.id).is_some() {
            return Err(Error::Validation(format!(
                "session id {:?} is already in use",
                session.id
            )));
        }
        tracing::debug!(session_id = %session.id, date = %session.date, "Adding session");
        self.sessions.push(session);
        Ok(())
    }

    /// Replace a session wholesale, matched by id, keeping its position.
    pub fn replace_session(&mut self, session: StudySession) -> Result<()> {
        let slot = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session.id)
            .ok_or_else(|| Error::SessionNotFound(session.id.clone()))?;
        tracing::debug!(session_id = %session.id, "Replacing session");
        *slot = session;
        Ok(())
    }

    /// Mark a session deleted. The record stays in the collection.
    pub fn soft_delete_session(&mut self, id: &str) -> Result<&StudySession> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        if !session.deleted {
            tracing::debug!(session_id = %id, "Soft-deleting session");
            session.deleted = true;
        }
        Ok(session)
    }

    /// Add a catalog subject after checking its name.
    pub fn add_subject(&mut self, mut subject: Subject) -> Result<()> {
        subject.name = validate_subject_name(&subject.name, &self.subjects, None)?;
        if self.subjects.iter().any(|s| s.id == subject.id) {
            return Err(Error::Validation(format!(
                "subject id {:?} is already in use",
                subject.id
            )));
        }
        self.subjects.push(subject);
        Ok(())
    }
}

/// A snapshot stored as a JSON file.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and normalise the file.
    pub fn load(&self) -> Result<Snapshot> {
        let content = std::fs::read_to_string(&self.path)?;
        let snapshot = parse_wire(&content)?;
        tracing::info!(
            path = %self.path.display(),
            sessions = snapshot.sessions.len(),
            subjects = snapshot.subjects.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Read the file, or an empty snapshot if it does not exist yet.
    pub fn load_or_default(&self) -> Result<Snapshot> {
        if self.path.exists() {
            self.load()
        } else {
            tracing::info!(path = %self.path.display(), "No snapshot file, starting empty");
            Ok(Snapshot::default())
        }
    }

    /// Write the snapshot in canonical form.
    ///
    /// The file is written next to the target and renamed over it, so a
    /// failed write leaves the previous file intact.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::info!(
            path = %self.path.display(),
            sessions = snapshot.sessions.len(),
            "Saved snapshot"
        );
        Ok(())
    }
}

impl SessionSource for SnapshotFile {
    fn fetch_sessions(&self) -> Result<Vec<StudySession>> {
        Ok(self.load()?.sessions)
    }

    fn fetch_subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.load()?.subjects)
    }
}

// ============================================
// Wire normalisation
// ============================================

#[derive(Deserialize)]
struct WireDocument {
    #[serde(default)]
    sessions: Vec<WireSession>,
    #[serde(default)]
    subjects: Vec<WireSubject>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(s) => s,
            WireId::Integer(n) => n.to_string(),
            WireId::Float(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSession {
    id: WireId,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    subject: Option<WireSubjectRef>,
    #[serde(default)]
    hours: Option<f64>,
    #[serde(default)]
    study_type: Option<String>,
    #[serde(default)]
    deleted: Option<bool>,
}

#[derive(Deserialize)]
struct WireSubjectRef {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Deserialize)]
struct WireSubject {
    id: WireId,
    name: String,
    #[serde(default)]
    color: String,
}

fn parse_wire(content: &str) -> Result<Snapshot> {
    let document: WireDocument = serde_json::from_str(content)?;
    Ok(Snapshot {
        sessions: document.sessions.into_iter().map(normalize_session).collect(),
        subjects: document
            .subjects
            .into_iter()
            .map(|s| Subject {
                id: s.id.into(),
                name: s.name,
                color: s.color,
            })
            .collect(),
    })
}

fn normalize_session(wire: WireSession) -> StudySession {
    let id: String = wire.id.into();

    let subject = wire.subject.and_then(|s| {
        let name = s.name.filter(|n| !n.trim().is_empty())?;
        Some(SubjectRef {
            name,
            color: s.color.filter(|c| !c.is_empty()),
        })
    });

    let label = wire.study_type.filter(|t| !t.trim().is_empty());
    let study_type = label.as_deref().and_then(|label| {
        let parsed = StudyType::from_label(label);
        if parsed.is_none() {
            tracing::debug!(session_id = %id, label, "Unrecognised study type");
        }
        parsed
    });

    let hours = wire.hours.unwrap_or(0.0);
    let deleted = match wire.deleted {
        Some(flag) => flag,
        None => {
            let emptied = subject.is_none() && hours == 0.0 && label.is_none();
            if emptied {
                tracing::warn!(session_id = %id, "Treating emptied session as deleted");
            }
            emptied
        }
    };

    StudySession {
        date: normalize_date(wire.date.as_deref().unwrap_or_default()),
        id,
        subject,
        hours,
        study_type,
        deleted,
    }
}

/// `YYYY-MM-DD` → `DD-MM-YYYY`; anything else is passed through unchanged.
fn normalize_date(date: &str) -> String {
    let date = date.trim();
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] if year.len() == 4 && day.len() <= 2 => {
            format!("{}-{}-{}", day, month, year)
        }
        _ => date.to_string(),
    }
}
