//! Entry-time validation for new and edited records.
//!
//! These checks apply when a user submits a form. The analytics layer never
//! runs them: stored data is screened leniently at read time instead.

use crate::date_key::DateKey;
use crate::error::{Error, Result};
use crate::types::{StudySession, StudyType, Subject, SubjectRef};

/// Longest session accepted at entry.
pub const MAX_SESSION_HOURS: f64 = 24.0;

/// A session as typed into the form, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDraft {
    /// `DD-MM-YYYY`
    pub date: String,
    /// Catalog subject name, matched case-insensitively
    pub subject: Option<String>,
    pub hours: f64,
    pub study_type: StudyType,
}

impl SessionDraft {
    /// Validate the draft and turn it into a session.
    ///
    /// The date must parse and not be after `today`, hours must lie in
    /// (0, 24], and a named subject must exist in `subjects`; its current
    /// name and color are copied onto the session. A fresh UUID is assigned
    /// when `id` is None.
    pub fn into_session(
        self,
        subjects: &[Subject],
        today: DateKey,
        id: Option<String>,
    ) -> Result<StudySession> {
        let date = DateKey::parse(self.date.trim())?;
        if date > today {
            return Err(Error::Validation(format!(
                "date {} is in the future (today is {})",
                date, today
            )));
        }

        if !self.hours.is_finite() || self.hours <= 0.0 || self.hours > MAX_SESSION_HOURS {
            return Err(Error::Validation(format!(
                "hours must be greater than 0 and at most {}, got {}",
                MAX_SESSION_HOURS, self.hours
            )));
        }

        let subject = match self.subject.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => {
                let found = subjects
                    .iter()
                    .find(|s| same_name(&s.name, name))
                    .ok_or_else(|| Error::Validation(format!("unknown subject {:?}", name)))?;
                Some(SubjectRef::from(found))
            }
        };

        Ok(StudySession {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            date: date.to_string(),
            subject,
            hours: self.hours,
            study_type: Some(self.study_type),
            deleted: false,
        })
    }
}

/// Check a subject name for creation or rename.
///
/// Returns the trimmed name. Names must be non-empty and unique among the
/// other subjects, ignoring case. `editing_id` is the subject being renamed,
/// which may keep its own name.
pub fn validate_subject_name(
    name: &str,
    existing: &[Subject],
    editing_id: Option<&str>,
) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("subject name must not be empty".to_string()));
    }

    let taken = existing
        .iter()
        .filter(|s| Some(s.id.as_str()) != editing_id)
        .any(|s| same_name(&s.name, name));
    if taken {
        return Err(Error::DuplicateSubject(name.to_string()));
    }

    Ok(name.to_string())
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Subject> {
        vec![
            Subject {
                id: "1".to_string(),
                name: "Math".to_string(),
                color: "#f00".to_string(),
            },
            Subject {
                id: "2".to_string(),
                name: "Física".to_string(),
                color: "#0f0".to_string(),
            },
        ]
    }

    fn draft(date: &str, hours: f64) -> SessionDraft {
        SessionDraft {
            date: date.to_string(),
            subject: Some("math".to_string()),
            hours,
            study_type: StudyType::Theoretical,
        }
    }

    fn today() -> DateKey {
        DateKey::parse("14-10-2026").unwrap()
    }

    #[test]
    fn test_valid_draft_snapshots_subject() {
        let session = draft("14-10-2026", 1.5)
            .into_session(&catalog(), today(), Some("s1".to_string()))
            .unwrap();
        assert_eq!(session.id, "s1");
        assert_eq!(session.date, "14-10-2026");
        let subject = session.subject.unwrap();
        assert_eq!(subject.name, "Math");
        assert_eq!(subject.color.as_deref(), Some("#f00"));
        assert!(!session.deleted);
    }

    #[test]
    fn test_generated_id() {
        let a = draft("01-10-2026", 1.0)
            .into_session(&catalog(), today(), None)
            .unwrap();
        let b = draft("01-10-2026", 1.0)
            .into_session(&catalog(), today(), None)
            .unwrap();
        assert_eq!(a.id.len(), 36);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_rejections() {
        let subjects = catalog();
        assert!(matches!(
            draft("15-10-2026", 1.0).into_session(&subjects, today(), None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            draft("31-02-2026", 1.0).into_session(&subjects, today(), None),
            Err(Error::MalformedDate { .. })
        ));
        for hours in [0.0, -1.0, 24.5, f64::NAN] {
            assert!(draft("01-10-2026", hours)
                .into_session(&subjects, today(), None)
                .is_err());
        }
        assert!(draft("01-10-2026", 24.0)
            .into_session(&subjects, today(), None)
            .is_ok());

        let mut unknown = draft("01-10-2026", 1.0);
        unknown.subject = Some("Chemistry".to_string());
        assert!(unknown.into_session(&subjects, today(), None).is_err());

        let mut none = draft("01-10-2026", 1.0);
        none.subject = None;
        assert!(none
            .into_session(&subjects, today(), None)
            .unwrap()
            .subject
            .is_none());
    }

    #[test]
    fn test_validate_subject_name() {
        let subjects = catalog();
        assert_eq!(
            validate_subject_name("  History ", &subjects, None).unwrap(),
            "History"
        );
        assert!(matches!(
            validate_subject_name("MATH", &subjects, None),
            Err(Error::DuplicateSubject(_))
        ));
        assert!(matches!(
            validate_subject_name("física", &subjects, None),
            Err(Error::DuplicateSubject(_))
        ));
        assert!(validate_subject_name("   ", &subjects, None).is_err());
        // Renaming a subject to a different casing of its own name is fine
        assert!(validate_subject_name("math", &subjects, Some("1")).is_ok());
        assert!(validate_subject_name("math", &subjects, Some("2")).is_err());
    }
}
