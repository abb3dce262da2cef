//! Teacher model.
//!
//! Teachers declare preferred subjects; the scheduler assigns a subject
//! to the first teacher whose preference list matches it. A preference
//! entry may name a subject by identifier or by display name — the match
//! is case-insensitive either way, and entries that match nothing are
//! simply ignored.

use serde::{Deserialize, Serialize};

use super::Subject;

/// A teacher available for assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Owning department.
    pub department: String,
    /// Preferred subjects, by subject id or name.
    pub preferences: Vec<String>,
}

impl Teacher {
    /// Creates a new teacher.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            department: String::new(),
            preferences: Vec::new(),
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Adds a preferred subject (by id or name).
    pub fn with_preference(mut self, subject: impl Into<String>) -> Self {
        self.preferences.push(subject.into());
        self
    }

    /// Whether this teacher prefers the given subject.
    ///
    /// Matches preference entries against the subject's id or name,
    /// case-insensitively.
    pub fn prefers(&self, subject: &Subject) -> bool {
        self.preferences.iter().any(|p| {
            p.eq_ignore_ascii_case(&subject.id) || p.eq_ignore_ascii_case(&subject.name)
        })
    }
}
