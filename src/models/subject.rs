//! Subject model.
//!
//! A subject is one course offered in a department semester. Its
//! `periods_per_week` drives the scheduler: the constructive heuristic
//! tries to place exactly that many periods, and the fitness function
//! penalizes any deficit or excess.

use serde::{Deserialize, Serialize};

/// A subject to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Human-readable name (e.g., "Data Structures").
    pub name: String,
    /// Subject classification.
    pub subject_type: SubjectType,
    /// Semester this subject belongs to (1-based).
    pub semester: i32,
    /// Owning department.
    pub department: String,
    /// Required number of teaching periods per week.
    pub periods_per_week: u32,
}

/// Subject type classification.
///
/// Determines room requirements and placement rules: labs occupy two
/// consecutive periods in a lab room, theory and electives occupy single
/// periods in a theory room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectType {
    /// Lecture-style subject, single periods in a theory room.
    Theory,
    /// Practical subject, 2-period consecutive blocks in a lab room.
    Lab,
    /// Elective subject, scheduled like theory.
    Elective,
}

impl Subject {
    /// Creates a new subject.
    pub fn new(id: impl Into<String>, subject_type: SubjectType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            subject_type,
            semester: 1,
            department: String::new(),
            periods_per_week: 1,
        }
    }

    /// Creates a theory subject.
    pub fn theory(id: impl Into<String>) -> Self {
        Self::new(id, SubjectType::Theory)
    }

    /// Creates a lab subject.
    pub fn lab(id: impl Into<String>) -> Self {
        Self::new(id, SubjectType::Lab)
    }

    /// Creates an elective subject.
    pub fn elective(id: impl Into<String>) -> Self {
        Self::new(id, SubjectType::Elective)
    }

    /// Sets the subject name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: i32) -> Self {
        self.semester = semester;
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the required periods per week.
    pub fn with_periods_per_week(mut self, periods: u32) -> Self {
        self.periods_per_week = periods;
        self
    }

    /// Whether this subject requires lab placement (2-period blocks).
    #[inline]
    pub fn is_lab(&self) -> bool {
        self.subject_type == SubjectType::Lab
    }
}
