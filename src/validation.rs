//! Input validation for timetable problems.
//!
//! Checks structural integrity of subjects, teachers, and rooms before
//! a run. Detects:
//! - Duplicate IDs
//! - Subjects requiring zero periods
//! - Subjects requiring more periods than the week holds
//! - Teacher preferences that match no subject
//! - Grid configurations with break indices out of range
//!
//! Validation is advisory by design: the scheduler itself degrades
//! gracefully (unplaceable subjects become forced filler), so callers
//! decide whether an `Err` aborts the run or just gets logged.

use std::collections::HashSet;

use crate::config::GridConfig;
use crate::models::{Room, Subject, Teacher};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A subject's weekly period requirement is unsatisfiable.
    InvalidPeriodsPerWeek,
    /// A teacher preference matches no subject.
    UnknownPreference,
    /// A break period index lies outside the grid.
    InvalidBreakPeriod,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetable problem.
///
/// Checks:
/// 1. No duplicate subject IDs
/// 2. No duplicate teacher IDs
/// 3. No duplicate room numbers
/// 4. Every subject requires between 1 and the week's teaching capacity
/// 5. Every teacher preference matches some subject (by id or name)
/// 6. Every break index fits inside the grid
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    subjects: &[Subject],
    teachers: &[Teacher],
    rooms: &[Room],
    grid: &GridConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut subject_ids = HashSet::new();
    for s in subjects {
        if !subject_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate subject ID: {}", s.id),
            ));
        }
    }

    let mut teacher_ids = HashSet::new();
    for t in teachers {
        if !teacher_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate teacher ID: {}", t.id),
            ));
        }
    }

    let mut room_nos = HashSet::new();
    for r in rooms {
        if !room_nos.insert(r.room_no.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room number: {}", r.room_no),
            ));
        }
    }

    let capacity = (grid.days * grid.teaching_periods_per_day()) as u32;
    for s in subjects {
        if s.periods_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPeriodsPerWeek,
                format!("Subject '{}' requires zero periods per week", s.id),
            ));
        } else if s.periods_per_week > capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPeriodsPerWeek,
                format!(
                    "Subject '{}' requires {} periods but the week only has {}",
                    s.id, s.periods_per_week, capacity
                ),
            ));
        }
    }

    for t in teachers {
        for pref in &t.preferences {
            let matches_some = subjects.iter().any(|s| {
                s.id.eq_ignore_ascii_case(pref) || s.name.eq_ignore_ascii_case(pref)
            });
            if !matches_some {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPreference,
                    format!("Teacher '{}' prefers unknown subject '{}'", t.id, pref),
                ));
            }
        }
    }

    for &period in &grid.break_periods {
        if period >= grid.periods {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidBreakPeriod,
                format!(
                    "Break period {} lies outside the {}-period day",
                    period, grid.periods
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
