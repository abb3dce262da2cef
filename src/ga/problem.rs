//! Scheduling problem definition.
//!
//! [`TimetableProblem`] bundles one semester's inputs — subjects,
//! teachers, rooms, grid layout, fitness weights — together with lookups
//! derived once up front (preferred teacher per subject, rooms by type)
//! so the hot placement loops never rescan entity lists.

use std::collections::HashMap;

use crate::config::GridConfig;
use crate::ga::fitness::FitnessWeights;
use crate::ga::individual::Timetable;
use crate::models::{Room, RoomType, Subject, SubjectType, Teacher};

/// One semester's scheduling problem.
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    /// Semester being scheduled.
    pub semester: i32,
    /// Owning department (taken from the subjects).
    pub department: String,
    /// Subjects to place.
    pub subjects: Vec<Subject>,
    /// Teachers available for assignment.
    pub teachers: Vec<Teacher>,
    /// Rooms available for assignment.
    pub rooms: Vec<Room>,
    /// Grid layout and placement limits.
    pub grid: GridConfig,
    /// Fitness penalty weights.
    pub weights: FitnessWeights,
    /// subject id → index into `teachers` of the first preferring teacher.
    preferred: HashMap<String, usize>,
    /// Indices into `rooms` of theory rooms.
    theory_rooms: Vec<usize>,
    /// Indices into `rooms` of lab rooms.
    lab_rooms: Vec<usize>,
}

impl TimetableProblem {
    /// Creates a problem from one semester's entity lists.
    ///
    /// Preference entries that match no subject are ignored here — a
    /// malformed preference degrades to "no preference", it never fails
    /// the run.
    pub fn new(
        semester: i32,
        subjects: Vec<Subject>,
        teachers: Vec<Teacher>,
        rooms: Vec<Room>,
    ) -> Self {
        let department = subjects
            .first()
            .map(|s| s.department.clone())
            .unwrap_or_default();

        let mut preferred = HashMap::new();
        for subject in &subjects {
            if let Some(idx) = teachers.iter().position(|t| t.prefers(subject)) {
                preferred.insert(subject.id.clone(), idx);
            }
        }

        let mut theory_rooms = Vec::new();
        let mut lab_rooms = Vec::new();
        for (idx, room) in rooms.iter().enumerate() {
            match room.room_type {
                RoomType::Theory => theory_rooms.push(idx),
                RoomType::Lab => lab_rooms.push(idx),
            }
        }

        Self {
            semester,
            department,
            subjects,
            teachers,
            rooms,
            grid: GridConfig::default(),
            weights: FitnessWeights::default(),
            preferred,
            theory_rooms,
            lab_rooms,
        }
    }

    /// Sets the grid configuration.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The first teacher preferring the given subject, if any.
    pub fn preferred_teacher(&self, subject: &Subject) -> Option<&Teacher> {
        self.preferred
            .get(&subject.id)
            .map(|&idx| &self.teachers[idx])
    }

    /// Room indices suitable for the subject's type.
    pub fn candidate_rooms(&self, subject: &Subject) -> &[usize] {
        match subject.subject_type {
            SubjectType::Lab => &self.lab_rooms,
            SubjectType::Theory | SubjectType::Elective => &self.theory_rooms,
        }
    }

    /// The room at an index.
    #[inline]
    pub fn room(&self, idx: usize) -> &Room {
        &self.rooms[idx]
    }

    /// The subject with the given id, if known.
    pub fn subject_by_id(&self, subject_id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == subject_id)
    }

    /// Creates an empty timetable for this problem.
    pub fn new_timetable(&self) -> Timetable {
        Timetable::new(
            self.semester,
            &self.grid,
            &self.subjects,
            &self.teachers,
            &self.rooms,
        )
    }
}
