//! Presentation-ready solution output.
//!
//! The GA works on [`Timetable`] grids that carry ids only. A
//! [`TimetableSolution`] is the display form handed to callers: names
//! resolved, break cells explicit, plus a flat assignment list that is
//! easy to filter per teacher or serialize as JSON.
//!
//! Display text is derived from the structured fields, never the other
//! way around — a missing teacher renders as [`UNASSIGNED_TEACHER`] but
//! stays `None` in the data.

use serde::{Deserialize, Serialize};

use crate::ga::driver::RunOutcome;
use crate::ga::fitness::Diagnostics;
use crate::ga::individual::{Cell, Timetable};
use crate::ga::problem::TimetableProblem;

/// Display name for a class no teacher could be assigned to.
pub const UNASSIGNED_TEACHER: &str = "Not Assigned";

/// One scheduled class, names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Subject id.
    pub subject_id: String,
    /// Subject display name (falls back to the id).
    pub subject_name: String,
    /// Whether this period is half of a lab block.
    pub is_lab: bool,
    /// Assigned teacher id, if any.
    pub teacher_id: Option<String>,
    /// Teacher display name, [`UNASSIGNED_TEACHER`] when none.
    pub teacher_name: String,
    /// Assigned room number, if any.
    pub room_no: Option<String>,
    /// Whether this placement ignored conflicts.
    pub forced: bool,
}

/// One output grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputCell {
    /// Reserved break period.
    Break,
    /// A scheduled class.
    Class(ClassEntry),
}

/// One scheduled class with its grid position, for flat listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedClass {
    /// Day index (0-based).
    pub day: usize,
    /// Period index (0-based).
    pub period: usize,
    /// The class details.
    #[serde(flatten)]
    pub entry: ClassEntry,
}

/// A finished run's result for one semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableSolution {
    /// Semester this timetable covers.
    pub semester: i32,
    /// Owning department.
    pub department: String,
    /// days × periods display grid. `None` marks a cell the run left
    /// empty, which a finished run never produces.
    pub grid: Vec<Vec<Option<OutputCell>>>,
    /// All scheduled classes as a flat list.
    pub assignments: Vec<PlacedClass>,
    /// Fitness of the winning individual.
    pub fitness: i64,
    /// Generations actually run.
    pub generations: u32,
    /// Why the run stopped.
    pub outcome: RunOutcome,
    /// Violation counts scanned from the winning grid.
    pub diagnostics: Diagnostics,
}

impl TimetableSolution {
    /// Resolves a winning individual into display form.
    pub fn build(
        problem: &TimetableProblem,
        timetable: &Timetable,
        generations: u32,
        outcome: RunOutcome,
        diagnostics: Diagnostics,
    ) -> Self {
        let mut assignments = Vec::new();
        let grid = timetable
            .grid
            .iter()
            .enumerate()
            .map(|(day, row)| {
                row.iter()
                    .enumerate()
                    .map(|(period, cell)| match cell {
                        Cell::Empty => None,
                        Cell::Break => Some(OutputCell::Break),
                        Cell::Assigned(slot) => {
                            let entry = resolve(problem, slot);
                            assignments.push(PlacedClass {
                                day,
                                period,
                                entry: entry.clone(),
                            });
                            Some(OutputCell::Class(entry))
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            semester: timetable.semester,
            department: problem.department.clone(),
            grid,
            assignments,
            fitness: timetable.fitness,
            generations,
            outcome,
            diagnostics,
        }
    }

    /// All classes assigned to the given teacher, in grid order.
    pub fn assignments_for_teacher(&self, teacher_id: &str) -> Vec<&PlacedClass> {
        self.assignments
            .iter()
            .filter(|p| p.entry.teacher_id.as_deref() == Some(teacher_id))
            .collect()
    }
}

fn resolve(problem: &TimetableProblem, slot: &crate::ga::individual::Slot) -> ClassEntry {
    let subject_name = problem
        .subject_by_id(&slot.subject_id)
        .map(|s| s.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| slot.subject_id.clone());
    let teacher_name = slot
        .teacher_id
        .as_deref()
        .and_then(|id| problem.teachers.iter().find(|t| t.id == id))
        .map(|t| t.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNASSIGNED_TEACHER.to_string());

    ClassEntry {
        subject_id: slot.subject_id.clone(),
        subject_name,
        is_lab: slot.is_lab,
        teacher_id: slot.teacher_id.clone(),
        teacher_name,
        room_no: slot.room_id.clone(),
        forced: slot.forced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::individual::Slot;
    use crate::models::{Room, Subject, Teacher};

    fn make_problem() -> TimetableProblem {
        let subjects = vec![
            Subject::theory("CS301")
                .with_name("Data Structures")
                .with_department("CSE")
                .with_periods_per_week(2),
        ];
        let teachers = vec![Teacher::new("T1").with_name("Dr. Rao").with_preference("CS301")];
        let rooms = vec![Room::theory("101")];
        TimetableProblem::new(3, subjects, teachers, rooms)
    }

    #[test]
    fn test_build_resolves_names() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        tt.place(0, 0, Slot::new("CS301", false).with_teacher("T1").with_room("101"));
        tt.place(1, 3, Slot::new("CS301", false).forced());
        tt.fitness = 900;

        let solution = TimetableSolution::build(
            &problem,
            &tt,
            12,
            RunOutcome::Converged,
            Diagnostics::default(),
        );

        assert_eq!(solution.semester, 3);
        assert_eq!(solution.department, "CSE");
        assert_eq!(solution.fitness, 900);
        assert_eq!(solution.assignments.len(), 2);

        let first = &solution.assignments[0];
        assert_eq!(first.day, 0);
        assert_eq!(first.period, 0);
        assert_eq!(first.entry.subject_name, "Data Structures");
        assert_eq!(first.entry.teacher_name, "Dr. Rao");
        assert_eq!(first.entry.room_no.as_deref(), Some("101"));
        assert!(!first.entry.forced);

        let second = &solution.assignments[1];
        assert_eq!(second.entry.teacher_name, UNASSIGNED_TEACHER);
        assert!(second.entry.teacher_id.is_none());
        assert!(second.entry.forced);
    }

    #[test]
    fn test_grid_marks_breaks() {
        let problem = make_problem();
        let tt = problem.new_timetable();
        let solution = TimetableSolution::build(
            &problem,
            &tt,
            0,
            RunOutcome::GenerationLimit,
            Diagnostics::default(),
        );
        for row in &solution.grid {
            for &period in &problem.grid.break_periods {
                assert_eq!(row[period], Some(OutputCell::Break));
            }
        }
    }

    #[test]
    fn test_assignments_for_teacher_filters() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        tt.place(0, 0, Slot::new("CS301", false).with_teacher("T1").with_room("101"));
        tt.place(0, 1, Slot::new("CS301", false).forced());

        let solution = TimetableSolution::build(
            &problem,
            &tt,
            1,
            RunOutcome::Converged,
            Diagnostics::default(),
        );
        let mine = solution.assignments_for_teacher("T1");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].period, 0);
        assert!(solution.assignments_for_teacher("T9").is_empty());
    }

    #[test]
    fn test_solution_serializes() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        tt.place(0, 0, Slot::new("CS301", false).with_teacher("T1").with_room("101"));

        let solution = TimetableSolution::build(
            &problem,
            &tt,
            5,
            RunOutcome::Converged,
            Diagnostics::default(),
        );
        let json = serde_json::to_string(&solution).unwrap();
        assert!(json.contains("\"Data Structures\""));

        let back: TimetableSolution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, solution);
    }
}
