//! Fitness evaluation.
//!
//! Splits scoring into two pure halves:
//!
//! - [`Diagnostics::scan`] counts constraint violations by scanning the
//!   grid from scratch. Trackers are never consulted — the scan is the
//!   sole source of truth about violations.
//! - [`FitnessWeights::score`] prices a `Diagnostics` into a scalar:
//!   base constant minus weighted penalties, floored at 0.
//!
//! Both halves are deterministic and side-effect-free; [`evaluate`]
//! composes them and caches the score on the individual.
//!
//! Weights are configuration, not law: defaults match the reference
//! deployment and every weight is overridable for tests or tuning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ga::individual::{Cell, Timetable};
use crate::ga::problem::TimetableProblem;

/// Violation counts for one candidate schedule.
///
/// `unscheduled_periods` counts only deficits (periods a subject still
/// needs); `period_deviation` is the absolute difference in both
/// directions and is what the fitness function prices. Forced
/// placements count toward neither — they fill cells, not requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Required periods still missing, summed over subjects.
    pub unscheduled_periods: u32,
    /// Sum of |scheduled - required| over subjects.
    pub period_deviation: u32,
    /// Empty non-break cells.
    pub empty_cells: u32,
    /// Slots where a teacher is booked more than once.
    pub teacher_conflicts: u32,
    /// Slots where a room is booked more than once.
    pub room_conflicts: u32,
    /// Adjacent same-subject periods, lab pairs excluded.
    pub back_to_back_conflicts: u32,
    /// Days hosting more than one distinct lab subject.
    pub multi_lab_days: u32,
    /// Lab periods with no same-subject lab neighbor.
    pub split_labs: u32,
    /// Teacher-days above the daily load cap.
    pub teacher_overloads: u32,
    /// Subject-days above the daily period cap.
    pub subject_distribution_issues: u32,
    /// Placements made ignoring conflicts (last-resort fill).
    pub forced_placements: u32,
    /// Placed periods with no assigned teacher.
    pub unassigned_periods: u32,
}

impl Diagnostics {
    /// Scans a timetable's grid and counts all violations.
    pub fn scan(problem: &TimetableProblem, timetable: &Timetable) -> Self {
        let mut diag = Self::default();
        let grid = &timetable.grid;
        let config = &problem.grid;

        // Per-subject totals, per-slot teacher/room booking, daily loads —
        // all recomputed from the grid, never read from trackers.
        let mut subject_total: HashMap<&str, u32> = HashMap::new();
        let mut teacher_slot: HashMap<(&str, usize, usize), u32> = HashMap::new();
        let mut room_slot: HashMap<(&str, usize, usize), u32> = HashMap::new();
        let mut teacher_day: HashMap<(&str, usize), u32> = HashMap::new();
        let mut subject_day: HashMap<(&str, usize), u32> = HashMap::new();

        for (day, row) in grid.iter().enumerate() {
            for (period, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Empty => diag.empty_cells += 1,
                    Cell::Break => {}
                    Cell::Assigned(slot) => {
                        // Forced placements are filler, not schedule: they
                        // never count toward a subject's weekly periods.
                        if slot.forced {
                            diag.forced_placements += 1;
                        } else {
                            *subject_total.entry(slot.subject_id.as_str()).or_insert(0) += 1;
                        }
                        *subject_day
                            .entry((slot.subject_id.as_str(), day))
                            .or_insert(0) += 1;
                        if let Some(teacher) = &slot.teacher_id {
                            *teacher_slot
                                .entry((teacher.as_str(), day, period))
                                .or_insert(0) += 1;
                            *teacher_day.entry((teacher.as_str(), day)).or_insert(0) += 1;
                        } else {
                            diag.unassigned_periods += 1;
                        }
                        if let Some(room) = &slot.room_id {
                            *room_slot.entry((room.as_str(), day, period)).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        for subject in &problem.subjects {
            let scheduled = subject_total.get(subject.id.as_str()).copied().unwrap_or(0);
            let required = subject.periods_per_week;
            diag.unscheduled_periods += required.saturating_sub(scheduled);
            diag.period_deviation += scheduled.abs_diff(required);
        }

        for count in teacher_slot.values() {
            diag.teacher_conflicts += count.saturating_sub(1);
        }
        for count in room_slot.values() {
            diag.room_conflicts += count.saturating_sub(1);
        }
        for count in teacher_day.values() {
            if *count > config.max_teacher_daily {
                diag.teacher_overloads += 1;
            }
        }
        for count in subject_day.values() {
            if *count > config.max_subject_daily {
                diag.subject_distribution_issues += 1;
            }
        }

        // Back-to-back and lab-shape checks need cell adjacency.
        for row in grid.iter() {
            let mut lab_subjects: Vec<&str> = Vec::new();

            for period in 0..row.len() {
                let slot = match &row[period] {
                    Cell::Assigned(slot) => slot,
                    _ => continue,
                };

                if slot.is_lab && !lab_subjects.contains(&slot.subject_id.as_str()) {
                    lab_subjects.push(slot.subject_id.as_str());
                }

                if period + 1 < row.len() {
                    if let Cell::Assigned(next) = &row[period + 1] {
                        if next.subject_id == slot.subject_id && !(slot.is_lab && next.is_lab) {
                            diag.back_to_back_conflicts += 1;
                        }
                    }
                }

                if slot.is_lab && !has_lab_neighbor(row, period, &slot.subject_id) {
                    diag.split_labs += 1;
                }
            }

            diag.multi_lab_days += (lab_subjects.len() as u32).saturating_sub(1);
        }

        diag
    }

    /// Total violation count across all categories (for logging).
    pub fn total_violations(&self) -> u32 {
        self.period_deviation
            + self.empty_cells
            + self.teacher_conflicts
            + self.room_conflicts
            + self.back_to_back_conflicts
            + self.multi_lab_days
            + self.split_labs
            + self.teacher_overloads
            + self.subject_distribution_issues
    }
}

fn has_lab_neighbor(row: &[Cell], period: usize, subject_id: &str) -> bool {
    let is_same_lab = |cell: &Cell| match cell {
        Cell::Assigned(s) => s.is_lab && s.subject_id == subject_id,
        _ => false,
    };
    (period > 0 && is_same_lab(&row[period - 1]))
        || (period + 1 < row.len() && is_same_lab(&row[period + 1]))
}

/// Penalty weights for fitness scoring.
///
/// Defaults match the reference deployment. Higher weight = worse
/// violation. All fields are public so tests can override selectively
/// via struct update syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Starting score before penalties.
    pub base: i64,
    /// Per period of deviation from `periods_per_week`.
    pub period_deviation: i64,
    /// Per empty non-break cell.
    pub empty_cell: i64,
    /// Per teacher double-booking.
    pub teacher_conflict: i64,
    /// Per room double-booking.
    pub room_conflict: i64,
    /// Per adjacent same-subject pair.
    pub back_to_back: i64,
    /// Per extra lab subject on a day and per split lab period.
    pub lab_violation: i64,
    /// Per teacher-day over the load cap.
    pub teacher_overload: i64,
    /// Per subject-day over the period cap.
    pub subject_distribution: i64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            base: 1000,
            period_deviation: 1000,
            empty_cell: 200,
            teacher_conflict: 50,
            room_conflict: 50,
            back_to_back: 40,
            lab_violation: 60,
            teacher_overload: 30,
            subject_distribution: 20,
        }
    }
}

impl FitnessWeights {
    /// Prices diagnostics into a fitness score, floored at 0.
    pub fn score(&self, diag: &Diagnostics) -> i64 {
        let penalty = self.period_deviation * i64::from(diag.period_deviation)
            + self.empty_cell * i64::from(diag.empty_cells)
            + self.teacher_conflict * i64::from(diag.teacher_conflicts)
            + self.room_conflict * i64::from(diag.room_conflicts)
            + self.back_to_back * i64::from(diag.back_to_back_conflicts)
            + self.lab_violation * i64::from(diag.multi_lab_days + diag.split_labs)
            + self.teacher_overload * i64::from(diag.teacher_overloads)
            + self.subject_distribution * i64::from(diag.subject_distribution_issues);
        (self.base - penalty).max(0)
    }
}

/// Evaluates a timetable, caching the score on the individual.
pub fn evaluate(problem: &TimetableProblem, timetable: &mut Timetable) -> i64 {
    let diag = Diagnostics::scan(problem, timetable);
    let score = problem.weights.score(&diag);
    timetable.fitness = score;
    score
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
                .with_periods_per_week(3),
            Subject::lab("CS302L").with_name("DS Lab").with_periods_per_week(2),
        ];
        let teachers = vec![
            Teacher::new("T1").with_preference("CS301"),
            Teacher::new("T2").with_preference("CS302L"),
        ];
        let rooms = vec![Room::theory("101"), Room::lab("L1")];
        TimetableProblem::new(3, subjects, teachers, rooms)
    }

    #[test]
    fn test_scan_counts_deficit_and_deviation() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        tt.place(0, 0, Slot::new("CS301", false).with_teacher("T1").with_room("101"));

        let diag = Diagnostics::scan(&problem, &tt);
        // CS301 needs 2 more, CS302L needs 2.
        assert_eq!(diag.unscheduled_periods, 4);
        assert_eq!(diag.period_deviation, 4);
    }

    #[test]
    fn test_excess_is_deviation_not_unscheduled() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        // 4 placements of a subject requiring 3.
        for (day, period) in [(0, 0), (1, 0), (2, 0), (3, 0)] {
            tt.place(day, period, Slot::new("CS301", false).with_room("101"));
        }
        let diag = Diagnostics::scan(&problem, &tt);
        assert_eq!(diag.period_deviation, 1 + 2); // CS301 excess 1, CS302L deficit 2
        assert_eq!(diag.unscheduled_periods, 2); // deficit only
    }

    #[test]
    fn test_scan_back_to_back_excludes_lab_pairs() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        let lab = Slot::new("CS302L", true).with_teacher("T2").with_room("L1");
        tt.place(0, 0, lab.clone());
        tt.place(0, 1, lab);
        tt.place(1, 0, Slot::new("CS301", false).with_teacher("T1").with_room("101"));
        tt.place(1, 1, Slot::new("CS301", false).with_teacher("T1").with_room("101"));

        let diag = Diagnostics::scan(&problem, &tt);
        assert_eq!(diag.back_to_back_conflicts, 1); // only the theory pair
        assert_eq!(diag.split_labs, 0);
    }

    #[test]
    fn test_scan_split_lab_detected() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        // Lone lab period with no partner.
        tt.place(0, 0, Slot::new("CS302L", true).with_room("L1"));
        let diag = Diagnostics::scan(&problem, &tt);
        assert_eq!(diag.split_labs, 1);
    }

    #[test]
    fn test_scan_multi_lab_day() {
        let mut problem = make_problem();
        problem.subjects.push(
            Subject::lab("CS304L").with_name("OS Lab").with_periods_per_week(2),
        );
        let mut tt = problem.new_timetable();
        let a = Slot::new("CS302L", true).with_room("L1");
        let b = Slot::new("CS304L", true).with_room("L1");
        tt.place(0, 0, a.clone());
        tt.place(0, 1, a);
        tt.place(0, 3, b.clone());
        tt.place(0, 4, b);

        let diag = Diagnostics::scan(&problem, &tt);
        assert_eq!(diag.multi_lab_days, 1);
    }

    #[test]
    fn test_scan_daily_caps() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        // 6 periods for T1 on day 0 (cap 5); CS301 4 periods (cap 3).
        for period in [0, 1, 3, 4, 6, 7] {
            tt.place(0, period, Slot::new("CS301", false).with_teacher("T1").with_room("101"));
        }
        let diag = Diagnostics::scan(&problem, &tt);
        assert_eq!(diag.teacher_overloads, 1);
        assert_eq!(diag.subject_distribution_issues, 1);
    }

    #[test]
    fn test_scan_counts_forced_and_unassigned() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        tt.place(0, 0, Slot::new("CS301", false).with_room("101").forced());
        tt.place(0, 3, Slot::new("CS301", false).with_room("101"));

        let diag = Diagnostics::scan(&problem, &tt);
        assert_eq!(diag.forced_placements, 1);
        assert_eq!(diag.unassigned_periods, 2);
        // The forced cell does not count toward CS301's 3 periods.
        assert_eq!(diag.unscheduled_periods, 2 + 2);
    }

    #[test]
    fn test_score_floor_zero() {
        let weights = FitnessWeights::default();
        let diag = Diagnostics {
            period_deviation: 100,
            ..Default::default()
        };
        assert_eq!(weights.score(&diag), 0);
    }

    #[test]
    fn test_score_monotonic_in_each_penalty() {
        let weights = FitnessWeights {
            base: 1_000_000,
            ..Default::default()
        };
        let baseline = Diagnostics {
            period_deviation: 1,
            empty_cells: 1,
            teacher_conflicts: 1,
            room_conflicts: 1,
            back_to_back_conflicts: 1,
            multi_lab_days: 1,
            split_labs: 1,
            teacher_overloads: 1,
            subject_distribution_issues: 1,
            ..Default::default()
        };
        let base_score = weights.score(&baseline);

        let bumps: Vec<Diagnostics> = vec![
            Diagnostics { period_deviation: 2, ..baseline.clone() },
            Diagnostics { empty_cells: 2, ..baseline.clone() },
            Diagnostics { teacher_conflicts: 2, ..baseline.clone() },
            Diagnostics { room_conflicts: 2, ..baseline.clone() },
            Diagnostics { back_to_back_conflicts: 2, ..baseline.clone() },
            Diagnostics { multi_lab_days: 2, ..baseline.clone() },
            Diagnostics { split_labs: 2, ..baseline.clone() },
            Diagnostics { teacher_overloads: 2, ..baseline.clone() },
            Diagnostics { subject_distribution_issues: 2, ..baseline.clone() },
        ];
        for bumped in bumps {
            assert!(
                weights.score(&bumped) < base_score,
                "increasing {bumped:?} did not decrease the score"
            );
        }
    }

    #[test]
    fn test_weight_override() {
        let weights = FitnessWeights {
            empty_cell: 0,
            ..Default::default()
        };
        let diag = Diagnostics {
            empty_cells: 40,
            ..Default::default()
        };
        assert_eq!(weights.score(&diag), weights.base);
    }

    #[test]
    fn test_evaluate_caches_score() {
        let problem = make_problem();
        let mut tt = problem.new_timetable();
        let score = evaluate(&problem, &mut tt);
        assert_eq!(tt.fitness, score);
        // Deterministic: evaluating again gives the same score.
        assert_eq!(evaluate(&problem, &mut tt), score);
    }
}
