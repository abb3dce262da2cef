//! Constructive heuristic.
//!
//! Builds one complete candidate timetable from scratch in four ordered
//! phases, each with bounded random retries so infeasible inputs can
//! never loop forever:
//!
//! 1. Labs with a preferred teacher — 2-period consecutive blocks.
//! 2. Theory/elective subjects with a preferred teacher.
//! 3. Subjects with no matching teacher — room-only placement.
//! 4. Fill pass — deficit-prioritized placement, then a sweep that
//!    force-places into any cell still empty.
//!
//! Feasibility is not guaranteed; completeness is. Exhausting a retry
//! budget is not an error, it just drops to the next fallback tier, and
//! every residual violation is priced by the fitness function.
//!
//! Forced placements carry no teacher, are tagged [`Slot::forced`], and
//! do not count toward a subject's scheduled periods in diagnostics —
//! they exist only to keep the grid gap-free.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::ga::individual::{Slot, Timetable};
use crate::ga::problem::TimetableProblem;
use crate::models::{Subject, Teacher};

/// Builds one complete candidate for the problem's semester.
pub fn build_random<R: Rng>(problem: &TimetableProblem, rng: &mut R) -> Timetable {
    let mut tt = problem.new_timetable();
    if problem.grid.days == 0 || problem.grid.periods == 0 {
        return tt;
    }
    schedule_labs(problem, &mut tt, rng);
    schedule_theories(problem, &mut tt, rng);
    schedule_orphans(problem, &mut tt, rng);
    schedule_deficits(problem, &mut tt, rng);
    refill_empty_cells(problem, &mut tt, rng);
    tt
}

/// Phase 1: lab subjects with a preferred teacher.
fn schedule_labs<R: Rng>(problem: &TimetableProblem, tt: &mut Timetable, rng: &mut R) {
    let config = &problem.grid;
    if config.periods < 2 {
        return; // no room for a 2-period block
    }
    for subject in problem.subjects.iter().filter(|s| s.is_lab()) {
        let teacher = match problem.preferred_teacher(subject) {
            Some(t) => t,
            None => continue,
        };
        if problem.candidate_rooms(subject).is_empty() {
            continue;
        }

        let mut scheduled = 0;
        let mut attempts = 0;
        while scheduled < subject.periods_per_week && attempts < config.lab_attempts {
            attempts += 1;
            let day = rng.random_range(0..config.days);
            let period = rng.random_range(0..config.periods.saturating_sub(1));
            if try_place_lab(problem, tt, rng, subject, Some(teacher), day, period) {
                scheduled += 2;
            }
        }
    }
}

/// Phase 2: theory and elective subjects with a preferred teacher.
fn schedule_theories<R: Rng>(problem: &TimetableProblem, tt: &mut Timetable, rng: &mut R) {
    let config = &problem.grid;
    for subject in problem.subjects.iter().filter(|s| !s.is_lab()) {
        let teacher = match problem.preferred_teacher(subject) {
            Some(t) => t,
            None => continue,
        };
        if problem.candidate_rooms(subject).is_empty() {
            continue;
        }

        let mut scheduled = 0;
        let mut attempts = 0;
        while scheduled < subject.periods_per_week && attempts < config.theory_attempts {
            attempts += 1;
            let day = rng.random_range(0..config.days);
            let period = rng.random_range(0..config.periods);
            if try_place_theory(problem, tt, rng, subject, Some(teacher), day, period) {
                scheduled += 1;
            }
        }
    }
}

/// Phase 3: subjects with no matching teacher, room-only placement.
fn schedule_orphans<R: Rng>(problem: &TimetableProblem, tt: &mut Timetable, rng: &mut R) {
    let config = &problem.grid;
    for subject in &problem.subjects {
        if problem.preferred_teacher(subject).is_some() {
            continue;
        }
        if problem.candidate_rooms(subject).is_empty() {
            continue;
        }

        let mut scheduled = 0;
        let mut attempts = 0;
        while scheduled < subject.periods_per_week && attempts < config.fill_attempts {
            attempts += 1;
            let day = rng.random_range(0..config.days);
            let period = rng.random_range(0..config.periods);
            if subject.is_lab() {
                if try_place_lab(problem, tt, rng, subject, None, day, period) {
                    scheduled += 2;
                }
            } else if try_place_theory(problem, tt, rng, subject, None, day, period) {
                scheduled += 1;
            }
        }
    }
}

/// Fill pass, first half: random retries for subjects still short of
/// their weekly requirement, largest deficit first.
fn schedule_deficits<R: Rng>(problem: &TimetableProblem, tt: &mut Timetable, rng: &mut R) {
    let config = &problem.grid;
    let mut order: Vec<&Subject> = problem.subjects.iter().collect();
    order.sort_by_key(|s| {
        std::cmp::Reverse(s.periods_per_week.saturating_sub(tt.trackers.subject_count(&s.id)))
    });

    for subject in order {
        let teacher = problem.preferred_teacher(subject);
        let mut attempts = 0;
        while tt.trackers.subject_count(&subject.id) < subject.periods_per_week
            && attempts < config.fill_attempts
        {
            attempts += 1;
            let day = rng.random_range(0..config.days);
            let period = rng.random_range(0..config.periods);
            if subject.is_lab() {
                if !try_place_lab(problem, tt, rng, subject, teacher, day, period) {
                    try_place_lab(problem, tt, rng, subject, None, day, period);
                }
            } else if !try_place_theory(problem, tt, rng, subject, teacher, day, period) {
                try_place_theory(problem, tt, rng, subject, None, day, period);
            }
        }
    }
}

/// Fill pass, second half: sweep every empty cell and place something,
/// force-placing as a last resort so no non-break cell stays empty.
///
/// Also used after mutation to restore completeness.
pub fn refill_empty_cells<R: Rng>(problem: &TimetableProblem, tt: &mut Timetable, rng: &mut R) {
    let config = &problem.grid;
    for day in 0..config.days {
        for period in 0..config.periods {
            if !tt.slot_open(day, period) {
                continue;
            }

            // Subjects still owed periods, largest deficit first.
            let mut incomplete: Vec<&Subject> = problem
                .subjects
                .iter()
                .filter(|s| tt.trackers.subject_count(&s.id) < s.periods_per_week)
                .collect();
            incomplete.sort_by_key(|s| {
                std::cmp::Reverse(
                    s.periods_per_week.saturating_sub(tt.trackers.subject_count(&s.id)),
                )
            });

            let placed = incomplete
                .iter()
                .any(|subject| fill_slot_with_subject(problem, tt, rng, day, period, subject));

            if !placed {
                if let Some(subject) = problem.subjects.choose(rng) {
                    force_place(problem, tt, rng, day, period, subject);
                }
            }
        }
    }
}

/// Tries to place a subject at a fixed cell: preferred-teacher tier
/// first, then room-only. Returns `false` if neither tier fits.
pub fn fill_slot_with_subject<R: Rng>(
    problem: &TimetableProblem,
    tt: &mut Timetable,
    rng: &mut R,
    day: usize,
    period: usize,
    subject: &Subject,
) -> bool {
    let teacher = problem.preferred_teacher(subject);
    if subject.is_lab() {
        try_place_lab(problem, tt, rng, subject, teacher, day, period)
            || try_place_lab(problem, tt, rng, subject, None, day, period)
    } else {
        try_place_theory(problem, tt, rng, subject, teacher, day, period)
            || try_place_theory(problem, tt, rng, subject, None, day, period)
    }
}

/// Places a subject anywhere on the grid with bounded random retries:
/// preferred-teacher tier first, then room-only. Used by mutation.
pub fn place_subject_randomly<R: Rng>(
    problem: &TimetableProblem,
    tt: &mut Timetable,
    rng: &mut R,
    subject: &Subject,
    attempts: u32,
) -> bool {
    let config = &problem.grid;
    let teacher = problem.preferred_teacher(subject);

    if teacher.is_some() {
        for _ in 0..attempts {
            let day = rng.random_range(0..config.days);
            let period = rng.random_range(0..config.periods);
            let ok = if subject.is_lab() {
                try_place_lab(problem, tt, rng, subject, teacher, day, period)
            } else {
                try_place_theory(problem, tt, rng, subject, teacher, day, period)
            };
            if ok {
                return true;
            }
        }
    }

    for _ in 0..attempts {
        let day = rng.random_range(0..config.days);
        let period = rng.random_range(0..config.periods);
        let ok = if subject.is_lab() {
            try_place_lab(problem, tt, rng, subject, None, day, period)
        } else {
            try_place_theory(problem, tt, rng, subject, None, day, period)
        };
        if ok {
            return true;
        }
    }

    false
}

/// Attempts a 2-period lab block at (day, period) and (day, period + 1).
///
/// Enforces the conservative lab rule: a day hosts at most one lab
/// block, regardless of subject.
fn try_place_lab<R: Rng>(
    problem: &TimetableProblem,
    tt: &mut Timetable,
    rng: &mut R,
    subject: &Subject,
    teacher: Option<&Teacher>,
    day: usize,
    period: usize,
) -> bool {
    let config = &problem.grid;
    if !config.lab_block_fits(period)
        || !tt.slot_open(day, period)
        || !tt.slot_open(day, period + 1)
        || tt.has_lab_on_day(day)
    {
        return false;
    }
    let room = match problem.candidate_rooms(subject).choose(rng) {
        Some(&idx) => problem.room(idx),
        None => return false,
    };

    match teacher {
        Some(teacher) => {
            if !tt.is_free(&teacher.id, &room.room_no, day, period)
                || !tt.is_free(&teacher.id, &room.room_no, day, period + 1)
                || tt.trackers.teacher_load(&teacher.id, day) + 2 > config.max_teacher_daily
            {
                return false;
            }
            let slot = Slot::new(&subject.id, true)
                .with_teacher(&teacher.id)
                .with_room(&room.room_no);
            tt.place(day, period, slot.clone());
            tt.place(day, period + 1, slot);
        }
        None => {
            if tt.trackers.room_is_busy(&room.room_no, day, period)
                || tt.trackers.room_is_busy(&room.room_no, day, period + 1)
            {
                return false;
            }
            let slot = Slot::new(&subject.id, true).with_room(&room.room_no);
            tt.place(day, period, slot.clone());
            tt.place(day, period + 1, slot);
        }
    }
    true
}

/// Attempts a single theory/elective period at (day, period).
fn try_place_theory<R: Rng>(
    problem: &TimetableProblem,
    tt: &mut Timetable,
    rng: &mut R,
    subject: &Subject,
    teacher: Option<&Teacher>,
    day: usize,
    period: usize,
) -> bool {
    let config = &problem.grid;
    if !tt.slot_open(day, period)
        || tt.trackers.subject_load(&subject.id, day) >= config.max_subject_daily
        || tt.has_adjacent_subject(day, period, &subject.id)
    {
        return false;
    }
    let room = match problem.candidate_rooms(subject).choose(rng) {
        Some(&idx) => problem.room(idx),
        None => return false,
    };

    match teacher {
        Some(teacher) => {
            if !tt.is_free(&teacher.id, &room.room_no, day, period)
                || tt.trackers.teacher_load(&teacher.id, day) >= config.max_teacher_daily
            {
                return false;
            }
            tt.place(
                day,
                period,
                Slot::new(&subject.id, false)
                    .with_teacher(&teacher.id)
                    .with_room(&room.room_no),
            );
        }
        None => {
            if tt.trackers.room_is_busy(&room.room_no, day, period) {
                return false;
            }
            tt.place(day, period, Slot::new(&subject.id, false).with_room(&room.room_no));
        }
    }
    true
}

/// Last-resort placement: ignores occupancy entirely, carries no
/// teacher, and is tagged forced. Uses a type-matching room when one
/// exists, any room otherwise, no room at all if none exist.
fn force_place<R: Rng>(
    problem: &TimetableProblem,
    tt: &mut Timetable,
    rng: &mut R,
    day: usize,
    period: usize,
    subject: &Subject,
) {
    let room_no = problem
        .candidate_rooms(subject)
        .choose(rng)
        .map(|&idx| problem.room(idx).room_no.clone())
        .or_else(|| problem.rooms.choose(rng).map(|r| r.room_no.clone()));

    let mut slot = Slot::new(&subject.id, subject.is_lab()).forced();
    if let Some(room_no) = room_no {
        slot = slot.with_room(room_no);
    }
    tt.place(day, period, slot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::individual::{Cell, Trackers};
    use crate::models::Room;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn full_problem() -> TimetableProblem {
        let subjects = vec![
            Subject::theory("CS301").with_name("Data Structures").with_periods_per_week(4),
            Subject::theory("CS302").with_name("Operating Systems").with_periods_per_week(4),
            Subject::lab("CS303L").with_name("DS Lab").with_periods_per_week(2),
            Subject::elective("CS3E1").with_name("Elective I").with_periods_per_week(3),
            Subject::theory("CS304").with_name("Networks").with_periods_per_week(3),
        ];
        let teachers = vec![
            Teacher::new("T1").with_name("Dr. Rao").with_preference("CS301"),
            Teacher::new("T2").with_name("Dr. Iyer").with_preference("CS302").with_preference("CS303L"),
            Teacher::new("T3").with_name("Dr. Das").with_preference("Elective I"),
        ];
        let rooms = vec![Room::theory("101"), Room::theory("102"), Room::lab("L1")];
        TimetableProblem::new(3, subjects, teachers, rooms)
    }

    #[test]
    fn test_build_leaves_no_empty_cells() {
        let problem = full_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let tt = build_random(&problem, &mut rng);
        assert_eq!(tt.empty_cells(), 0);
    }

    #[test]
    fn test_build_preserves_break_cells() {
        let problem = full_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let tt = build_random(&problem, &mut rng);
        for day in 0..problem.grid.days {
            for &period in &problem.grid.break_periods {
                assert_eq!(*tt.cell(day, period), Cell::Break);
            }
        }
    }

    #[test]
    fn test_build_trackers_consistent() {
        let problem = full_problem();
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let tt = build_random(&problem, &mut rng);
            let rebuilt = Trackers::from_grid(
                &problem.grid,
                &problem.subjects,
                &problem.teachers,
                &problem.rooms,
                &tt.grid,
            );
            assert_eq!(tt.trackers, rebuilt, "tracker drift with seed {seed}");
        }
    }

    #[test]
    fn test_lab_blocks_are_consecutive_pairs() {
        let problem = full_problem();
        let mut rng = SmallRng::seed_from_u64(7);
        let tt = build_random(&problem, &mut rng);

        for row in &tt.grid {
            for (period, cell) in row.iter().enumerate() {
                if let Cell::Assigned(slot) = cell {
                    if slot.is_lab && !slot.forced {
                        let prev = period.checked_sub(1).map(|p| &row[p]);
                        let next = row.get(period + 1);
                        let paired = |c: Option<&Cell>| {
                            matches!(c, Some(Cell::Assigned(s))
                                if s.is_lab && s.subject_id == slot.subject_id)
                        };
                        assert!(
                            paired(prev) || paired(next),
                            "lab period {period} has no partner"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_at_most_one_lab_block_per_day() {
        let problem = full_problem();
        let mut rng = SmallRng::seed_from_u64(11);
        let tt = build_random(&problem, &mut rng);

        for row in &tt.grid {
            let lab_periods = row
                .iter()
                .filter(|c| matches!(c, Cell::Assigned(s) if s.is_lab && !s.forced))
                .count();
            assert!(lab_periods <= 2, "day hosts more than one lab block");
        }
    }

    #[test]
    fn test_no_theory_rooms_degrades_gracefully() {
        // Only a lab room exists; theory subjects cannot be placed
        // properly and must fall back to forced placements.
        let subjects = vec![Subject::theory("CS301")
            .with_name("Data Structures")
            .with_periods_per_week(3)];
        let teachers = vec![Teacher::new("T1").with_preference("CS301")];
        let rooms = vec![Room::lab("L1")];
        let problem = TimetableProblem::new(3, subjects, teachers, rooms);

        let mut rng = SmallRng::seed_from_u64(3);
        let tt = build_random(&problem, &mut rng);
        assert_eq!(tt.empty_cells(), 0);

        for row in &tt.grid {
            for cell in row {
                if let Cell::Assigned(slot) = cell {
                    assert!(slot.forced);
                    assert!(slot.teacher_id.is_none());
                }
            }
        }
    }

    #[test]
    fn test_no_rooms_at_all_still_completes() {
        let subjects = vec![Subject::theory("CS301").with_periods_per_week(3)];
        let problem = TimetableProblem::new(3, subjects, vec![], vec![]);

        let mut rng = SmallRng::seed_from_u64(3);
        let tt = build_random(&problem, &mut rng);
        assert_eq!(tt.empty_cells(), 0);
        for row in &tt.grid {
            for cell in row {
                if let Cell::Assigned(slot) = cell {
                    assert!(slot.room_id.is_none());
                }
            }
        }
    }

    #[test]
    fn test_no_subjects_leaves_grid_empty() {
        let problem = TimetableProblem::new(1, vec![], vec![], vec![Room::theory("101")]);
        let mut rng = SmallRng::seed_from_u64(3);
        let tt = build_random(&problem, &mut rng);
        // Nothing to place; every teaching cell stays empty.
        assert_eq!(
            tt.empty_cells(),
            problem.grid.days * problem.grid.teaching_periods_per_day()
        );
    }

    #[test]
    fn test_preferred_teacher_gets_the_periods() {
        let subjects = vec![Subject::theory("MATH")
            .with_name("Math")
            .with_periods_per_week(3)];
        let teachers = vec![Teacher::new("T1").with_name("Dr. Rao").with_preference("MATH")];
        let rooms = vec![Room::theory("101")];
        let problem = TimetableProblem::new(1, subjects, teachers, rooms);

        let mut rng = SmallRng::seed_from_u64(21);
        let tt = build_random(&problem, &mut rng);

        let teachered = tt
            .grid
            .iter()
            .flatten()
            .filter(|c| {
                matches!(c, Cell::Assigned(s) if s.teacher_id.as_deref() == Some("T1"))
            })
            .count();
        assert_eq!(teachered, 3);
    }

    #[test]
    fn test_place_subject_randomly_respects_rules() {
        let problem = full_problem();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut tt = problem.new_timetable();
        let lab = problem.subject_by_id("CS303L").unwrap();

        assert!(place_subject_randomly(&problem, &mut tt, &mut rng, lab, 100));
        assert_eq!(tt.trackers.subject_count("CS303L"), 2);

        // A second block is blocked on days that already host the lab;
        // it must land on a different day.
        assert!(place_subject_randomly(&problem, &mut tt, &mut rng, lab, 100));
        let lab_days = (0..problem.grid.days)
            .filter(|&d| tt.has_lab_on_day(d))
            .count();
        assert_eq!(lab_days, 2);
    }
}
