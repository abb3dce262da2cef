//! Candidate timetable (GA individual).
//!
//! A [`Timetable`] is one complete candidate schedule for a semester: a
//! fixed days × periods grid of [`Cell`]s plus derived occupancy
//! trackers and a cached fitness score.
//!
//! # Trackers
//!
//! The [`Trackers`] are caches, never the source of truth. Every grid
//! mutation goes through [`Timetable::place`] or [`Timetable::clear`],
//! which update the grid and trackers in the same operation; crossover
//! instead rebuilds trackers wholesale via [`Trackers::from_grid`].
//! The invariant `trackers == Trackers::from_grid(...)` must hold after
//! construction, crossover, and mutation.
//!
//! # Lab pairs
//!
//! A lab assignment occupies two consecutive periods on the same day.
//! Clearing either half detects the paired period first and then clears
//! both — an explicit two-phase operation, not recursion.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::models::{Room, Subject, Teacher};

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// No assignment yet. Never present in a completed individual.
    Empty,
    /// Reserved break period. Write-protected.
    Break,
    /// A scheduled class.
    Assigned(Slot),
}

/// A scheduled class occupying one period.
///
/// Scheduling semantics are carried in explicit fields — display text is
/// never parsed to recover them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Scheduled subject id.
    pub subject_id: String,
    /// Whether this period is half of a lab block.
    pub is_lab: bool,
    /// Assigned teacher id, `None` when no teacher could be assigned.
    pub teacher_id: Option<String>,
    /// Assigned room number, `None` when no suitable room exists.
    pub room_id: Option<String>,
    /// Whether this placement ignored conflicts (last-resort fill).
    pub forced: bool,
}

impl Slot {
    /// Creates a slot for a subject.
    pub fn new(subject_id: impl Into<String>, is_lab: bool) -> Self {
        Self {
            subject_id: subject_id.into(),
            is_lab,
            teacher_id: None,
            room_id: None,
            forced: false,
        }
    }

    /// Sets the teacher.
    pub fn with_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = Some(teacher_id.into());
        self
    }

    /// Sets the room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    /// Marks the slot as a forced placement.
    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }
}

/// Derived occupancy and count caches for one candidate grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Trackers {
    days: usize,
    periods: usize,
    /// teacher id → day × period occupancy.
    pub teacher_busy: HashMap<String, Vec<Vec<bool>>>,
    /// room number → day × period occupancy.
    pub room_busy: HashMap<String, Vec<Vec<bool>>>,
    /// subject id → total scheduled periods.
    pub subject_total: HashMap<String, u32>,
    /// teacher id → periods taught per day.
    pub teacher_daily: HashMap<String, Vec<u32>>,
    /// subject id → periods scheduled per day.
    pub subject_daily: HashMap<String, Vec<u32>>,
}

impl Trackers {
    /// Creates zeroed trackers keyed by the given entities.
    pub fn new(
        config: &GridConfig,
        subjects: &[Subject],
        teachers: &[Teacher],
        rooms: &[Room],
    ) -> Self {
        let (days, periods) = (config.days, config.periods);
        let busy_grid = || vec![vec![false; periods]; days];

        let mut t = Self {
            days,
            periods,
            teacher_busy: HashMap::new(),
            room_busy: HashMap::new(),
            subject_total: HashMap::new(),
            teacher_daily: HashMap::new(),
            subject_daily: HashMap::new(),
        };
        for teacher in teachers {
            t.teacher_busy.insert(teacher.id.clone(), busy_grid());
            t.teacher_daily.insert(teacher.id.clone(), vec![0; days]);
        }
        for room in rooms {
            t.room_busy.insert(room.room_no.clone(), busy_grid());
        }
        for subject in subjects {
            t.subject_total.insert(subject.id.clone(), 0);
            t.subject_daily.insert(subject.id.clone(), vec![0; days]);
        }
        t
    }

    /// Rebuilds trackers from a grid from scratch.
    ///
    /// The only permitted way to derive trackers for a grid that was not
    /// built through `place`/`clear` (i.e., after crossover).
    pub fn from_grid(
        config: &GridConfig,
        subjects: &[Subject],
        teachers: &[Teacher],
        rooms: &[Room],
        grid: &[Vec<Cell>],
    ) -> Self {
        let mut trackers = Self::new(config, subjects, teachers, rooms);
        for (day, row) in grid.iter().enumerate() {
            for (period, cell) in row.iter().enumerate() {
                if let Cell::Assigned(slot) = cell {
                    trackers.mark(slot, day, period);
                }
            }
        }
        trackers
    }

    /// Whether the teacher is busy at (day, period). Unknown ids are free.
    pub fn teacher_is_busy(&self, teacher_id: &str, day: usize, period: usize) -> bool {
        self.teacher_busy
            .get(teacher_id)
            .map(|g| g[day][period])
            .unwrap_or(false)
    }

    /// Whether the room is busy at (day, period). Unknown ids are free.
    pub fn room_is_busy(&self, room_id: &str, day: usize, period: usize) -> bool {
        self.room_busy
            .get(room_id)
            .map(|g| g[day][period])
            .unwrap_or(false)
    }

    /// Total scheduled periods for a subject.
    pub fn subject_count(&self, subject_id: &str) -> u32 {
        self.subject_total.get(subject_id).copied().unwrap_or(0)
    }

    /// Periods taught by a teacher on a day.
    pub fn teacher_load(&self, teacher_id: &str, day: usize) -> u32 {
        self.teacher_daily
            .get(teacher_id)
            .map(|d| d[day])
            .unwrap_or(0)
    }

    /// Periods a subject occupies on a day.
    pub fn subject_load(&self, subject_id: &str, day: usize) -> u32 {
        self.subject_daily
            .get(subject_id)
            .map(|d| d[day])
            .unwrap_or(0)
    }

    fn mark(&mut self, slot: &Slot, day: usize, period: usize) {
        let (days, periods) = (self.days, self.periods);
        if let Some(teacher_id) = &slot.teacher_id {
            self.teacher_busy
                .entry(teacher_id.clone())
                .or_insert_with(|| vec![vec![false; periods]; days])[day][period] = true;
            self.teacher_daily
                .entry(teacher_id.clone())
                .or_insert_with(|| vec![0; days])[day] += 1;
        }
        if let Some(room_id) = &slot.room_id {
            self.room_busy
                .entry(room_id.clone())
                .or_insert_with(|| vec![vec![false; periods]; days])[day][period] = true;
        }
        *self.subject_total.entry(slot.subject_id.clone()).or_insert(0) += 1;
        self.subject_daily
            .entry(slot.subject_id.clone())
            .or_insert_with(|| vec![0; days])[day] += 1;
    }

    fn unmark(&mut self, slot: &Slot, day: usize, period: usize) {
        if let Some(teacher_id) = &slot.teacher_id {
            if let Some(g) = self.teacher_busy.get_mut(teacher_id) {
                g[day][period] = false;
            }
            if let Some(d) = self.teacher_daily.get_mut(teacher_id) {
                d[day] = d[day].saturating_sub(1);
            }
        }
        if let Some(room_id) = &slot.room_id {
            if let Some(g) = self.room_busy.get_mut(room_id) {
                g[day][period] = false;
            }
        }
        if let Some(total) = self.subject_total.get_mut(&slot.subject_id) {
            *total = total.saturating_sub(1);
        }
        if let Some(d) = self.subject_daily.get_mut(&slot.subject_id) {
            d[day] = d[day].saturating_sub(1);
        }
    }
}

/// One candidate weekly schedule for a semester.
#[derive(Debug, Clone)]
pub struct Timetable {
    /// Semester this candidate schedules.
    pub semester: i32,
    /// days × periods grid of cells.
    pub grid: Vec<Vec<Cell>>,
    /// Derived occupancy caches.
    pub trackers: Trackers,
    /// Cached fitness score (higher = better). Set by the evaluator.
    pub fitness: i64,
}

impl Timetable {
    /// Creates an empty timetable with break cells pre-set.
    pub fn new(
        semester: i32,
        config: &GridConfig,
        subjects: &[Subject],
        teachers: &[Teacher],
        rooms: &[Room],
    ) -> Self {
        let mut grid = vec![vec![Cell::Empty; config.periods]; config.days];
        for row in &mut grid {
            for period in &config.break_periods {
                if *period < row.len() {
                    row[*period] = Cell::Break;
                }
            }
        }
        Self {
            semester,
            grid,
            trackers: Trackers::new(config, subjects, teachers, rooms),
            fitness: 0,
        }
    }

    /// The cell at (day, period).
    #[inline]
    pub fn cell(&self, day: usize, period: usize) -> &Cell {
        &self.grid[day][period]
    }

    /// Whether the cell at (day, period) is empty (not break, not assigned).
    #[inline]
    pub fn slot_open(&self, day: usize, period: usize) -> bool {
        self.grid[day][period] == Cell::Empty
    }

    /// Whether neither the teacher nor the room is occupied at (day, period).
    pub fn is_free(&self, teacher_id: &str, room_id: &str, day: usize, period: usize) -> bool {
        !self.trackers.teacher_is_busy(teacher_id, day, period)
            && !self.trackers.room_is_busy(room_id, day, period)
    }

    /// Places a slot, updating grid and trackers atomically.
    ///
    /// Returns `false` without any change if the target cell is not
    /// empty — break cells are write-protected and assigned cells are
    /// never overwritten.
    pub fn place(&mut self, day: usize, period: usize, slot: Slot) -> bool {
        if self.grid[day][period] != Cell::Empty {
            return false;
        }
        self.trackers.mark(&slot, day, period);
        self.grid[day][period] = Cell::Assigned(slot);
        true
    }

    /// Clears an assignment, decrementing trackers.
    ///
    /// If the cleared cell is half of a lab block, the paired period is
    /// detected first and both are cleared (two-phase, never recursive).
    /// Break and empty cells are left untouched.
    pub fn clear(&mut self, day: usize, period: usize) {
        // Phase 1: detect the cells to clear.
        let slot = match &self.grid[day][period] {
            Cell::Assigned(slot) => slot.clone(),
            _ => return,
        };
        let mut targets = vec![period];
        if slot.is_lab {
            if let Some(pair) = self.lab_pair_of(day, period, &slot.subject_id) {
                targets.push(pair);
            }
        }

        // Phase 2: clear them all.
        for p in targets {
            if let Cell::Assigned(s) = &self.grid[day][p] {
                let s = s.clone();
                self.trackers.unmark(&s, day, p);
                self.grid[day][p] = Cell::Empty;
            }
        }
    }

    /// Finds the paired period of a lab cell, if any.
    ///
    /// Checks the following period first, then the preceding one, for an
    /// assigned lab cell of the same subject.
    fn lab_pair_of(&self, day: usize, period: usize, subject_id: &str) -> Option<usize> {
        let is_pair = |p: usize| match &self.grid[day][p] {
            Cell::Assigned(s) => s.is_lab && s.subject_id == subject_id,
            _ => false,
        };
        if period + 1 < self.grid[day].len() && is_pair(period + 1) {
            return Some(period + 1);
        }
        if period > 0 && is_pair(period - 1) {
            return Some(period - 1);
        }
        None
    }

    /// Whether any lab block is already scheduled on the day.
    pub fn has_lab_on_day(&self, day: usize) -> bool {
        self.grid[day]
            .iter()
            .any(|c| matches!(c, Cell::Assigned(s) if s.is_lab))
    }

    /// Whether an adjacent period on the day holds the same subject.
    pub fn has_adjacent_subject(&self, day: usize, period: usize, subject_id: &str) -> bool {
        let same = |p: usize| match &self.grid[day][p] {
            Cell::Assigned(s) => s.subject_id == subject_id,
            _ => false,
        };
        (period > 0 && same(period - 1))
            || (period + 1 < self.grid[day].len() && same(period + 1))
    }

    /// Count of empty non-break cells.
    pub fn empty_cells(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|c| **c == Cell::Empty)
            .count()
    }
}
