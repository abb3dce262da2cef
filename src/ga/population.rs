//! Population and genetic operators.
//!
//! One generation step ([`Population::evolve`]) is: sort by fitness,
//! carry the elite fraction over unchanged, then breed the remainder
//! via tournament selection, day-row crossover, and clear-and-refill
//! mutation.
//!
//! Crossover splices whole day rows, so a child's trackers cannot be
//! derived incrementally — they are rebuilt from the child grid via
//! [`Trackers::from_grid`]. Mutation goes through `clear`/`place` and
//! keeps trackers incremental. Both operators preserve completeness:
//! mutation ends with a refill sweep so no non-break cell stays empty.

use rand::Rng;

use crate::config::GaConfig;
use crate::ga::builder::{build_random, place_subject_randomly, refill_empty_cells};
use crate::ga::fitness::evaluate;
use crate::ga::individual::{Cell, Timetable, Trackers};
use crate::ga::problem::TimetableProblem;

/// One generation of candidate timetables.
#[derive(Debug, Clone)]
pub struct Population {
    /// Current individuals, sorted best-first after `evolve`.
    pub individuals: Vec<Timetable>,
}

impl Population {
    /// Builds and evaluates an initial population of random candidates.
    pub fn seeded<R: Rng>(problem: &TimetableProblem, size: usize, rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| {
                let mut tt = build_random(problem, rng);
                evaluate(problem, &mut tt);
                tt
            })
            .collect();
        Self { individuals }
    }

    /// Sorts individuals best-first (descending fitness).
    pub fn sort_by_fitness(&mut self) {
        self.individuals.sort_by(|a, b| b.fitness.cmp(&a.fitness));
    }

    /// The fittest individual, if the population is non-empty.
    pub fn best(&self) -> Option<&Timetable> {
        self.individuals.iter().max_by_key(|t| t.fitness)
    }

    /// Tournament selection: the fittest of `k` uniformly drawn members.
    pub fn tournament<R: Rng>(&self, k: usize, rng: &mut R) -> &Timetable {
        let mut best = &self.individuals[rng.random_range(0..self.individuals.len())];
        for _ in 1..k.max(1) {
            let challenger = &self.individuals[rng.random_range(0..self.individuals.len())];
            if challenger.fitness > best.fitness {
                best = challenger;
            }
        }
        best
    }

    /// Advances one generation in place.
    pub fn evolve<R: Rng>(&mut self, problem: &TimetableProblem, config: &GaConfig, rng: &mut R) {
        if self.individuals.is_empty() {
            return;
        }
        self.sort_by_fitness();

        let mut next: Vec<Timetable> = self
            .individuals
            .iter()
            .take(config.elite_count().min(self.individuals.len()))
            .cloned()
            .collect();

        while next.len() < config.population_size {
            let parent_a = self.tournament(config.tournament_size, rng);
            let parent_b = self.tournament(config.tournament_size, rng);

            let mut child = if rng.random_bool(config.crossover_rate) {
                crossover(problem, parent_a, parent_b, rng)
            } else if rng.random_bool(0.5) {
                parent_a.clone()
            } else {
                parent_b.clone()
            };

            if rng.random_bool(config.mutation_rate) {
                mutate(problem, &mut child, rng);
            }

            evaluate(problem, &mut child);
            next.push(child);
        }

        self.individuals = next;
    }
}

/// Day-row crossover: each of the child's day rows is cloned from one
/// parent or the other by coin flip. Trackers are rebuilt from scratch.
pub fn crossover<R: Rng>(
    problem: &TimetableProblem,
    parent_a: &Timetable,
    parent_b: &Timetable,
    rng: &mut R,
) -> Timetable {
    let grid: Vec<Vec<Cell>> = (0..problem.grid.days)
        .map(|day| {
            if rng.random_bool(0.5) {
                parent_a.grid[day].clone()
            } else {
                parent_b.grid[day].clone()
            }
        })
        .collect();

    let trackers = Trackers::from_grid(
        &problem.grid,
        &problem.subjects,
        &problem.teachers,
        &problem.rooms,
        &grid,
    );

    Timetable {
        semester: problem.semester,
        grid,
        trackers,
        fitness: 0,
    }
}

/// Clear-and-refill mutation: picks one assigned cell at random, clears
/// it (cascading to a lab partner), re-places the subject with bounded
/// retries, then refills any cells left empty so completeness holds.
pub fn mutate<R: Rng>(problem: &TimetableProblem, tt: &mut Timetable, rng: &mut R) {
    let config = &problem.grid;

    let mut target = None;
    for _ in 0..config.days * config.periods {
        let day = rng.random_range(0..config.days);
        let period = rng.random_range(0..config.periods);
        if let Cell::Assigned(slot) = tt.cell(day, period) {
            target = Some((day, period, slot.subject_id.clone()));
            break;
        }
    }
    let (day, period, subject_id) = match target {
        Some(t) => t,
        None => return, // nothing assigned, nothing to mutate
    };

    tt.clear(day, period);
    if let Some(subject) = problem.subject_by_id(&subject_id) {
        place_subject_randomly(problem, tt, rng, subject, config.mutation_attempts);
    }
    refill_empty_cells(problem, tt, rng);
}
