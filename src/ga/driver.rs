//! Run loop and multi-semester entry point.
//!
//! [`GaRunner`] owns one run: seed the RNG, build the initial
//! population, evolve up to the generation limit, stop early once the
//! best score stalls, and resolve the winner into a
//! [`TimetableSolution`].
//!
//! [`generate_all`] is the department-level entry point: one
//! independent run per semester found in the subject list, each with a
//! derived seed so a seeded batch stays reproducible.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{GaConfig, GridConfig};
use crate::ga::fitness::Diagnostics;
use crate::ga::population::Population;
use crate::ga::problem::TimetableProblem;
use crate::models::{Room, Subject, Teacher};
use crate::output::TimetableSolution;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Best fitness stalled for the configured number of generations.
    Converged,
    /// The generation limit was reached.
    GenerationLimit,
}

/// Drives one genetic algorithm run.
#[derive(Debug, Clone, Default)]
pub struct GaRunner {
    config: GaConfig,
}

impl GaRunner {
    /// Creates a runner with the given parameters.
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }

    /// Runs the GA for one semester's problem and returns the best
    /// timetable found.
    pub fn run(&self, problem: &TimetableProblem) -> TimetableSolution {
        let config = &self.config;
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let size = config.population_size.max(1);
        let mut population = Population::seeded(problem, size, &mut rng);
        let mut best = population
            .best()
            .cloned()
            .unwrap_or_else(|| problem.new_timetable());
        info!(
            semester = problem.semester,
            population = size,
            fitness = best.fitness,
            "initial population seeded"
        );

        let mut stall = 0;
        let mut generations = 0;
        let mut outcome = RunOutcome::GenerationLimit;
        for generation in 0..config.max_generations {
            population.evolve(problem, config, &mut rng);
            generations = generation + 1;

            let current = match population.best() {
                Some(t) => t,
                None => break,
            };
            if current.fitness > best.fitness {
                best = current.clone();
                stall = 0;
                debug!(generation, fitness = best.fitness, "fitness improved");
            } else {
                stall += 1;
            }

            if stall >= config.stall_limit {
                outcome = RunOutcome::Converged;
                break;
            }
        }

        let diagnostics = Diagnostics::scan(problem, &best);
        info!(
            semester = problem.semester,
            generations,
            fitness = best.fitness,
            ?outcome,
            unscheduled = diagnostics.unscheduled_periods,
            "run finished"
        );
        TimetableSolution::build(problem, &best, generations, outcome, diagnostics)
    }
}

/// Generates one timetable per semester present in the subject list.
///
/// Teachers and rooms are shared across semesters; subjects are
/// partitioned by their `semester` field. Runs are independent, and a
/// seeded config derives a distinct seed per semester so results stay
/// reproducible without every semester seeing the identical stream.
pub fn generate_all(
    subjects: &[Subject],
    teachers: &[Teacher],
    rooms: &[Room],
    grid: &GridConfig,
    config: &GaConfig,
) -> Vec<TimetableSolution> {
    let mut semesters: Vec<i32> = subjects.iter().map(|s| s.semester).collect();
    semesters.sort_unstable();
    semesters.dedup();

    semesters
        .into_iter()
        .map(|semester| {
            let own: Vec<Subject> = subjects
                .iter()
                .filter(|s| s.semester == semester)
                .cloned()
                .collect();
            let problem =
                TimetableProblem::new(semester, own, teachers.to_vec(), rooms.to_vec())
                    .with_grid(grid.clone());

            let mut run_config = config.clone();
            if let Some(seed) = config.seed {
                run_config.seed = Some(seed.wrapping_add(semester as u64));
            }
            GaRunner::new(run_config).run(&problem)
        })
        .collect()
}
