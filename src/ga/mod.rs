//! GA-based timetable generation.
//!
//! Implements a genetic algorithm over complete weekly timetables. An
//! individual is a whole days × periods grid, not a permutation: the
//! constructive heuristic builds gap-free candidates, crossover splices
//! day rows between parents, and mutation clears one assignment and
//! re-places it.
//!
//! # Submodules
//!
//! - [`individual`]: The grid encoding and its derived trackers
//! - [`problem`]: One semester's inputs plus precomputed lookups
//! - [`builder`]: The phased constructive heuristic
//! - [`fitness`]: Violation scan and penalty-based scoring
//! - [`population`]: Selection, crossover, mutation, generation step
//! - [`driver`]: The run loop and per-semester entry point
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Abramson (1991), "Constructing school timetables using simulated
//!   annealing" (the constraint model, not the algorithm)

pub mod builder;
pub mod driver;
pub mod fitness;
pub mod individual;
pub mod population;
pub mod problem;

pub use builder::build_random;
pub use driver::{generate_all, GaRunner, RunOutcome};
pub use fitness::{evaluate, Diagnostics, FitnessWeights};
pub use individual::{Cell, Slot, Timetable, Trackers};
pub use population::Population;
pub use problem::TimetableProblem;
