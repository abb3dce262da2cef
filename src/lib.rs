//! Genetic-algorithm timetable generator for academic departments.
//!
//! Assigns subjects, teachers, and rooms to a fixed weekly grid (5 days
//! × 11 periods with reserved breaks by default) one semester at a
//! time. A run always produces a complete, gap-free timetable; when the
//! inputs are infeasible the shortfall is reported in
//! [`ga::Diagnostics`] instead of failing the run.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Subject`, `Teacher`, `Room`
//! - **`config`**: Grid layout ([`GridConfig`]) and GA parameters
//!   ([`GaConfig`])
//! - **`ga`**: The algorithm — encoding, constructive heuristic,
//!   fitness, operators, run loop
//! - **`output`**: Display-ready solutions with names resolved
//! - **`validation`**: Input integrity checks (duplicate IDs, period
//!   requirements, preference references)
//!
//! # Example
//!
//! ```
//! use timetable_ga::config::GaConfig;
//! use timetable_ga::ga::{GaRunner, TimetableProblem};
//! use timetable_ga::models::{Room, Subject, Teacher};
//!
//! let subjects = vec![
//!     Subject::theory("CS301").with_name("Data Structures").with_periods_per_week(4),
//!     Subject::lab("CS302L").with_name("DS Lab").with_periods_per_week(2),
//! ];
//! let teachers = vec![
//!     Teacher::new("T1").with_name("Dr. Rao").with_preference("CS301"),
//!     Teacher::new("T2").with_name("Dr. Iyer").with_preference("DS Lab"),
//! ];
//! let rooms = vec![Room::theory("101"), Room::lab("L1")];
//!
//! let problem = TimetableProblem::new(3, subjects, teachers, rooms);
//! let config = GaConfig::default()
//!     .with_population_size(20)
//!     .with_max_generations(50)
//!     .with_seed(42);
//! let solution = GaRunner::new(config).run(&problem);
//! assert!(solution.grid.iter().all(|row| row.iter().all(|c| c.is_some())));
//! ```

pub mod config;
pub mod ga;
pub mod models;
pub mod output;
pub mod validation;

pub use config::{GaConfig, GridConfig};
pub use ga::{generate_all, GaRunner, TimetableProblem};
pub use output::TimetableSolution;
