//! Scheduling configuration.
//!
//! Two configuration surfaces:
//!
//! - [`GridConfig`]: the shape of the weekly grid (days, periods, break
//!   indices) plus the daily caps and retry bounds used by the
//!   constructive heuristic. The reference layout is 5 days × 11 periods
//!   with breaks at periods 2, 5, and 8.
//! - [`GaConfig`]: the evolution parameters — population size, rates,
//!   elitism, tournament size, generation limits, and an optional seed
//!   for reproducible runs.
//!
//! Defaults match the reference department deployment; all values are
//! overridable via `with_*` builders.

use serde::{Deserialize, Serialize};

/// Weekly grid layout and placement limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of teaching days per week.
    pub days: usize,
    /// Number of periods per day, breaks included.
    pub periods: usize,
    /// Period indices reserved as breaks (never assignable).
    pub break_periods: Vec<usize>,
    /// Maximum periods a teacher may teach in one day.
    pub max_teacher_daily: u32,
    /// Maximum periods a subject may occupy in one day.
    pub max_subject_daily: u32,
    /// Random placement attempts per lab subject.
    pub lab_attempts: u32,
    /// Random placement attempts per theory subject.
    pub theory_attempts: u32,
    /// Random placement attempts per no-teacher subject and per
    /// deficit-fill pass.
    pub fill_attempts: u32,
    /// Random placement attempts when refilling a mutated slot.
    pub mutation_attempts: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            days: 5,
            periods: 11,
            break_periods: vec![2, 5, 8],
            max_teacher_daily: 5,
            max_subject_daily: 3,
            lab_attempts: 100,
            theory_attempts: 200,
            fill_attempts: 100,
            mutation_attempts: 50,
        }
    }
}

impl GridConfig {
    /// Creates the default 5×11 grid configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid dimensions.
    pub fn with_dimensions(mut self, days: usize, periods: usize) -> Self {
        self.days = days;
        self.periods = periods;
        self
    }

    /// Sets the break period indices.
    pub fn with_breaks(mut self, break_periods: Vec<usize>) -> Self {
        self.break_periods = break_periods;
        self
    }

    /// Sets the teacher daily period cap.
    pub fn with_max_teacher_daily(mut self, cap: u32) -> Self {
        self.max_teacher_daily = cap;
        self
    }

    /// Sets the subject daily period cap.
    pub fn with_max_subject_daily(mut self, cap: u32) -> Self {
        self.max_subject_daily = cap;
        self
    }

    /// Whether the given period index is a break.
    #[inline]
    pub fn is_break(&self, period: usize) -> bool {
        self.break_periods.contains(&period)
    }

    /// Number of assignable (non-break) periods per day.
    pub fn teaching_periods_per_day(&self) -> usize {
        (0..self.periods).filter(|&p| !self.is_break(p)).count()
    }

    /// Whether a lab block may start at this period: both the period and
    /// its successor must exist and be non-break.
    #[inline]
    pub fn lab_block_fits(&self, period: usize) -> bool {
        period + 1 < self.periods && !self.is_break(period) && !self.is_break(period + 1)
    }
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Maximum number of generations.
    pub max_generations: u32,
    /// Probability of producing a child via crossover.
    pub crossover_rate: f64,
    /// Probability of mutating a child.
    pub mutation_rate: f64,
    /// Fraction of the population carried over unchanged.
    pub elitism_fraction: f64,
    /// Tournament size for parent selection.
    pub tournament_size: usize,
    /// Stop early after this many generations without improvement.
    pub stall_limit: u32,
    /// RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            elitism_fraction: 0.1,
            tournament_size: 5,
            stall_limit: 50,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Creates the default GA configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation limit.
    pub fn with_max_generations(mut self, generations: u32) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elitism fraction.
    pub fn with_elitism_fraction(mut self, fraction: f64) -> Self {
        self.elitism_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    /// Sets the early-stop stall limit.
    pub fn with_stall_limit(mut self, limit: u32) -> Self {
        self.stall_limit = limit;
        self
    }

    /// Sets a fixed RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of elite individuals for a given population size.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elitism_fraction) as usize
    }
}
