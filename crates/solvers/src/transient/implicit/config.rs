use std::time::Duration;

use thiserror::Error;

/// Limits on the total work of a run.
///
/// Exceeding either limit halts the run with the last accepted state intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Budget {
    /// Maximum number of step attempts, accepted or rejected.
    pub max_attempts: Option<usize>,

    /// Maximum elapsed wall-clock time.
    pub wall_clock: Option<Duration>,
}

impl Budget {
    /// A budget with no limits.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// Configuration for the implicit solver.
///
/// Every setter revalidates, so a `Config` is always usable as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Settings", into = "Settings")
)]
pub struct Config {
    start_time: f64,
    end_time: f64,
    initial_step: f64,
    min_step: f64,
    max_step: f64,
    abs_tol: f64,
    rel_tol: f64,
    storage_tol: Option<f64>,
    max_iterations: usize,
    fast_iterations: usize,
    slow_iterations: usize,
    growth: f64,
    shrink: f64,
    pivot_epsilon: f64,
    budget: Budget,
}

/// Errors that can occur when validating an implicit solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("start_time and end_time must be finite with start_time <= end_time")]
    TimeSpan,

    #[error("step sizes must be finite with 0 < min_step <= initial_step <= max_step")]
    StepSizes,

    #[error("abs_tol must be finite and non-negative")]
    AbsTol,

    #[error("rel_tol must be finite and non-negative")]
    RelTol,

    #[error("abs_tol and rel_tol cannot both be zero")]
    ZeroTolerance,

    #[error("storage_tol must be finite and non-negative")]
    StorageTol,

    #[error("max_iterations must be positive and fast_iterations <= slow_iterations")]
    Iterations,

    #[error("growth must be finite and at least 1")]
    Growth,

    #[error("shrink must lie in (0, 1]")]
    Shrink,

    #[error("pivot_epsilon must be finite and positive")]
    PivotEpsilon,

    #[error("max_attempts must be positive")]
    MaxAttempts,

    #[error("wall_clock must be a finite, non-negative number of seconds")]
    WallClock,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(0.0, 1.0).unwrap()
    }
}

impl Config {
    /// Creates a config for a run over `[start_time, end_time]`.
    ///
    /// Step sizes, tolerances, and adaptation use their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if either time is non-finite or the span is negative.
    pub fn new(start_time: f64, end_time: f64) -> Result<Self, ConfigError> {
        Self {
            start_time,
            end_time,
            initial_step: 1e-2,
            min_step: 1e-6,
            max_step: 1.0,
            abs_tol: 1e-6,
            rel_tol: 0.0,
            storage_tol: None,
            max_iterations: 20,
            fast_iterations: 3,
            slow_iterations: 7,
            growth: 1.3,
            shrink: 0.7,
            pivot_epsilon: 1e-14,
            budget: Budget::unlimited(),
        }
        .validate()
    }

    /// Sets the initial, minimum, and maximum step sizes.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < min <= initial <= max`, all finite.
    pub fn with_step_sizes(mut self, initial: f64, min: f64, max: f64) -> Result<Self, ConfigError> {
        self.initial_step = initial;
        self.min_step = min;
        self.max_step = max;
        self.validate()
    }

    /// Sets the per-node state tolerances.
    ///
    /// An iterate has converged when every node satisfies
    /// `|candidate - previous| <= abs_tol + rel_tol·|candidate|`.
    ///
    /// # Errors
    ///
    /// Returns an error if either tolerance is negative or non-finite, or
    /// if both are zero.
    pub fn with_tolerances(mut self, abs_tol: f64, rel_tol: f64) -> Result<Self, ConfigError> {
        self.abs_tol = abs_tol;
        self.rel_tol = rel_tol;
        self.validate()
    }

    /// Also requires each node's storage to change by at most `tol`
    /// between iterates.
    ///
    /// # Errors
    ///
    /// Returns an error if `tol` is negative or non-finite.
    pub fn with_storage_tolerance(mut self, tol: f64) -> Result<Self, ConfigError> {
        self.storage_tol = Some(tol);
        self.validate()
    }

    /// Sets the iteration limit and the marks used to adapt the step size.
    ///
    /// Steps converging in at most `fast` iterations grow the next step;
    /// steps needing at least `slow` iterations shrink it.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is zero or `fast > slow`.
    pub fn with_iterations(mut self, max: usize, fast: usize, slow: usize) -> Result<Self, ConfigError> {
        self.max_iterations = max;
        self.fast_iterations = fast;
        self.slow_iterations = slow;
        self.validate()
    }

    /// Sets the step-size growth and shrink factors.
    ///
    /// # Errors
    ///
    /// Returns an error unless `growth >= 1` and `0 < shrink <= 1`.
    pub fn with_adaptation(mut self, growth: f64, shrink: f64) -> Result<Self, ConfigError> {
        self.growth = growth;
        self.shrink = shrink;
        self.validate()
    }

    /// Sets the smallest pivot accepted by the linear solver, as a fraction
    /// of the largest entry magnitude in the pivot's row.
    ///
    /// # Errors
    ///
    /// Returns an error unless `epsilon` is finite and positive.
    pub fn with_pivot_epsilon(mut self, epsilon: f64) -> Result<Self, ConfigError> {
        self.pivot_epsilon = epsilon;
        self.validate()
    }

    /// Sets the run budget.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_attempts` is zero.
    pub fn with_budget(mut self, budget: Budget) -> Result<Self, ConfigError> {
        self.budget = budget;
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !self.start_time.is_finite()
            || !self.end_time.is_finite()
            || self.end_time < self.start_time
        {
            return Err(ConfigError::TimeSpan);
        }
        let ordered = self.min_step > 0.0
            && self.min_step <= self.initial_step
            && self.initial_step <= self.max_step;
        if !ordered || !self.max_step.is_finite() {
            return Err(ConfigError::StepSizes);
        }
        if !non_negative(self.abs_tol) {
            return Err(ConfigError::AbsTol);
        }
        if !non_negative(self.rel_tol) {
            return Err(ConfigError::RelTol);
        }
        if self.abs_tol == 0.0 && self.rel_tol == 0.0 {
            return Err(ConfigError::ZeroTolerance);
        }
        if self.storage_tol.is_some_and(|tol| !non_negative(tol)) {
            return Err(ConfigError::StorageTol);
        }
        if self.max_iterations == 0 || self.fast_iterations > self.slow_iterations {
            return Err(ConfigError::Iterations);
        }
        if !self.growth.is_finite() || self.growth < 1.0 {
            return Err(ConfigError::Growth);
        }
        if self.shrink.is_nan() || self.shrink <= 0.0 || self.shrink > 1.0 {
            return Err(ConfigError::Shrink);
        }
        if !self.pivot_epsilon.is_finite() || self.pivot_epsilon <= 0.0 {
            return Err(ConfigError::PivotEpsilon);
        }
        if self.budget.max_attempts == Some(0) {
            return Err(ConfigError::MaxAttempts);
        }

        Ok(self)
    }

    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    #[must_use]
    pub fn initial_step(&self) -> f64 {
        self.initial_step
    }

    #[must_use]
    pub fn min_step(&self) -> f64 {
        self.min_step
    }

    #[must_use]
    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    #[must_use]
    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    #[must_use]
    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    #[must_use]
    pub fn storage_tol(&self) -> Option<f64> {
        self.storage_tol
    }

    /// Returns the maximum number of linear solves per step attempt.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    #[must_use]
    pub fn fast_iterations(&self) -> usize {
        self.fast_iterations
    }

    #[must_use]
    pub fn slow_iterations(&self) -> usize {
        self.slow_iterations
    }

    #[must_use]
    pub fn growth(&self) -> f64 {
        self.growth
    }

    #[must_use]
    pub fn shrink(&self) -> f64 {
        self.shrink
    }

    #[must_use]
    pub fn pivot_epsilon(&self) -> f64 {
        self.pivot_epsilon
    }

    #[must_use]
    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Returns the step size to try after a step accepted at `step_size`
    /// that took `iterations` linear solves.
    #[must_use]
    pub fn adapt(&self, step_size: f64, iterations: usize) -> f64 {
        let next = if iterations <= self.fast_iterations {
            step_size * self.growth
        } else if iterations >= self.slow_iterations {
            step_size * self.shrink
        } else {
            step_size
        };
        next.clamp(self.min_step, self.max_step)
    }

    /// Returns the step size to retry with after a rejection at `step_size`,
    /// or `None` if `step_size` was already the minimum.
    #[must_use]
    pub fn reduce(&self, step_size: f64) -> Option<f64> {
        (step_size > self.min_step).then(|| (0.5 * step_size).max(self.min_step))
    }
}

/// Flat, serializable mirror of [`Config`]; missing fields take defaults.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Settings {
    start_time: f64,
    end_time: f64,
    initial_step: f64,
    min_step: f64,
    max_step: f64,
    abs_tol: f64,
    rel_tol: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_tol: Option<f64>,
    max_iterations: usize,
    fast_iterations: usize,
    slow_iterations: usize,
    growth: f64,
    shrink: f64,
    pivot_epsilon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_attempts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wall_clock_seconds: Option<f64>,
}

#[cfg(feature = "serde")]
impl Default for Settings {
    fn default() -> Self {
        Config::default().into()
    }
}

#[cfg(feature = "serde")]
impl From<Config> for Settings {
    fn from(config: Config) -> Self {
        Self {
            start_time: config.start_time,
            end_time: config.end_time,
            initial_step: config.initial_step,
            min_step: config.min_step,
            max_step: config.max_step,
            abs_tol: config.abs_tol,
            rel_tol: config.rel_tol,
            storage_tol: config.storage_tol,
            max_iterations: config.max_iterations,
            fast_iterations: config.fast_iterations,
            slow_iterations: config.slow_iterations,
            growth: config.growth,
            shrink: config.shrink,
            pivot_epsilon: config.pivot_epsilon,
            max_attempts: config.budget.max_attempts,
            wall_clock_seconds: config.budget.wall_clock.map(|d| d.as_secs_f64()),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<Settings> for Config {
    type Error = ConfigError;

    fn try_from(s: Settings) -> Result<Self, Self::Error> {
        let wall_clock = s
            .wall_clock_seconds
            .map(Duration::try_from_secs_f64)
            .transpose()
            .map_err(|_| ConfigError::WallClock)?;

        Self {
            start_time: s.start_time,
            end_time: s.end_time,
            initial_step: s.initial_step,
            min_step: s.min_step,
            max_step: s.max_step,
            abs_tol: s.abs_tol,
            rel_tol: s.rel_tol,
            storage_tol: s.storage_tol,
            max_iterations: s.max_iterations,
            fast_iterations: s.fast_iterations,
            slow_iterations: s.slow_iterations,
            growth: s.growth,
            shrink: s.shrink,
            pivot_epsilon: s.pivot_epsilon,
            budget: Budget {
                max_attempts: s.max_attempts,
                wall_clock,
            },
        }
        .validate()
    }
}
