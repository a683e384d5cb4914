//! Adaptive implicit time stepping for one-dimensional transport.
//!
//! # Algorithm
//!
//! Each step is an atomic attempt driven by an explicit phase machine:
//!
//! ```text
//! Idle → Building → Solving → Converging → { Building, Accepted, Rejected }
//! Accepted → Idle | Terminal
//! Rejected → Idle | Terminal
//! ```
//!
//! 1. **Idle**: stop if the end time is reached, check the [`Budget`],
//!    clip the step to the end time, and evaluate the boundaries at both
//!    ends of the step.
//! 2. **Building**: assemble the system linearized about the latest iterate
//!    (the start state on the first iteration).
//! 3. **Solving**: solve the tridiagonal system for a candidate.
//! 4. **Converging**: evaluate the materials at the candidate and compare it
//!    to the previous iterate. Unconverged candidates become the next
//!    iterate until the iteration limit is reached.
//!
//! An accepted step advances time and state, then adapts the step size to
//! the iteration count. A rejected step leaves the state untouched and
//! retries with half the step size. A rejection at the minimum step size is
//! fatal, except that a final step clipped below the minimum is halved once
//! more before giving up.
//!
//! A step too small to change the time in floating point halts the run
//! with [`Error::Stalled`].
//!
//! Out-of-range material values and singular systems are treated as
//! rejections. They reach the caller only through a fatal
//! [`Error::NonConvergence`].
//!
//! # Observer Events
//!
//! The observer receives one [`Event`] per step attempt and may return
//! [`Action::StopEarly`] to halt with the last accepted state. On a fatal
//! rejection the event is still emitted but its action is ignored.

mod action;
mod attempt;
mod config;
mod error;
mod event;
mod record;
mod solution;


pub use action::Action;
pub use config::{Budget, Config, ConfigError};
pub use error::{Error, Halted};
pub use event::Event;
pub use record::{Outcome, RejectReason, StepRecord};
pub use solution::{Snapshot, Solution, Status};

use std::time::Instant;

use tracing::{debug, error, info, warn};
use vadose_core::{Column, Evaluation, MaterialModel, Observer, State, TimeOutOfRangeError};

use crate::assembly::{self, Level};

use attempt::{AttemptResult, Target, attempt};

/// Integrates `column` from `initial` over the configured time span.
///
/// See the [module docs](self) for the phase machine and observer events.
///
/// # Errors
///
/// Returns an error if the initial state does not match the grid or lies
/// outside a material's range, if a forcing is undefined at a step's end
/// points, if a step is rejected at the minimum step size, if a step stops
/// advancing time, or if the budget is exhausted. Errors raised after the first step carry the last accepted
/// state in a [`Halted`].
pub fn solve<M, Obs>(
    column: &Column<M>,
    initial: State,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    M: MaterialModel,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    if initial.len() != column.node_count() {
        return Err(Error::StateLength {
            expected: column.node_count(),
            actual: initial.len(),
        });
    }
    let mut coefficients = column
        .coefficients(initial.values())
        .map_err(Error::InitialState)?;

    let started = Instant::now();
    let budget = config.budget();
    let end_time = config.end_time();

    let mut run = Run {
        time: config.start_time(),
        step_size: config.initial_step(),
        history: vec![Snapshot {
            time: config.start_time(),
            content: column.content(&coefficients),
            state: initial.clone(),
        }],
        state: initial,
        records: Vec::new(),
    };

    loop {
        // Idle.
        if run.time >= end_time {
            info!(
                time = run.time,
                accepted = run.history.len() - 1,
                attempts = run.records.len(),
                "run complete"
            );
            return Ok(run.into_solution(Status::Complete));
        }

        let over_attempts = budget
            .max_attempts
            .is_some_and(|max| run.records.len() >= max);
        let over_time = budget
            .wall_clock
            .is_some_and(|limit| started.elapsed() >= limit);
        if over_attempts || over_time {
            error!(
                time = run.time,
                attempts = run.records.len(),
                elapsed = started.elapsed().as_secs_f64(),
                "run budget exceeded"
            );
            return Err(Error::BudgetExceeded(run.halt()));
        }

        let remaining = end_time - run.time;
        let (step_size, reaches_end) = if run.step_size >= remaining {
            (remaining, true)
        } else {
            (run.step_size, false)
        };
        let next_time = if reaches_end {
            end_time
        } else {
            run.time + step_size
        };
        if next_time <= run.time {
            error!(time = run.time, step_size, "step does not advance time");
            return Err(Error::Stalled(run.halt()));
        }

        let old_sink = match assembly::sink_rates(column, run.time, run.state.values()) {
            Ok(sink) => sink,
            Err(source) => return Err(run.forcing_failed(source)),
        };
        let boundaries = evaluate_boundaries(column, run.time, next_time);
        let (old_lower, old_upper, lower, upper) = match boundaries {
            Ok(evaluations) => evaluations,
            Err(source) => return Err(run.forcing_failed(source)),
        };

        let old = Level {
            values: run.state.values(),
            coefficients: &coefficients,
            sink: &old_sink,
            lower: old_lower,
            upper: old_upper,
        };
        let target = Target {
            time: next_time,
            step_size,
            lower,
            upper,
        };

        // Building, Solving, Converging.
        let result = match attempt(column, config, &old, &target) {
            Ok(result) => result,
            Err(source) => return Err(run.forcing_failed(source)),
        };

        let index = run.records.len();
        match result {
            AttemptResult::Converged {
                values,
                coefficients: new_coefficients,
                iterations,
            } => {
                // Accepted.
                let record = StepRecord {
                    attempt: index,
                    time: run.time,
                    step_size,
                    iterations,
                    outcome: Outcome::Accepted,
                };
                let content = column.content(&new_coefficients);

                run.time = next_time;
                run.state = State::new(values);
                coefficients = new_coefficients;
                if !reaches_end {
                    run.step_size = config.adapt(step_size, iterations);
                }
                run.records.push(record);
                run.history.push(Snapshot {
                    time: run.time,
                    state: run.state.clone(),
                    content,
                });

                debug!(
                    time = run.time,
                    step_size,
                    iterations,
                    next_step = run.step_size,
                    "step accepted"
                );

                let event = Event::new(&record, run.time, &run.state, content);
                if let Some(Action::StopEarly) = observer.observe(&event) {
                    return Ok(run.into_solution(Status::StoppedByObserver));
                }
            }

            AttemptResult::Rejected { reason, iterations } => {
                // Rejected.
                let record = StepRecord {
                    attempt: index,
                    time: run.time,
                    step_size,
                    iterations,
                    outcome: Outcome::Rejected(reason),
                };
                run.records.push(record);

                warn!(
                    time = run.time,
                    step_size,
                    iterations,
                    reason = ?reason,
                    "step rejected"
                );

                let content = run.history.last().map_or(0.0, |s| s.content);
                let action = observer.observe(&Event::new(&record, run.time, &run.state, content));

                let reduced = config.reduce(step_size).or_else(|| {
                    (reaches_end && step_size < config.min_step()).then_some(0.5 * step_size)
                });
                let Some(reduced) = reduced else {
                    error!(
                        time = run.time,
                        step_size,
                        reason = ?reason,
                        "no convergence at minimum step"
                    );
                    return Err(Error::NonConvergence(run.halt()));
                };
                run.step_size = reduced;

                if let Some(Action::StopEarly) = action {
                    return Ok(run.into_solution(Status::StoppedByObserver));
                }
            }
        }
    }
}

/// Integrates `column` without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<M: MaterialModel>(
    column: &Column<M>,
    initial: State,
    config: &Config,
) -> Result<Solution, Error> {
    solve(column, initial, config, ())
}

/// Accepted progress of a run.
struct Run {
    time: f64,
    step_size: f64,
    state: State,
    records: Vec<StepRecord>,
    history: Vec<Snapshot>,
}

impl Run {
    fn halt(self) -> Box<Halted> {
        Box::new(Halted {
            time: self.time,
            step_size: self.step_size,
            state: self.state,
            records: self.records,
        })
    }

    fn forcing_failed(self, source: TimeOutOfRangeError) -> Error {
        error!(time = self.time, %source, "forcing failed");
        Error::Forcing {
            source,
            halted: self.halt(),
        }
    }

    fn into_solution(self, status: Status) -> Solution {
        Solution {
            status,
            time: self.time,
            state: self.state,
            records: self.records,
            history: self.history,
        }
    }
}

/// Lower and upper at the start of a step, then lower and upper at its end.
type Evaluations = (Evaluation, Evaluation, Evaluation, Evaluation);

/// Evaluates both boundaries at the start and end of a step.
fn evaluate_boundaries<M: MaterialModel>(
    column: &Column<M>,
    start: f64,
    end: f64,
) -> Result<Evaluations, TimeOutOfRangeError> {
    Ok((
        column.lower().evaluate(start)?,
        column.upper().evaluate(start)?,
        column.lower().evaluate(end)?,
        column.upper().evaluate(end)?,
    ))
}
