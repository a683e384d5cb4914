use vadose_core::{
    Coefficients, Column, Evaluation, MaterialModel, TimeOutOfRangeError, TridiagonalSystem,
};

use crate::{
    assembly::{self, Level},
    tridiagonal,
};

use super::{Config, RejectReason};

/// Phases of the Picard iteration within one step attempt.
enum Phase {
    /// Assemble the system linearized about the current iterate.
    Building,

    /// Solve the assembled system for a candidate.
    Solving(TridiagonalSystem),

    /// Evaluate the candidate and test it against the previous iterate.
    Converging,
}

/// Final result of one step attempt.
pub(super) enum AttemptResult {
    Converged {
        values: Vec<f64>,
        coefficients: Vec<Coefficients>,
        iterations: usize,
    },
    Rejected {
        reason: RejectReason,
        iterations: usize,
    },
}

/// The end-of-step quantities an attempt iterates toward.
pub(super) struct Target {
    pub time: f64,
    pub step_size: f64,
    pub lower: Evaluation,
    pub upper: Evaluation,
}

/// Runs Picard iterations from `old` until convergence or rejection.
///
/// Nothing outside the attempt is modified, so a rejected attempt leaves
/// the caller's state exactly as it was.
///
/// # Errors
///
/// Returns a [`TimeOutOfRangeError`] if the sink cannot be evaluated at
/// the end of the step.
pub(super) fn attempt<M: MaterialModel>(
    column: &Column<M>,
    config: &Config,
    old: &Level<'_>,
    target: &Target,
) -> Result<AttemptResult, TimeOutOfRangeError> {
    let n = column.node_count();
    let mut iterate = old.values.to_vec();
    let mut iterate_coefficients = old.coefficients.to_vec();
    let mut sink = assembly::sink_rates(column, target.time, &iterate)?;
    let mut candidate = vec![0.0; n];
    let mut scratch = vec![0.0; n];
    let mut iterations = 0;
    let mut phase = Phase::Building;

    loop {
        phase = match phase {
            Phase::Building => {
                let level = Level {
                    values: &iterate,
                    coefficients: &iterate_coefficients,
                    sink: &sink,
                    lower: target.lower,
                    upper: target.upper,
                };
                Phase::Solving(assembly::assemble(column, target.step_size, old, &level))
            }

            Phase::Solving(system) => {
                iterations += 1;
                let solved = tridiagonal::solve_in_place(
                    &system,
                    config.pivot_epsilon(),
                    &mut scratch,
                    &mut candidate,
                );
                if let Err(err) = solved {
                    return Ok(AttemptResult::Rejected {
                        reason: RejectReason::Singular(err),
                        iterations,
                    });
                }
                Phase::Converging
            }

            Phase::Converging => {
                let coefficients = match column.coefficients(&candidate) {
                    Ok(coefficients) => coefficients,
                    Err(err) => {
                        return Ok(AttemptResult::Rejected {
                            reason: RejectReason::OutOfRange(err),
                            iterations,
                        });
                    }
                };

                if is_converged(
                    config,
                    (iterate.as_slice(), iterate_coefficients.as_slice()),
                    (candidate.as_slice(), coefficients.as_slice()),
                ) {
                    return Ok(AttemptResult::Converged {
                        values: candidate,
                        coefficients,
                        iterations,
                    });
                }
                if iterations >= config.max_iterations() {
                    return Ok(AttemptResult::Rejected {
                        reason: RejectReason::MaxIterations,
                        iterations,
                    });
                }

                std::mem::swap(&mut iterate, &mut candidate);
                iterate_coefficients = coefficients;
                sink = assembly::sink_rates(column, target.time, &iterate)?;
                Phase::Building
            }
        };
    }
}

/// Checks the per-node state tolerance and, if configured, the storage
/// tolerance.
fn is_converged(
    config: &Config,
    previous: (&[f64], &[Coefficients]),
    candidate: (&[f64], &[Coefficients]),
) -> bool {
    let values = previous
        .0
        .iter()
        .zip(candidate.0)
        .all(|(p, c)| (c - p).abs() <= config.abs_tol() + config.rel_tol() * c.abs());

    values
        && config.storage_tol().is_none_or(|tol| {
            previous
                .1
                .iter()
                .zip(candidate.1)
                .all(|(p, c)| (c.storage - p.storage).abs() <= tol)
        })
}
