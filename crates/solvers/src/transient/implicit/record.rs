use vadose_core::OutOfRangeError;

use crate::tridiagonal::SingularSystemError;

/// Why a step attempt was discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    /// A candidate state left a material's valid range.
    OutOfRange(OutOfRangeError),

    /// The assembled system had a vanishing or non-finite pivot.
    Singular(SingularSystemError),

    /// The iteration limit was reached without converging.
    MaxIterations,
}

/// How a step attempt ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Accepted,
    Rejected(RejectReason),
}

/// One entry in the append-only log of step attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Zero-based index of the attempt over the whole run.
    pub attempt: usize,

    /// Start time of the attempted step.
    pub time: f64,

    /// Size of the attempted step.
    pub step_size: f64,

    /// Linear solves performed during the attempt.
    pub iterations: usize,

    pub outcome: Outcome,
}

impl StepRecord {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.outcome == Outcome::Accepted
    }
}
