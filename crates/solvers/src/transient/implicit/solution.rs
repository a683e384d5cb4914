use vadose_core::State;

use super::StepRecord;

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the configured end time.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// An accepted state and its total content.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub time: f64,
    pub state: State,

    /// Total content `Σ wᵢ·storageᵢ`, for mass-balance checks.
    pub content: f64,
}

/// The result of an implicit run.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the solver terminated.
    pub status: Status,

    /// Time of the last accepted state.
    pub time: f64,

    /// The last accepted state.
    pub state: State,

    /// Every step attempt, accepted or rejected, in order.
    pub records: Vec<StepRecord>,

    /// Accepted states, starting with the initial state.
    pub history: Vec<Snapshot>,
}

impl Solution {
    /// Returns the number of accepted steps.
    #[must_use]
    pub fn accepted_steps(&self) -> usize {
        self.records.iter().filter(|r| r.is_accepted()).count()
    }

    /// Returns the number of rejected attempts.
    #[must_use]
    pub fn rejected_steps(&self) -> usize {
        self.records.len() - self.accepted_steps()
    }
}
