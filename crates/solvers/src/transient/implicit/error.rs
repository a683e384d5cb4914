use thiserror::Error;

use vadose_core::{OutOfRangeError, State, TimeOutOfRangeError};

use super::StepRecord;

/// The run state when the solver stopped on a fatal condition.
///
/// `state` is always the last accepted state, never a partial iterate.
#[derive(Debug, Clone)]
pub struct Halted {
    /// Time of the last accepted state.
    pub time: f64,

    /// Step size the solver would have attempted next.
    pub step_size: f64,

    pub state: State,

    /// Every step attempt up to the halt.
    pub records: Vec<StepRecord>,
}

/// Errors that can occur during an implicit run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("initial state has {actual} values but the grid has {expected} nodes")]
    StateLength { expected: usize, actual: usize },

    #[error("initial state is invalid: {0}")]
    InitialState(#[source] OutOfRangeError),

    #[error("forcing failed at t = {}: {source}", .halted.time)]
    Forcing {
        #[source]
        source: TimeOutOfRangeError,
        halted: Box<Halted>,
    },

    #[error("no convergence at t = {} with step size {}", .0.time, .0.step_size)]
    NonConvergence(Box<Halted>),

    #[error("run budget exceeded at t = {}", .0.time)]
    BudgetExceeded(Box<Halted>),

    /// A step of `step_size` no longer advances time in floating point.
    #[error("time stalled at t = {} with step size {}", .0.time, .0.step_size)]
    Stalled(Box<Halted>),
}

impl Error {
    /// Returns the run state for errors raised after the run started.
    #[must_use]
    pub fn halted(&self) -> Option<&Halted> {
        match self {
            Self::StateLength { .. } | Self::InitialState(_) => None,
            Self::Forcing { halted, .. }
            | Self::NonConvergence(halted)
            | Self::BudgetExceeded(halted)
            | Self::Stalled(halted) => Some(halted),
        }
    }
}
