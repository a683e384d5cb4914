//! Capability traits for solver-agnostic observers.
//!
//! These traits abstract over solver-specific event and action types, so an
//! observer written against them works with any solver that implements them.
//!
//! # Event traits
//!
//! - [`HasAcceptedStep`] — events that may report an accepted step
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use vadose_core::Observer;
//! use vadose_observers::traits::{CanStopEarly, HasAcceptedStep};
//!
//! struct StopAfter {
//!     time: f64,
//! }
//!
//! impl<E: HasAcceptedStep, A: CanStopEarly> Observer<E, A> for StopAfter {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let step = event.accepted_step()?;
//!         (step.time >= self.time).then(A::stop_early)
//!     }
//! }
//! ```

use vadose_core::State;
use vadose_solvers::transient::implicit;

/// Summary of an accepted step, borrowed from a solver event.
#[derive(Debug, Clone, Copy)]
pub struct AcceptedStep<'a> {
    /// Time at the end of the step.
    pub time: f64,
    pub step_size: f64,
    pub iterations: usize,
    pub state: &'a State,

    /// Total content of `state`.
    pub content: f64,
}

/// An event that may report an accepted step.
pub trait HasAcceptedStep {
    /// Returns the accepted step, or `None` if the event did not advance
    /// the run.
    fn accepted_step(&self) -> Option<AcceptedStep<'_>>;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl HasAcceptedStep for implicit::Event<'_> {
    fn accepted_step(&self) -> Option<AcceptedStep<'_>> {
        match *self {
            implicit::Event::Accepted {
                record,
                time,
                state,
                content,
            } => Some(AcceptedStep {
                time,
                step_size: record.step_size,
                iterations: record.iterations,
                state,
                content,
            }),
            implicit::Event::Rejected { .. } => None,
        }
    }
}

impl CanStopEarly for implicit::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use vadose_core::State;

    use super::{AcceptedStep, HasAcceptedStep};

    /// A minimal event for exercising observers without a solver.
    pub(crate) struct Step {
        pub accepted: bool,
        pub time: f64,
        pub state: State,
    }

    impl Step {
        pub(crate) fn accepted(time: f64, values: &[f64]) -> Self {
            Self {
                accepted: true,
                time,
                state: State::new(values),
            }
        }

        pub(crate) fn rejected(time: f64, values: &[f64]) -> Self {
            Self {
                accepted: false,
                time,
                state: State::new(values),
            }
        }
    }

    impl HasAcceptedStep for Step {
        fn accepted_step(&self) -> Option<AcceptedStep<'_>> {
            self.accepted.then_some(AcceptedStep {
                time: self.time,
                step_size: 0.1,
                iterations: 2,
                state: &self.state,
                content: self.state.values().iter().sum(),
            })
        }
    }

    #[derive(Debug, PartialEq)]
    pub(crate) struct Stop;

    impl super::CanStopEarly for Stop {
        fn stop_early() -> Self {
            Stop
        }
    }
}
