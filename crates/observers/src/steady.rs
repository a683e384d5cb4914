use vadose_core::{Observer, State};

use crate::traits::{CanStopEarly, HasAcceptedStep};

/// Stops a run once the state has effectively stopped changing.
///
/// After each accepted step the largest nodal change divided by the step
/// size is compared with `tolerance`. The run stops at the first step whose
/// rate of change falls below it.
#[derive(Debug, Clone)]
pub struct Steady {
    tolerance: f64,
    previous: Option<State>,
    reached: Option<f64>,
}

impl Steady {
    /// Creates a detector for the given rate tolerance.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            previous: None,
            reached: None,
        }
    }

    /// Seeds the detector with the initial state so the first step can stop.
    #[must_use]
    pub fn from_initial(mut self, initial: &State) -> Self {
        self.previous = Some(initial.clone());
        self
    }

    /// Returns the time at which steady state was detected, if it was.
    #[must_use]
    pub fn reached(&self) -> Option<f64> {
        self.reached
    }
}

impl<E: HasAcceptedStep, A: CanStopEarly> Observer<E, A> for Steady {
    fn observe(&mut self, event: &E) -> Option<A> {
        let step = event.accepted_step()?;
        let previous = self.previous.replace(step.state.clone())?;
        if previous.len() != step.state.len() {
            return None;
        }

        let rate = previous.max_abs_diff(step.state) / step.step_size;
        if rate < self.tolerance {
            self.reached = Some(step.time);
            return Some(A::stop_early());
        }
        None
    }
}

/// Allows `&mut Steady` to be passed to solvers that take an observer by
/// value.
impl<E: HasAcceptedStep, A: CanStopEarly> Observer<E, A> for &mut Steady {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}
