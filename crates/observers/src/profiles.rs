use vadose_core::{Observer, State};

use crate::traits::HasAcceptedStep;

/// Keeps the full state after every `stride`-th accepted step.
#[derive(Debug, Clone)]
pub struct Profiles {
    stride: usize,
    accepted: usize,
    profiles: Vec<(f64, State)>,
}

impl Profiles {
    /// Creates a recorder that keeps one profile per `stride` accepted steps.
    ///
    /// A stride of zero is treated as one.
    #[must_use]
    pub fn every(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
            accepted: 0,
            profiles: Vec::new(),
        }
    }

    /// Returns the recorded `(time, state)` pairs.
    #[must_use]
    pub fn profiles(&self) -> &[(f64, State)] {
        &self.profiles
    }

    #[must_use]
    pub fn into_profiles(self) -> Vec<(f64, State)> {
        self.profiles
    }
}

impl<E: HasAcceptedStep, A> Observer<E, A> for Profiles {
    fn observe(&mut self, event: &E) -> Option<A> {
        let step = event.accepted_step()?;
        self.accepted += 1;
        if self.accepted % self.stride == 0 {
            self.profiles.push((step.time, step.state.clone()));
        }
        None
    }
}

/// Allows `&mut Profiles` to be passed to solvers that take an observer by
/// value.
impl<E: HasAcceptedStep, A> Observer<E, A> for &mut Profiles {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}
