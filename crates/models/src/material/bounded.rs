use vadose_core::{Coefficients, MaterialModel, OutOfRangeError};

use crate::ParameterError;

/// Restricts another model's valid domain to `[min, max]`.
///
/// Values outside the bounds are rejected with an [`OutOfRangeError`],
/// which makes the solver retry the step with a smaller size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounded<M> {
    inner: M,
    min: f64,
    max: f64,
}

impl<M: MaterialModel> Bounded<M> {
    /// Wraps `inner` with the given bounds; either may be infinite.
    ///
    /// # Errors
    ///
    /// Returns an error unless `min < max`.
    pub fn new(inner: M, min: f64, max: f64) -> Result<Self, ParameterError> {
        if min < max {
            Ok(Self { inner, min, max })
        } else {
            Err(ParameterError::Bounds { min, max })
        }
    }

    #[must_use]
    pub fn inner(&self) -> &M {
        &self.inner
    }

    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl<M: MaterialModel> MaterialModel for Bounded<M> {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        // Non-finite values fail the range check even with infinite bounds.
        let value = OutOfRangeError::check(value, self.min, self.max)?;
        self.inner.coefficients(value)
    }
}
