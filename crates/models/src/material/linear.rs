use vadose_core::{Coefficients, MaterialModel, OutOfRangeError};

use crate::ParameterError;

/// Constant capacity and conductivity, with storage `capacity·u`.
///
/// Suitable for heat conduction at fixed moisture, tracer diffusion, and
/// saturated flow.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LinearParams")
)]
pub struct Linear {
    capacity: f64,
    conductivity: f64,
}

impl Linear {
    /// Creates a linear material.
    ///
    /// # Errors
    ///
    /// Returns an error if either coefficient is negative or non-finite.
    pub fn new(capacity: f64, conductivity: f64) -> Result<Self, ParameterError> {
        Ok(Self {
            capacity: ParameterError::non_negative("capacity", capacity)?,
            conductivity: ParameterError::non_negative("conductivity", conductivity)?,
        })
    }

    #[must_use]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    #[must_use]
    pub fn conductivity(&self) -> f64 {
        self.conductivity
    }
}

impl MaterialModel for Linear {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        let value = OutOfRangeError::check_finite(value)?;
        Ok(Coefficients {
            capacity: self.capacity,
            conductivity: self.conductivity,
            storage: self.capacity * value,
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct LinearParams {
    capacity: f64,
    conductivity: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<LinearParams> for Linear {
    type Error = ParameterError;

    fn try_from(p: LinearParams) -> Result<Self, Self::Error> {
        Self::new(p.capacity, p.conductivity)
    }
}
