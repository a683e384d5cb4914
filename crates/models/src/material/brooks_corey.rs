use vadose_core::{Coefficients, MaterialModel, OutOfRangeError};

use crate::ParameterError;

/// Brooks–Corey soil hydraulic model.
///
/// The state is the pressure head `h`. Below the bubbling pressure
/// `-hb` the effective saturation is `Se = (|h|/hb)^(-λ)`; above it the soil
/// is saturated. Conductivity follows `K = Ks·Se^((2 + 3λ)/λ)`.
///
/// The capacity jumps at `h = -hb`, which can slow convergence near the
/// air-entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BrooksCoreyParams")
)]
pub struct BrooksCorey {
    residual: f64,
    saturated: f64,
    bubbling_pressure: f64,
    lambda: f64,
    saturated_conductivity: f64,
}

impl BrooksCorey {
    /// Creates a Brooks–Corey model; `bubbling_pressure` is the magnitude `hb`.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 <= θr < θs <= 1`, `hb > 0`, `λ > 0`, and
    /// `Ks >= 0`, all finite.
    pub fn new(
        residual: f64,
        saturated: f64,
        bubbling_pressure: f64,
        lambda: f64,
        saturated_conductivity: f64,
    ) -> Result<Self, ParameterError> {
        ParameterError::water_contents(residual, saturated)?;
        Ok(Self {
            residual,
            saturated,
            bubbling_pressure: ParameterError::positive("bubbling_pressure", bubbling_pressure)?,
            lambda: ParameterError::positive("lambda", lambda)?,
            saturated_conductivity: ParameterError::non_negative(
                "saturated_conductivity",
                saturated_conductivity,
            )?,
        })
    }

    #[must_use]
    pub fn effective_saturation(&self, head: f64) -> f64 {
        if head >= -self.bubbling_pressure {
            1.0
        } else {
            (-head / self.bubbling_pressure).powf(-self.lambda)
        }
    }

    #[must_use]
    pub fn water_content(&self, head: f64) -> f64 {
        self.residual + (self.saturated - self.residual) * self.effective_saturation(head)
    }

    /// Returns the water capacity `dθ/dh`.
    #[must_use]
    pub fn capacity(&self, head: f64) -> f64 {
        if head >= -self.bubbling_pressure {
            0.0
        } else {
            (self.saturated - self.residual) * self.lambda * self.effective_saturation(head) / -head
        }
    }

    #[must_use]
    pub fn conductivity(&self, head: f64) -> f64 {
        let exponent = (2.0 + 3.0 * self.lambda) / self.lambda;
        self.saturated_conductivity * self.effective_saturation(head).powf(exponent)
    }
}

impl MaterialModel for BrooksCorey {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        let head = OutOfRangeError::check_finite(value)?;
        Ok(Coefficients {
            capacity: self.capacity(head),
            conductivity: self.conductivity(head),
            storage: self.water_content(head),
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BrooksCoreyParams {
    residual: f64,
    saturated: f64,
    bubbling_pressure: f64,
    lambda: f64,
    saturated_conductivity: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<BrooksCoreyParams> for BrooksCorey {
    type Error = ParameterError;

    fn try_from(p: BrooksCoreyParams) -> Result<Self, Self::Error> {
        Self::new(
            p.residual,
            p.saturated,
            p.bubbling_pressure,
            p.lambda,
            p.saturated_conductivity,
        )
    }
}
