use vadose_core::{Coefficients, MaterialModel, OutOfRangeError};

use crate::ParameterError;

/// Mualem–van Genuchten soil hydraulic model.
///
/// The state is the pressure head `h`, negative under suction. With
/// `m = 1 - 1/n` and effective saturation `Se = (1 + (α|h|)ⁿ)⁻ᵐ`:
///
/// ```text
/// θ(h) = θr + (θs - θr)·Se
/// K(h) = Ks·Seˡ·[1 - (1 - Se^(1/m))ᵐ]²
/// ```
///
/// At or above `h = 0` the soil is saturated: `θ = θs + Ss·h`, `C = Ss`, and
/// `K = Ks`, where `Ss` is the specific storage (zero by default).
///
/// Units follow the inputs: `α` is the inverse of the head unit and `Ks`
/// sets the length and time units of flux.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "VanGenuchtenParams")
)]
pub struct VanGenuchten {
    residual: f64,
    saturated: f64,
    alpha: f64,
    n: f64,
    saturated_conductivity: f64,
    pore_connectivity: f64,
    specific_storage: f64,
}

impl VanGenuchten {
    /// Creates a model with pore connectivity `l = 0.5` and no specific storage.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 <= θr < θs <= 1`, `α > 0`, `n > 1`, and
    /// `Ks >= 0`, all finite.
    pub fn new(
        residual: f64,
        saturated: f64,
        alpha: f64,
        n: f64,
        saturated_conductivity: f64,
    ) -> Result<Self, ParameterError> {
        ParameterError::water_contents(residual, saturated)?;
        if !n.is_finite() || n <= 1.0 {
            return Err(ParameterError::ShapeExponent(n));
        }
        Ok(Self {
            residual,
            saturated,
            alpha: ParameterError::positive("alpha", alpha)?,
            n,
            saturated_conductivity: ParameterError::non_negative(
                "saturated_conductivity",
                saturated_conductivity,
            )?,
            pore_connectivity: 0.5,
            specific_storage: 0.0,
        })
    }

    /// Sets the pore-connectivity exponent `l`.
    ///
    /// # Errors
    ///
    /// Returns an error if `l` is not finite.
    pub fn with_pore_connectivity(mut self, l: f64) -> Result<Self, ParameterError> {
        self.pore_connectivity = ParameterError::finite("pore_connectivity", l)?;
        Ok(self)
    }

    /// Sets the specific storage `Ss` of the saturated zone.
    ///
    /// # Errors
    ///
    /// Returns an error if `ss` is negative or non-finite.
    pub fn with_specific_storage(mut self, ss: f64) -> Result<Self, ParameterError> {
        self.specific_storage = ParameterError::non_negative("specific_storage", ss)?;
        Ok(self)
    }

    fn m(&self) -> f64 {
        1.0 - 1.0 / self.n
    }

    /// Returns the effective saturation `Se ∈ (0, 1]`.
    #[must_use]
    pub fn effective_saturation(&self, head: f64) -> f64 {
        if head >= 0.0 {
            1.0
        } else {
            (1.0 + (self.alpha * -head).powf(self.n)).powf(-self.m())
        }
    }

    #[must_use]
    pub fn water_content(&self, head: f64) -> f64 {
        if head >= 0.0 {
            self.saturated + self.specific_storage * head
        } else {
            self.residual + (self.saturated - self.residual) * self.effective_saturation(head)
        }
    }

    /// Returns the water capacity `dθ/dh`.
    #[must_use]
    pub fn capacity(&self, head: f64) -> f64 {
        if head >= 0.0 {
            return self.specific_storage;
        }
        let m = self.m();
        let x = self.alpha * -head;
        (self.saturated - self.residual)
            * m
            * self.n
            * self.alpha
            * x.powf(self.n - 1.0)
            * (1.0 + x.powf(self.n)).powf(-m - 1.0)
    }

    #[must_use]
    pub fn conductivity(&self, head: f64) -> f64 {
        if head >= 0.0 {
            return self.saturated_conductivity;
        }
        let m = self.m();
        let se = self.effective_saturation(head);
        let term = 1.0 - (1.0 - se.powf(1.0 / m)).powf(m);
        self.saturated_conductivity * se.powf(self.pore_connectivity) * term * term
    }
}

impl MaterialModel for VanGenuchten {
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
struct VanGenuchtenParams {
    residual: f64,
    saturated: f64,
    alpha: f64,
    n: f64,
    saturated_conductivity: f64,
    #[serde(default = "default_pore_connectivity")]
    pore_connectivity: f64,
    #[serde(default)]
    specific_storage: f64,
}

#[cfg(feature = "serde")]
fn default_pore_connectivity() -> f64 {
    0.5
}

#[cfg(feature = "serde")]
impl TryFrom<VanGenuchtenParams> for VanGenuchten {
    type Error = ParameterError;

    fn try_from(p: VanGenuchtenParams) -> Result<Self, Self::Error> {
        Self::new(p.residual, p.saturated, p.alpha, p.n, p.saturated_conductivity)?
            .with_pore_connectivity(p.pore_connectivity)?
            .with_specific_storage(p.specific_storage)
    }
}
