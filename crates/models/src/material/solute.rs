use vadose_core::{Coefficients, MaterialModel, OutOfRangeError};

use crate::ParameterError;

/// A dissolved solute carried by water at a fixed water content.
///
/// The state is the concentration `c`. With water content `θ`, molecular
/// diffusion `Dm`, bulk density `ρb`, and linear sorption coefficient `Kd`:
///
/// ```text
/// storage      = (θ + ρb·Kd)·c
/// conductivity = θ·Dm
/// ```
///
/// Mechanical dispersion `αL·|q|` depends on the water flux through each
/// face rather than on the node, so it comes from the column's
/// [`Transport::dispersivity`] together with per-face fluxes. With
/// arithmetic averaging the face conductance is then `θ̄·Dm + αL·|q|`, the
/// usual `θ·D` with `D = αL·|q|/θ + Dm`.
///
/// [`Transport::dispersivity`]: vadose_core::Transport::dispersivity
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SoluteParams")
)]
pub struct Solute {
    water_content: f64,
    diffusion: f64,
    bulk_density: f64,
    distribution: f64,
}

impl Solute {
    /// Creates a non-sorbing solute.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < water_content <= 1` and `diffusion` is
    /// finite and non-negative.
    pub fn new(water_content: f64, diffusion: f64) -> Result<Self, ParameterError> {
        let water_content = ParameterError::positive("water_content", water_content)?;
        if water_content > 1.0 {
            return Err(ParameterError::WaterContent {
                value: water_content,
                residual: 0.0,
                saturated: 1.0,
            });
        }
        Ok(Self {
            water_content,
            diffusion: ParameterError::non_negative("diffusion", diffusion)?,
            bulk_density: 0.0,
            distribution: 0.0,
        })
    }

    /// Adds linear equilibrium sorption onto the solid phase.
    ///
    /// # Errors
    ///
    /// Returns an error if either parameter is negative or non-finite.
    pub fn with_sorption(
        mut self,
        bulk_density: f64,
        distribution: f64,
    ) -> Result<Self, ParameterError> {
        self.bulk_density = ParameterError::non_negative("bulk_density", bulk_density)?;
        self.distribution = ParameterError::non_negative("distribution", distribution)?;
        Ok(self)
    }

    #[must_use]
    pub fn water_content(&self) -> f64 {
        self.water_content
    }

    /// Returns the retardation factor `1 + ρb·Kd/θ`.
    #[must_use]
    pub fn retardation(&self) -> f64 {
        1.0 + self.bulk_density * self.distribution / self.water_content
    }

    fn capacity(&self) -> f64 {
        self.water_content + self.bulk_density * self.distribution
    }
}

impl MaterialModel for Solute {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        let concentration = OutOfRangeError::check_finite(value)?;
        Ok(Coefficients {
            capacity: self.capacity(),
            conductivity: self.water_content * self.diffusion,
            storage: self.capacity() * concentration,
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SoluteParams {
    water_content: f64,
    diffusion: f64,
    #[serde(default)]
    bulk_density: f64,
    #[serde(default)]
    distribution: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<SoluteParams> for Solute {
    type Error = ParameterError;

    fn try_from(p: SoluteParams) -> Result<Self, Self::Error> {
        Self::new(p.water_content, p.diffusion)?.with_sorption(p.bulk_density, p.distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn dissolved_mass_scales_with_water_content() {
        let solute = Solute::new(0.25, 2.0).unwrap();
        let c = solute.coefficients(4.0).unwrap();

        assert_relative_eq!(c.storage, 1.0);
        assert_relative_eq!(c.capacity, 0.25);
        assert_relative_eq!(c.conductivity, 0.5);
        assert_relative_eq!(solute.retardation(), 1.0);
    }

    #[test]
    fn sorption_retards_without_changing_diffusion() {
        let solute = Solute::new(0.4, 1.0)
            .unwrap()
            .with_sorption(1.6, 0.5)
            .unwrap();
        let c = solute.coefficients(1.0).unwrap();

        assert_relative_eq!(solute.retardation(), 3.0);
        assert_relative_eq!(c.capacity, 1.2);
        assert_relative_eq!(c.storage, 1.2);
        assert_relative_eq!(c.conductivity, 0.4);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            Solute::new(0.0, 1.0),
            Err(ParameterError::NonPositive {
                name: "water_content",
                ..
            })
        ));
        assert!(matches!(
            Solute::new(1.2, 1.0),
            Err(ParameterError::WaterContent { .. })
        ));
        assert!(Solute::new(0.3, -1.0).is_err());
        assert!(
            Solute::new(0.3, 1.0)
                .unwrap()
                .with_sorption(f64::NAN, 1.0)
                .is_err()
        );
        assert!(Solute::new(0.3, 1.0).unwrap().coefficients(f64::INFINITY).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_with_optional_sorption() {
        let plain: Solute =
            serde_json::from_str(r#"{ "water_content": 0.3, "diffusion": 0.1 }"#).unwrap();
        assert_eq!(plain, Solute::new(0.3, 0.1).unwrap());

        let sorbing: Solute = serde_json::from_str(
            r#"{ "water_content": 0.3, "diffusion": 0.1, "bulk_density": 1.5, "distribution": 0.2 }"#,
        )
        .unwrap();
        assert_relative_eq!(sorbing.retardation(), 2.0);
    }
}
