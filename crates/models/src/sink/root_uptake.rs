use std::fmt;

use vadose_core::{Forcing, Sink, TimeOutOfRangeError};

use crate::ParameterError;

/// Feddes water stress response `α(h)`.
///
/// Uptake is zero above `h1` (anaerobiosis), ramps up to one at `h2`, stays
/// at one down to `h3`, and ramps down to zero at the wilting point `h4`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "[f64; 4]", into = "[f64; 4]")
)]
pub struct FeddesStress {
    h1: f64,
    h2: f64,
    h3: f64,
    h4: f64,
}

impl FeddesStress {
    /// Creates a stress response from its four pressure head thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error unless `h1 > h2 > h3 > h4`, all finite.
    pub fn new(h1: f64, h2: f64, h3: f64, h4: f64) -> Result<Self, ParameterError> {
        let thresholds = [h1, h2, h3, h4];
        let decreasing = thresholds.windows(2).all(|pair| pair[0] > pair[1]);
        if thresholds.iter().all(|h| h.is_finite()) && decreasing {
            Ok(Self { h1, h2, h3, h4 })
        } else {
            Err(ParameterError::StressThresholds(thresholds))
        }
    }

    #[must_use]
    pub fn thresholds(&self) -> [f64; 4] {
        [self.h1, self.h2, self.h3, self.h4]
    }

    /// Returns the stress factor in `[0, 1]` at pressure head `head`.
    #[must_use]
    pub fn alpha(&self, head: f64) -> f64 {
        let Self { h1, h2, h3, h4 } = *self;
        if head >= h1 || head < h4 || head.is_nan() {
            0.0
        } else if head >= h2 {
            (h1 - head) / (h1 - h2)
        } else if head >= h3 {
            1.0
        } else {
            (head - h4) / (h3 - h4)
        }
    }
}

impl Default for FeddesStress {
    /// Thresholds for a typical field crop, in centimeters of head.
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(-10.0, -25.0, -400.0, -8000.0).unwrap()
    }
}

impl TryFrom<[f64; 4]> for FeddesStress {
    type Error = ParameterError;

    fn try_from([h1, h2, h3, h4]: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(h1, h2, h3, h4)
    }
}

impl From<FeddesStress> for [f64; 4] {
    fn from(stress: FeddesStress) -> Self {
        stress.thresholds()
    }
}

/// Distribution of root density over the column.
///
/// Densities integrate to one over the root zone, so the uptake integrated
/// over an unstressed column equals the potential transpiration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "shape", rename_all = "snake_case")
)]
pub enum RootProfile {
    /// Constant density between two positions, in either order.
    Uniform { start: f64, end: f64 },

    /// Density decreasing linearly from `surface` to zero at `tip`.
    Tapered { surface: f64, tip: f64 },
}

impl RootProfile {
    /// Returns the root density at `position`, per unit length.
    #[must_use]
    pub fn density(&self, position: f64) -> f64 {
        match *self {
            Self::Uniform { start, end } => {
                let (low, high) = (start.min(end), start.max(end));
                if (low..=high).contains(&position) && high > low {
                    1.0 / (high - low)
                } else {
                    0.0
                }
            }
            Self::Tapered { surface, tip } => {
                let depth = (tip - surface).abs();
                let distance = (position - surface).abs();
                let toward_tip = (position - surface) * (tip - surface) >= 0.0;
                if depth > 0.0 && toward_tip && distance <= depth {
                    2.0 * (1.0 - distance / depth) / depth
                } else {
                    0.0
                }
            }
        }
    }

    fn validate(self) -> Result<Self, ParameterError> {
        let (a, b) = match self {
            Self::Uniform { start, end } => (start, end),
            Self::Tapered { surface, tip } => (surface, tip),
        };
        ParameterError::finite("root_profile", a)?;
        ParameterError::finite("root_profile", b)?;
        if a == b {
            return Err(ParameterError::Bounds { min: a, max: b });
        }
        Ok(self)
    }
}

/// Root water uptake `S = Tp(t)·β(z)·α(h)`.
///
/// `Tp` is the potential transpiration rate, positive for extraction, `β`
/// the root density from a [`RootProfile`], and `α` an optional
/// [`FeddesStress`] response. Without a stress response uptake is never
/// limited by the pressure head.
pub struct RootUptake {
    transpiration: Box<dyn Forcing>,
    profile: RootProfile,
    stress: Option<FeddesStress>,
}

impl RootUptake {
    /// Creates an unstressed root uptake sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile bounds are non-finite or coincide.
    pub fn new(
        transpiration: impl Forcing + 'static,
        profile: RootProfile,
    ) -> Result<Self, ParameterError> {
        Ok(Self {
            transpiration: Box::new(transpiration),
            profile: profile.validate()?,
            stress: None,
        })
    }

    /// Limits uptake by a water stress response.
    #[must_use]
    pub fn with_stress(mut self, stress: FeddesStress) -> Self {
        self.stress = Some(stress);
        self
    }

    #[must_use]
    pub fn profile(&self) -> RootProfile {
        self.profile
    }

    #[must_use]
    pub fn stress(&self) -> Option<FeddesStress> {
        self.stress
    }
}

impl Sink for RootUptake {
    fn rate(&self, time: f64, position: f64, value: f64) -> Result<f64, TimeOutOfRangeError> {
        let beta = self.profile.density(position);
        if beta == 0.0 {
            return Ok(0.0);
        }
        let potential = self.transpiration.value_at(time)?;
        let alpha = self.stress.map_or(1.0, |stress| stress.alpha(value));
        Ok(potential * beta * alpha)
    }
}

impl fmt::Debug for RootUptake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootUptake")
            .field("profile", &self.profile)
            .field("stress", &self.stress)
            .finish_non_exhaustive()
    }
}
