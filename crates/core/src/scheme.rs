use thiserror::Error;

/// Rule for the conductivity at the interface between two nodes.
///
/// The choice matters for mass conservation near sharp material contrasts:
/// the harmonic mean limits flow across a poorly conducting layer, while the
/// arithmetic mean lets the better conductor dominate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Averaging {
    /// `(a + b) / 2`
    #[default]
    Arithmetic,

    /// `2ab / (a + b)`, zero when both are zero.
    Harmonic,

    /// `sqrt(a·b)`
    Geometric,
}

impl Averaging {
    /// Returns the interface value for node values `a` and `b`.
    #[must_use]
    pub fn mean(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Arithmetic => 0.5 * (a + b),
            Self::Harmonic => {
                let sum = a + b;
                if sum > 0.0 { 2.0 * a * b / sum } else { 0.0 }
            }
            Self::Geometric => (a * b).max(0.0).sqrt(),
        }
    }
}

/// Weight `ω` given to the new time level in the flux and source terms.
///
/// `ω = 1` is backward Euler and `ω = 0.5` is Crank–Nicolson. Values below
/// one half are not unconditionally stable and are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct TimeWeighting(f64);

/// Error returned for a time weight outside `[0.5, 1]`.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("time weight must lie in [0.5, 1], got {0}")]
pub struct WeightingError(pub f64);

impl TimeWeighting {
    pub const BACKWARD_EULER: Self = Self(1.0);
    pub const CRANK_NICOLSON: Self = Self(0.5);

    /// Creates a weighting with new-level weight `omega`.
    ///
    /// # Errors
    ///
    /// Returns a [`WeightingError`] unless `0.5 <= omega <= 1`.
    pub fn new(omega: f64) -> Result<Self, WeightingError> {
        if (0.5..=1.0).contains(&omega) {
            Ok(Self(omega))
        } else {
            Err(WeightingError(omega))
        }
    }

    /// Returns the weight of the new time level.
    #[must_use]
    pub fn implicit(self) -> f64 {
        self.0
    }

    /// Returns the weight of the old time level.
    #[must_use]
    pub fn explicit(self) -> f64 {
        1.0 - self.0
    }
}

impl Default for TimeWeighting {
    fn default() -> Self {
        Self::BACKWARD_EULER
    }
}

impl TryFrom<f64> for TimeWeighting {
    type Error = WeightingError;

    fn try_from(omega: f64) -> Result<Self, Self::Error> {
        Self::new(omega)
    }
}

impl From<TimeWeighting> for f64 {
    fn from(weighting: TimeWeighting) -> Self {
        weighting.0
    }
}
