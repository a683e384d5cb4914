use thiserror::Error;

/// Physical coefficients of a material at one state value.
///
/// - `capacity`: derivative of `storage` with respect to the state,
///   such as the water capacity `dθ/dh` or a volumetric heat capacity.
/// - `conductivity`: the diffusive transport coefficient.
/// - `storage`: the conserved content held at this state, such as the
///   volumetric water content `θ(h)`.
///
/// Solvers keep mass balance by tracking changes in `storage` directly and
/// use `capacity` only to linearize those changes between iterates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub capacity: f64,
    pub conductivity: f64,
    pub storage: f64,
}

/// A state value fell outside the domain of a constitutive function.
///
/// This signals the caller to reject or clamp the step, not to abort.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("state value {value} is outside the valid range [{min}, {max}]")]
pub struct OutOfRangeError {
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl OutOfRangeError {
    /// Checks that `value` lies within `[min, max]`.
    ///
    /// Non-finite values are always out of range.
    ///
    /// # Errors
    ///
    /// Returns an [`OutOfRangeError`] describing the violated range.
    pub fn check(value: f64, min: f64, max: f64) -> Result<f64, Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(value)
        } else {
            Err(Self { value, min, max })
        }
    }

    /// Checks that `value` is finite.
    ///
    /// # Errors
    ///
    /// Returns an [`OutOfRangeError`] spanning the whole real line.
    pub fn check_finite(value: f64) -> Result<f64, Self> {
        Self::check(value, f64::MIN, f64::MAX)
    }
}

/// Maps a state value to material coefficients.
///
/// Implementations must be pure functions of the state and their own
/// parameters, and continuous within their valid range. Models are shared
/// across threads when nodes are evaluated in parallel.
pub trait MaterialModel: Sync {
    /// Returns the coefficients at `value`.
    ///
    /// # Errors
    ///
    /// Returns an [`OutOfRangeError`] if `value` is outside the domain on
    /// which the constitutive functions are defined.
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError>;
}

impl<M: MaterialModel + ?Sized> MaterialModel for &M {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        (**self).coefficients(value)
    }
}

impl<M: MaterialModel + ?Sized> MaterialModel for Box<M> {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        (**self).coefficients(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_accepts_closed_range() {
        assert_eq!(OutOfRangeError::check(0.0, 0.0, 1.0), Ok(0.0));
        assert_eq!(OutOfRangeError::check(1.0, 0.0, 1.0), Ok(1.0));
    }

    #[test]
    fn check_rejects_outside_and_non_finite() {
        assert_eq!(
            OutOfRangeError::check(1.5, 0.0, 1.0),
            Err(OutOfRangeError {
                value: 1.5,
                min: 0.0,
                max: 1.0,
            })
        );
        assert!(OutOfRangeError::check_finite(f64::NAN).is_err());
        assert!(OutOfRangeError::check_finite(f64::NEG_INFINITY).is_err());
        assert!(OutOfRangeError::check_finite(-1e300).is_ok());
    }
}
