use ninterp::error::ValidateError;
use thiserror::Error;

/// Invalid parameters for a constitutive model or sink.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ParameterError {
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("water contents must satisfy 0 <= residual ({residual}) < saturated ({saturated}) <= 1")]
    WaterContents { residual: f64, saturated: f64 },

    #[error("water content {value} lies outside [{residual}, {saturated}]")]
    WaterContent {
        value: f64,
        residual: f64,
        saturated: f64,
    },

    #[error("van Genuchten n must be finite and greater than 1, got {0}")]
    ShapeExponent(f64),

    #[error("bounds must satisfy min < max, got [{min}, {max}]")]
    Bounds { min: f64, max: f64 },

    #[error("stress thresholds must be finite and strictly decreasing: {0:?}")]
    StressThresholds([f64; 4]),
}

impl ParameterError {
    pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::Negative { name, value })
        }
    }

    pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self::NonPositive { name, value })
        }
    }

    pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { name, value })
        }
    }

    pub(crate) fn water_contents(residual: f64, saturated: f64) -> Result<(), Self> {
        if (0.0..saturated).contains(&residual) && saturated <= 1.0 {
            Ok(())
        } else {
            Err(Self::WaterContents {
                residual,
                saturated,
            })
        }
    }
}

/// Invalid data for a table, time series, or step series.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("a series needs at least two points, got {0}")]
    TooShort(usize),

    #[error("series columns differ in length: {expected} abscissae but {actual} values")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("series entry {0} is not finite")]
    NonFinite(usize),

    #[error("step has an empty range [{start}, {end})")]
    EmptyStep { start: f64, end: f64 },

    #[error("steps overlap: [{}, {}) and [{}, {})", .first.0, .first.1, .second.0, .second.1)]
    Overlap { first: (f64, f64), second: (f64, f64) },

    #[error("a step series needs at least one step")]
    NoSteps,

    #[error(transparent)]
    Validation(#[from] ValidateError),
}
