use std::fmt;

use ndarray::Array1;
use ninterp::prelude::{Interp1DOwned, Interpolator};
use vadose_core::{Forcing, TimeOutOfRangeError};

use crate::SeriesError;

/// A forcing linearly interpolated between `(time, value)` samples.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Samples", into = "Samples")
)]
pub struct TimeSeries {
    samples: Samples,
    interp: Interp1DOwned<f64, ninterp::strategy::Linear>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Samples {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Creates a time series from sample times and values.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two samples, if the lengths
    /// differ, if any sample is not finite, or if the times are not strictly
    /// increasing.
    pub fn new(
        times: impl Into<Vec<f64>>,
        values: impl Into<Vec<f64>>,
    ) -> Result<Self, SeriesError> {
        let samples = Samples {
            times: times.into(),
            values: values.into(),
        };
        let n = samples.times.len();
        if n < 2 {
            return Err(SeriesError::TooShort(n));
        }
        if samples.values.len() != n {
            return Err(SeriesError::LengthMismatch {
                expected: n,
                actual: samples.values.len(),
            });
        }
        let finite = |v: &Vec<f64>| v.iter().position(|x| !x.is_finite());
        if let Some(i) = finite(&samples.times).or_else(|| finite(&samples.values)) {
            return Err(SeriesError::NonFinite(i));
        }

        let interp = Interp1DOwned::new(
            Array1::from(samples.times.clone()),
            Array1::from(samples.values.clone()),
            ninterp::strategy::Linear,
            ninterp::interpolator::Extrapolate::Error,
        )?;
        Ok(Self { samples, interp })
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.samples.times
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.samples.values
    }

    /// Returns the closed time span covered by the samples.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        let times = &self.samples.times;
        (times[0], times[times.len() - 1])
    }
}

impl Forcing for TimeSeries {
    fn value_at(&self, time: f64) -> Result<f64, TimeOutOfRangeError> {
        let (start, end) = self.span();
        let out_of_range = TimeOutOfRangeError { time, start, end };
        if !(start..=end).contains(&time) {
            return Err(out_of_range);
        }
        self.interp.interpolate(&[time]).map_err(|_| out_of_range)
    }
}

impl fmt::Debug for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeSeries")
            .field("times", &self.samples.times)
            .field("values", &self.samples.values)
            .finish()
    }
}

impl TryFrom<Samples> for TimeSeries {
    type Error = SeriesError;

    fn try_from(samples: Samples) -> Result<Self, Self::Error> {
        Self::new(samples.times, samples.values)
    }
}

impl From<TimeSeries> for Samples {
    fn from(series: TimeSeries) -> Self {
        series.samples
    }
}
