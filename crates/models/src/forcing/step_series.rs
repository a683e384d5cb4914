use vadose_core::{Forcing, TimeOutOfRangeError};

use crate::SeriesError;

/// A constant value held over the half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawStep")
)]
pub struct Step {
    start: f64,
    end: f64,
    value: f64,
}

impl Step {
    /// Creates a step.
    ///
    /// # Errors
    ///
    /// Returns an error if any argument is not finite or if `start >= end`.
    pub fn new(start: f64, end: f64, value: f64) -> Result<Self, SeriesError> {
        if let Some(i) = [start, end, value].iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFinite(i));
        }
        if start >= end {
            return Err(SeriesError::EmptyStep { start, end });
        }
        Ok(Self { start, end, value })
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn contains(&self, time: f64) -> bool {
        (self.start..self.end).contains(&time)
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A piecewise-constant forcing, such as a sequence of rain events.
///
/// Steps must not overlap but may leave gaps, and a time in a gap is out of
/// range. The end of the last step is included so that a series covering a
/// whole run is defined at the run's end time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Step>", into = "Vec<Step>")
)]
pub struct StepSeries {
    steps: Vec<Step>,
}

impl StepSeries {
    /// Creates a series from steps in any order.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no steps or if any two steps overlap.
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Result<Self, SeriesError> {
        let mut steps: Vec<_> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(SeriesError::NoSteps);
        }
        steps.sort_by(|a, b| a.start.total_cmp(&b.start));

        if let Some(i) = steps.windows(2).position(|pair| pair[0].overlaps(&pair[1])) {
            return Err(SeriesError::Overlap {
                first: (steps[i].start, steps[i].end),
                second: (steps[i + 1].start, steps[i + 1].end),
            });
        }

        Ok(Self { steps })
    }

    /// Returns the steps ordered by start time.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the span from the first start to the last end.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        (self.steps[0].start, self.steps[self.steps.len() - 1].end)
    }
}

impl Forcing for StepSeries {
    fn value_at(&self, time: f64) -> Result<f64, TimeOutOfRangeError> {
        let (start, end) = self.span();
        let index = self.steps.partition_point(|step| step.end <= time);

        match self.steps.get(index) {
            Some(step) if step.contains(time) => Ok(step.value),
            None if time == end => Ok(self.steps[index - 1].value),
            _ => Err(TimeOutOfRangeError { time, start, end }),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawStep {
    start: f64,
    end: f64,
    value: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawStep> for Step {
    type Error = SeriesError;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end, raw.value)
    }
}

impl TryFrom<Vec<Step>> for StepSeries {
    type Error = SeriesError;

    fn try_from(steps: Vec<Step>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<StepSeries> for Vec<Step> {
    fn from(series: StepSeries) -> Self {
        series.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storms() -> StepSeries {
        StepSeries::new([
            Step::new(5.0, 8.0, 0.3).unwrap(),
            Step::new(0.0, 2.0, 1.0).unwrap(),
            Step::new(2.0, 5.0, 0.0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn looks_up_half_open_steps() {
        let series = storms();

        assert_eq!(series.value_at(0.0), Ok(1.0));
        assert_eq!(series.value_at(1.999), Ok(1.0));
        assert_eq!(series.value_at(2.0), Ok(0.0));
        assert_eq!(series.value_at(6.0), Ok(0.3));
        assert_eq!(series.value_at(8.0), Ok(0.3));
    }

    #[test]
    fn errors_outside_and_in_gaps() {
        let series = StepSeries::new([
            Step::new(0.0, 1.0, 1.0).unwrap(),
            Step::new(2.0, 3.0, 2.0).unwrap(),
        ])
        .unwrap();

        let gap = TimeOutOfRangeError {
            time: 1.5,
            start: 0.0,
            end: 3.0,
        };
        assert_eq!(series.value_at(1.5), Err(gap));
        assert!(series.value_at(-0.1).is_err());
        assert!(series.value_at(3.1).is_err());
        assert!(series.value_at(f64::NAN).is_err());
    }

    #[test]
    fn rejects_overlapping_steps() {
        let result = StepSeries::new([
            Step::new(0.0, 10.0, 1.0).unwrap(),
            Step::new(9.0, 15.0, 2.0).unwrap(),
        ]);

        assert!(matches!(
            result,
            Err(SeriesError::Overlap {
                first: (0.0, 10.0),
                second: (9.0, 15.0),
            })
        ));
        assert!(matches!(StepSeries::new([]), Err(SeriesError::NoSteps)));
    }

    #[test]
    fn rejects_empty_steps() {
        assert!(matches!(
            Step::new(2.0, 2.0, 1.0),
            Err(SeriesError::EmptyStep { .. })
        ));
        assert!(Step::new(0.0, f64::NAN, 1.0).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_step_list() {
        let json = r#"[
            { "start": 1.0, "end": 2.0, "value": 4.0 },
            { "start": 0.0, "end": 1.0, "value": 3.0 }
        ]"#;
        let series: StepSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.value_at(0.5), Ok(3.0));
        assert_eq!(series.span(), (0.0, 2.0));

        let overlapping = r#"[
            { "start": 0.0, "end": 2.0, "value": 4.0 },
            { "start": 1.0, "end": 3.0, "value": 3.0 }
        ]"#;
        assert!(serde_json::from_str::<StepSeries>(overlapping).is_err());
    }
}
