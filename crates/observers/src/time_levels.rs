use vadose_core::Observer;

use crate::traits::HasAcceptedStep;

/// One accepted step in a [`TimeLevels`] log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeLevel {
    pub time: f64,
    pub step_size: f64,
    pub iterations: usize,
    pub content: f64,
}

/// Logs a summary row for every accepted step.
///
/// The rows are what a tabular time-level report needs: end time, step
/// size, iteration count, and total content.
#[derive(Debug, Clone, Default)]
pub struct TimeLevels {
    levels: Vec<TimeLevel>,
}

impl TimeLevels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn levels(&self) -> &[TimeLevel] {
        &self.levels
    }

    /// Returns the change in total content from the first to the last row.
    #[must_use]
    pub fn content_change(&self) -> Option<f64> {
        let first = self.levels.first()?;
        let last = self.levels.last()?;
        Some(last.content - first.content)
    }

    #[must_use]
    pub fn into_levels(self) -> Vec<TimeLevel> {
        self.levels
    }
}

impl<E: HasAcceptedStep, A> Observer<E, A> for TimeLevels {
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(step) = event.accepted_step() {
            self.levels.push(TimeLevel {
                time: step.time,
                step_size: step.step_size,
                iterations: step.iterations,
                content: step.content,
            });
        }
        None
    }
}

/// Allows `&mut TimeLevels` to be passed to solvers that take an observer by
/// value.
impl<E: HasAcceptedStep, A> Observer<E, A> for &mut TimeLevels {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::traits::testing::Step;

    fn feed(levels: &mut TimeLevels, event: &Step) {
        let _: Option<()> = levels.observe(event);
    }

    #[test]
    fn records_only_accepted_steps() {
        let mut levels = TimeLevels::new();
        feed(&mut levels, &Step::accepted(0.1, &[1.0, 2.0]));
        feed(&mut levels, &Step::rejected(0.1, &[1.0, 2.0]));
        feed(&mut levels, &Step::accepted(0.2, &[2.0, 2.5]));

        let rows = levels.levels();
        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[1].time, 0.2);
        assert_eq!(rows[1].iterations, 2);
        assert_relative_eq!(levels.content_change().unwrap(), 1.5);
    }

    #[test]
    fn empty_log_has_no_change() {
        assert_eq!(TimeLevels::new().content_change(), None);
    }
}
