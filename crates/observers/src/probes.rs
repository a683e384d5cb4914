use vadose_core::Observer;

use crate::traits::HasAcceptedStep;

/// Samples the state at fixed nodes after every accepted step.
///
/// Nodes beyond the end of the state are recorded as `NaN`.
#[derive(Debug, Clone)]
pub struct Probes {
    nodes: Vec<usize>,
    times: Vec<f64>,
    values: Vec<Vec<f64>>,
}

impl Probes {
    /// Creates probes at the given node indices.
    pub fn new(nodes: impl Into<Vec<usize>>) -> Self {
        let nodes = nodes.into();
        Self {
            values: vec![Vec::new(); nodes.len()],
            nodes,
            times: Vec::new(),
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Returns the sample times shared by every probe.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the series recorded by the `probe`-th node, if it exists.
    #[must_use]
    pub fn series(&self, probe: usize) -> Option<&[f64]> {
        self.values.get(probe).map(Vec::as_slice)
    }
}

impl<E: HasAcceptedStep, A> Observer<E, A> for Probes {
    fn observe(&mut self, event: &E) -> Option<A> {
        let step = event.accepted_step()?;
        self.times.push(step.time);
        for (&node, series) in self.nodes.iter().zip(&mut self.values) {
            series.push(step.state.get(node).unwrap_or(f64::NAN));
        }
        None
    }
}

/// Allows `&mut Probes` to be passed to solvers that take an observer by
/// value.
impl<E: HasAcceptedStep, A> Observer<E, A> for &mut Probes {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::traits::testing::Step;

    #[test]
    fn samples_each_node() {
        let mut probes = Probes::new([0, 2, 5]);
        for (time, values) in [(0.5, [1.0, 2.0, 3.0]), (1.0, [4.0, 5.0, 6.0])] {
            let _: Option<()> = probes.observe(&Step::accepted(time, &values));
        }
        let _: Option<()> = probes.observe(&Step::rejected(1.0, &[0.0; 3]));

        assert_eq!(probes.times(), [0.5, 1.0]);
        assert_eq!(probes.series(0), Some([1.0, 4.0].as_slice()));
        assert_eq!(probes.series(1), Some([3.0, 6.0].as_slice()));
        assert!(probes.series(2).unwrap().iter().all(|v| v.is_nan()));
        assert_eq!(probes.series(3), None);
    }
}
