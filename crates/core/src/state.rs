use std::ops::Index;

/// The primary variable at every node, ordered by node index.
///
/// Depending on the process being modeled the values are pressure heads,
/// temperatures, or concentrations. A `State` is never mutated in place by
/// the solvers: each accepted time step produces a new `State` that
/// supersedes the previous one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct State(Vec<f64>);

impl State {
    /// Creates a state from per-node values.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self(values.into())
    }

    /// Creates a state with the same value at every node.
    #[must_use]
    pub fn uniform(value: f64, nodes: usize) -> Self {
        Self(vec![value; nodes])
    }

    /// Returns the number of node values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the state holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the node values as a slice.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Returns the value at node `i`, if it exists.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied()
    }

    /// Returns the largest absolute node-wise difference from `other`.
    ///
    /// Only the overlapping prefix is compared when lengths differ.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Consumes the state and returns its values.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for State {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Index<usize> for State {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}
