use thiserror::Error;

/// A one-dimensional discretization of the model domain.
///
/// Nodes are ordered by strictly increasing position. Node `0` is the
/// `lower` end of the domain and node `node_count() - 1` is the `upper` end.
/// The spacing between nodes `i` and `i + 1` is `spacing(i)`.
///
/// A grid is immutable once constructed and is shared read-only by every
/// component that works with the domain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct Grid {
    positions: Vec<f64>,
    spacings: Vec<f64>,
}

/// Errors that can occur when constructing a [`Grid`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GridError {
    #[error("a grid needs at least 2 nodes, got {nodes}")]
    TooFewNodes { nodes: usize },

    #[error("node {index} has a non-finite position")]
    NonFinite { index: usize },

    #[error("node {index} at {position} does not follow node {} at {previous}", .index - 1)]
    NonIncreasing {
        index: usize,
        previous: f64,
        position: f64,
    },

    #[error("uniform spacing must be finite and positive, got {0}")]
    InvalidSpacing(f64),
}

impl Grid {
    /// Creates a uniform grid of `nodes` nodes starting at `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if `nodes < 2`, if `spacing` is not finite and
    /// positive, or if `origin` is not finite.
    pub fn uniform(origin: f64, spacing: f64, nodes: usize) -> Result<Self, GridError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(GridError::InvalidSpacing(spacing));
        }
        #[allow(clippy::cast_precision_loss)]
        let positions = (0..nodes)
            .map(|i| origin + spacing * i as f64)
            .collect::<Vec<_>>();
        Self::from_positions(positions)
    }

    /// Creates a grid from an explicit sequence of node positions.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 positions, or if any
    /// position is non-finite or does not strictly exceed its predecessor.
    pub fn from_positions(positions: impl Into<Vec<f64>>) -> Result<Self, GridError> {
        let positions = positions.into();

        if positions.len() < 2 {
            return Err(GridError::TooFewNodes {
                nodes: positions.len(),
            });
        }

        if let Some(index) = positions.iter().position(|z| !z.is_finite()) {
            return Err(GridError::NonFinite { index });
        }

        if let Some(index) = positions.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(GridError::NonIncreasing {
                index: index + 1,
                previous: positions[index],
                position: positions[index + 1],
            });
        }

        let spacings = positions.windows(2).map(|pair| pair[1] - pair[0]).collect();

        Ok(Self {
            positions,
            spacings,
        })
    }

    /// Returns the number of nodes, always at least 2.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the position of node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    #[must_use]
    pub fn position(&self, i: usize) -> f64 {
        self.positions[i]
    }

    /// Returns all node positions in order.
    #[must_use]
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Returns the spacing between nodes `i` and `i + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= node_count() - 1`.
    #[must_use]
    pub fn spacing(&self, i: usize) -> f64 {
        self.spacings[i]
    }

    /// Returns all interval spacings, one fewer than the node count.
    #[must_use]
    pub fn spacings(&self) -> &[f64] {
        &self.spacings
    }

    /// Returns the width of the control volume around node `i`.
    ///
    /// Interior nodes own half of each adjacent interval; the two end nodes
    /// own half of their single interval. The widths sum to [`Grid::length`].
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    #[must_use]
    pub fn control_width(&self, i: usize) -> f64 {
        let below = if i == 0 { 0.0 } else { self.spacings[i - 1] };
        let above = self.spacings.get(i).copied().unwrap_or(0.0);
        0.5 * (below + above)
    }

    /// Returns the distance between the first and last node.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.positions[self.positions.len() - 1] - self.positions[0]
    }
}

impl TryFrom<Vec<f64>> for Grid {
    type Error = GridError;

    fn try_from(positions: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_positions(positions)
    }
}

impl From<Grid> for Vec<f64> {
    fn from(grid: Grid) -> Self {
        grid.positions
    }
}
