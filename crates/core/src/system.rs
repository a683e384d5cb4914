use thiserror::Error;

/// A tridiagonal linear system `A·x = rhs`.
///
/// Row `i` reads `lower[i]·x[i-1] + diagonal[i]·x[i] + upper[i]·x[i+1] = rhs[i]`.
/// All four sequences have the node count as length; `lower[0]` and
/// `upper[n-1]` are outside the matrix and always zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalSystem {
    lower: Vec<f64>,
    diagonal: Vec<f64>,
    upper: Vec<f64>,
    rhs: Vec<f64>,
}

/// Errors that can occur when building a [`TridiagonalSystem`] from parts.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SystemShapeError {
    #[error("a system needs at least one row")]
    Empty,

    #[error("coefficient sequences have mismatched lengths")]
    LengthMismatch,

    #[error("lower[0] and upper[n-1] must be zero")]
    OutsideMatrix,
}

impl TridiagonalSystem {
    /// Creates an all-zero system with `n` rows.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diagonal: vec![0.0; n],
            upper: vec![0.0; n],
            rhs: vec![0.0; n],
        }
    }

    /// Creates a system from its four coefficient sequences.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequences are empty, differ in length, or
    /// store nonzero values outside the matrix.
    pub fn from_parts(
        lower: Vec<f64>,
        diagonal: Vec<f64>,
        upper: Vec<f64>,
        rhs: Vec<f64>,
    ) -> Result<Self, SystemShapeError> {
        let n = diagonal.len();
        if n == 0 {
            return Err(SystemShapeError::Empty);
        }
        if lower.len() != n || upper.len() != n || rhs.len() != n {
            return Err(SystemShapeError::LengthMismatch);
        }
        if lower[0] != 0.0 || upper[n - 1] != 0.0 {
            return Err(SystemShapeError::OutsideMatrix);
        }
        Ok(Self {
            lower,
            diagonal,
            upper,
            rhs,
        })
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagonal.len()
    }

    /// Returns `true` if the system has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagonal.is_empty()
    }

    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    #[must_use]
    pub fn diagonal(&self) -> &[f64] {
        &self.diagonal
    }

    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    #[must_use]
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// Adds `value` to the coefficient of `x[i-1]` in row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is zero or out of bounds.
    pub fn add_lower(&mut self, i: usize, value: f64) {
        assert!(i > 0, "row 0 has no lower coefficient");
        self.lower[i] += value;
    }

    /// Adds `value` to the coefficient of `x[i]` in row `i`.
    pub fn add_diagonal(&mut self, i: usize, value: f64) {
        self.diagonal[i] += value;
    }

    /// Adds `value` to the coefficient of `x[i+1]` in row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is the last row or out of bounds.
    pub fn add_upper(&mut self, i: usize, value: f64) {
        assert!(i + 1 < self.len(), "last row has no upper coefficient");
        self.upper[i] += value;
    }

    /// Adds `value` to the right-hand side of row `i`.
    pub fn add_rhs(&mut self, i: usize, value: f64) {
        self.rhs[i] += value;
    }

    /// Replaces row `i` with the identity equation `x[i] = value`.
    pub fn fix(&mut self, i: usize, value: f64) {
        self.lower[i] = 0.0;
        self.diagonal[i] = 1.0;
        self.upper[i] = 0.0;
        self.rhs[i] = value;
    }

    /// Returns `A·x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have one value per row.
    #[must_use]
    pub fn multiply(&self, x: &[f64]) -> Vec<f64> {
        let n = self.len();
        assert_eq!(x.len(), n, "vector length must match the row count");

        (0..n)
            .map(|i| {
                let mut sum = self.diagonal[i] * x[i];
                if i > 0 {
                    sum += self.lower[i] * x[i - 1];
                }
                if i + 1 < n {
                    sum += self.upper[i] * x[i + 1];
                }
                sum
            })
            .collect()
    }

    /// Returns the sum of each matrix column.
    ///
    /// Column `j` collects `upper[j-1]`, `diagonal[j]`, and `lower[j+1]`.
    #[must_use]
    pub fn column_sums(&self) -> Vec<f64> {
        let n = self.len();
        (0..n)
            .map(|j| {
                let mut sum = self.diagonal[j];
                if j > 0 {
                    sum += self.upper[j - 1];
                }
                if j + 1 < n {
                    sum += self.lower[j + 1];
                }
                sum
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn laplacian(n: usize) -> TridiagonalSystem {
        let mut system = TridiagonalSystem::zeros(n);
        for i in 0..n {
            system.add_diagonal(i, 2.0);
            if i > 0 {
                system.add_lower(i, -1.0);
            }
            if i + 1 < n {
                system.add_upper(i, -1.0);
            }
        }
        system
    }

    #[test]
    fn multiply_applies_all_three_diagonals() {
        let system = laplacian(4);
        let ax = system.multiply(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(ax, vec![0.0, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn fix_replaces_row() {
        let mut system = laplacian(3);
        system.add_rhs(1, 7.0);
        system.fix(1, 0.25);

        assert_relative_eq!(system.lower()[1], 0.0);
        assert_relative_eq!(system.diagonal()[1], 1.0);
        assert_relative_eq!(system.upper()[1], 0.0);
        assert_relative_eq!(system.rhs()[1], 0.25);
    }

    #[test]
    fn column_sums_of_laplacian() {
        let sums = laplacian(4).column_sums();
        assert_eq!(sums, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn from_parts_validates_shape() {
        assert_eq!(
            TridiagonalSystem::from_parts(vec![], vec![], vec![], vec![]),
            Err(SystemShapeError::Empty)
        );
        assert_eq!(
            TridiagonalSystem::from_parts(vec![0.0], vec![1.0, 1.0], vec![0.0], vec![0.0]),
            Err(SystemShapeError::LengthMismatch)
        );
        assert_eq!(
            TridiagonalSystem::from_parts(vec![1.0], vec![1.0], vec![0.0], vec![0.0]),
            Err(SystemShapeError::OutsideMatrix)
        );
        assert!(TridiagonalSystem::from_parts(vec![0.0], vec![1.0], vec![0.0], vec![2.0]).is_ok());
    }
}
