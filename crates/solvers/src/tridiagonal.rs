//! Direct solution of tridiagonal systems.
//!
//! # Algorithm
//!
//! The Thomas algorithm: a forward sweep eliminates the sub-diagonal, then
//! back substitution recovers the solution. Both passes are O(n) and run
//! strictly in row order.
//!
//! No pivoting is performed. The systems assembled for implicit transport
//! steps are diagonally dominant, so a vanishing pivot means the step
//! itself is degenerate. The controller reacts to [`SingularSystemError`]
//! by shrinking the step size.
//!
//! Pivots are tested relative to the largest entry magnitude of their row,
//! so the outcome does not depend on the units of the coefficients.

use thiserror::Error;

use vadose_core::TridiagonalSystem;

/// A pivot fell below the configured fraction of its row's scale during
/// elimination.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("singular system: pivot {pivot:e} at row {row}")]
pub struct SingularSystemError {
    /// Row whose elimination produced the pivot.
    pub row: usize,

    /// The offending pivot value, possibly non-finite.
    pub pivot: f64,
}

/// Solves `system` and returns one value per row.
///
/// # Panics
///
/// Panics if the system has no rows.
///
/// # Errors
///
/// Returns a [`SingularSystemError`] if any pivot is zero, non-finite, or
/// smaller than `pivot_epsilon` times the largest entry magnitude of its
/// row.
pub fn solve(
    system: &TridiagonalSystem,
    pivot_epsilon: f64,
) -> Result<Vec<f64>, SingularSystemError> {
    let mut scratch = vec![0.0; system.len()];
    let mut x = vec![0.0; system.len()];
    solve_in_place(system, pivot_epsilon, &mut scratch, &mut x)?;
    Ok(x)
}

/// Solves `system` into `x`, using `scratch` for the eliminated upper
/// diagonal.
///
/// Repeated solves of same-sized systems can reuse both buffers. On error
/// the contents of `x` are unspecified.
///
/// # Panics
///
/// Panics if the system has no rows, or if either buffer's length differs
/// from the number of rows.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_in_place(
    system: &TridiagonalSystem,
    pivot_epsilon: f64,
    scratch: &mut [f64],
    x: &mut [f64],
) -> Result<(), SingularSystemError> {
    let n = system.len();
    assert!(n > 0, "cannot solve an empty system");
    assert_eq!(scratch.len(), n, "scratch length must match the system");
    assert_eq!(x.len(), n, "solution length must match the system");

    let a = system.lower();
    let b = system.diagonal();
    let c = system.upper();
    let d = system.rhs();
    let c_prime = scratch;

    let check = |row: usize, pivot: f64| {
        let scale = a[row].abs().max(b[row].abs()).max(c[row].abs());
        if pivot.is_finite() && pivot != 0.0 && pivot.abs() >= pivot_epsilon * scale {
            Ok(pivot)
        } else {
            Err(SingularSystemError { row, pivot })
        }
    };

    // Forward sweep; `x` holds the modified right-hand side until back substitution.
    let pivot = check(0, b[0])?;
    c_prime[0] = c[0] / pivot;
    x[0] = d[0] / pivot;

    for i in 1..n {
        let pivot = check(i, b[i] - a[i] * c_prime[i - 1])?;
        c_prime[i] = c[i] / pivot;
        x[i] = (d[i] - a[i] * x[i - 1]) / pivot;
    }

    // Back substitution.
    for i in (0..n - 1).rev() {
        x[i] -= c_prime[i] * x[i + 1];
    }

    Ok(())
}
