use std::fmt;

use ndarray::Array1;
use ninterp::prelude::{Interp1DOwned, Interpolator};
use vadose_core::{Coefficients, MaterialModel, OutOfRangeError};

use crate::SeriesError;

type Interp = Interp1DOwned<f64, ninterp::strategy::Linear>;

/// Piecewise-linear coefficients tabulated against the state.
///
/// Values outside the table are out of range; the table is never
/// extrapolated.
///
/// Storage is interpolated independently of capacity, so a table whose
/// capacity column is not the derivative of its storage column still
/// conserves the tabulated storage exactly. The solver only uses capacity
/// to linearize between iterates.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Table", into = "Table")
)]
pub struct Tabulated {
    table: Table,
    capacity: Interp,
    conductivity: Interp,
    storage: Interp,
}

/// Raw columns of a [`Tabulated`] material.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub values: Vec<f64>,
    pub capacity: Vec<f64>,
    pub conductivity: Vec<f64>,
    pub storage: Vec<f64>,
}

impl Tabulated {
    /// Builds interpolators over a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table has fewer than two rows, if its columns
    /// differ in length, if any entry is not finite, or if `values` is not
    /// strictly increasing.
    pub fn new(table: Table) -> Result<Self, SeriesError> {
        let n = table.values.len();
        if n < 2 {
            return Err(SeriesError::TooShort(n));
        }
        for column in [&table.capacity, &table.conductivity, &table.storage] {
            if column.len() != n {
                return Err(SeriesError::LengthMismatch {
                    expected: n,
                    actual: column.len(),
                });
            }
        }
        let columns = [
            &table.values,
            &table.capacity,
            &table.conductivity,
            &table.storage,
        ];
        for column in columns {
            if let Some(i) = column.iter().position(|v| !v.is_finite()) {
                return Err(SeriesError::NonFinite(i));
            }
        }

        let interp = |f_x: &[f64]| -> Result<Interp, SeriesError> {
            Ok(Interp1DOwned::new(
                Array1::from(table.values.clone()),
                Array1::from(f_x.to_vec()),
                ninterp::strategy::Linear,
                ninterp::interpolator::Extrapolate::Error,
            )?)
        };

        Ok(Self {
            capacity: interp(&table.capacity)?,
            conductivity: interp(&table.conductivity)?,
            storage: interp(&table.storage)?,
            table,
        })
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Returns the closed range of state values covered by the table.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        let values = &self.table.values;
        (values[0], values[values.len() - 1])
    }
}

impl MaterialModel for Tabulated {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        let (min, max) = self.range();
        let value = OutOfRangeError::check(value, min, max)?;
        let at = |interp: &Interp| {
            interp
                .interpolate(&[value])
                .map_err(|_| OutOfRangeError { value, min, max })
        };
        Ok(Coefficients {
            capacity: at(&self.capacity)?,
            conductivity: at(&self.conductivity)?,
            storage: at(&self.storage)?,
        })
    }
}

impl fmt::Debug for Tabulated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tabulated").field(&self.table).finish()
    }
}

impl TryFrom<Table> for Tabulated {
    type Error = SeriesError;

    fn try_from(table: Table) -> Result<Self, Self::Error> {
        Self::new(table)
    }
}

impl From<Tabulated> for Table {
    fn from(tabulated: Tabulated) -> Self {
        tabulated.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn table() -> Table {
        Table {
            values: vec![-10.0, -1.0, 0.0],
            capacity: vec![0.01, 0.05, 0.0],
            conductivity: vec![0.1, 1.0, 2.0],
            storage: vec![0.1, 0.35, 0.4],
        }
    }

    #[test]
    fn interpolates_each_column() {
        let material = Tabulated::new(table()).unwrap();
        let c = material.coefficients(-0.5).unwrap();

        assert_relative_eq!(c.capacity, 0.025, epsilon = 1e-12);
        assert_relative_eq!(c.conductivity, 1.5, epsilon = 1e-12);
        assert_relative_eq!(c.storage, 0.375, epsilon = 1e-12);

        let at_node = material.coefficients(-10.0).unwrap();
        assert_relative_eq!(at_node.storage, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn rejects_values_outside_table() {
        let material = Tabulated::new(table()).unwrap();

        assert_eq!(
            material.coefficients(0.5),
            Err(OutOfRangeError {
                value: 0.5,
                min: -10.0,
                max: 0.0,
            })
        );
        assert!(material.coefficients(f64::NAN).is_err());
    }

    #[test]
    fn validates_table() {
        let short = Table {
            values: vec![0.0],
            capacity: vec![1.0],
            conductivity: vec![1.0],
            storage: vec![0.0],
        };
        assert!(matches!(Tabulated::new(short), Err(SeriesError::TooShort(1))));

        let mut mismatched = table();
        mismatched.storage.pop();
        assert!(matches!(
            Tabulated::new(mismatched),
            Err(SeriesError::LengthMismatch {
                expected: 3,
                actual: 2,
            })
        ));

        let mut unsorted = table();
        unsorted.values = vec![0.0, -1.0, -10.0];
        assert!(matches!(
            Tabulated::new(unsorted),
            Err(SeriesError::Validation(_))
        ));
    }
}
