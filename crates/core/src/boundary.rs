use std::fmt;

use thiserror::Error;

/// A forcing was queried at a time outside the span it defines.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("time {time} is outside the forcing support [{start}, {end}]")]
pub struct TimeOutOfRangeError {
    pub time: f64,
    pub start: f64,
    pub end: f64,
}

/// A time-dependent scalar, such as a prescribed head or an inflow rate.
///
/// Implementations must be deterministic for a given time.
/// A plain `f64` is a constant forcing, and any `Fn(f64) -> f64` closure
/// is a forcing defined for all times.
pub trait Forcing: Send + Sync {
    /// Returns the forcing value at `time`.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeOutOfRangeError`] if `time` is outside the support.
    fn value_at(&self, time: f64) -> Result<f64, TimeOutOfRangeError>;
}

impl Forcing for f64 {
    fn value_at(&self, _time: f64) -> Result<f64, TimeOutOfRangeError> {
        Ok(*self)
    }
}

impl<F> Forcing for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn value_at(&self, time: f64) -> Result<f64, TimeOutOfRangeError> {
        Ok(self(time))
    }
}

/// The kind of constraint a boundary imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// The boundary node's state is prescribed.
    Value,

    /// The flux into the domain through the boundary is prescribed.
    Flux,

    /// Unit-gradient outflow: only gravity drives the diffusive flux.
    FreeDrainage,

    /// Zero flux through the boundary.
    NoFlow,
}

/// The result of evaluating a boundary condition at one time.
///
/// For [`BoundaryKind::FreeDrainage`] and [`BoundaryKind::NoFlow`] the value
/// is always zero; the drainage flux depends on the state and is set up by
/// the system builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub kind: BoundaryKind,
    pub value: f64,
}

/// A constraint applied at one end of the domain.
pub enum BoundaryCondition {
    /// Prescribed state value.
    Value(Box<dyn Forcing>),

    /// Prescribed flux, positive into the domain.
    Flux(Box<dyn Forcing>),

    /// Gravity-driven outflow with zero state gradient.
    FreeDrainage,

    /// Impermeable boundary.
    NoFlow,
}

impl BoundaryCondition {
    /// Creates a prescribed-value boundary.
    pub fn value(forcing: impl Forcing + 'static) -> Self {
        Self::Value(Box::new(forcing))
    }

    /// Creates a prescribed-flux boundary, with positive values flowing into
    /// the domain.
    pub fn flux(forcing: impl Forcing + 'static) -> Self {
        Self::Flux(Box::new(forcing))
    }

    /// Returns the kind of constraint without evaluating any forcing.
    #[must_use]
    pub fn kind(&self) -> BoundaryKind {
        match self {
            Self::Value(_) => BoundaryKind::Value,
            Self::Flux(_) => BoundaryKind::Flux,
            Self::FreeDrainage => BoundaryKind::FreeDrainage,
            Self::NoFlow => BoundaryKind::NoFlow,
        }
    }

    /// Evaluates the boundary at `time`.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeOutOfRangeError`] if the forcing is not defined at
    /// `time`.
    pub fn evaluate(&self, time: f64) -> Result<Evaluation, TimeOutOfRangeError> {
        let value = match self {
            Self::Value(forcing) | Self::Flux(forcing) => forcing.value_at(time)?,
            Self::FreeDrainage | Self::NoFlow => 0.0,
        };
        Ok(Evaluation {
            kind: self.kind(),
            value,
        })
    }
}

impl fmt::Debug for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundaryCondition")
            .field(&self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[derive(Debug)]
    struct Window;

    impl Forcing for Window {
        fn value_at(&self, time: f64) -> Result<f64, TimeOutOfRangeError> {
            if (0.0..=1.0).contains(&time) {
                Ok(2.0 * time)
            } else {
                Err(TimeOutOfRangeError {
                    time,
                    start: 0.0,
                    end: 1.0,
                })
            }
        }
    }

    #[test]
    fn constant_value_boundary() {
        let bc = BoundaryCondition::value(1.0);
        let eval = bc.evaluate(123.0).unwrap();

        assert_eq!(eval.kind, BoundaryKind::Value);
        assert_relative_eq!(eval.value, 1.0);
    }

    #[test]
    fn closure_flux_boundary() {
        let bc = BoundaryCondition::flux(|t: f64| -0.5 * t);
        let eval = bc.evaluate(4.0).unwrap();

        assert_eq!(eval.kind, BoundaryKind::Flux);
        assert_relative_eq!(eval.value, -2.0);
    }

    #[test]
    fn passive_boundaries_evaluate_to_zero() {
        for bc in [BoundaryCondition::NoFlow, BoundaryCondition::FreeDrainage] {
            let eval = bc.evaluate(-1.0).unwrap();
            assert_eq!(eval.kind, bc.kind());
            assert_relative_eq!(eval.value, 0.0);
        }
    }

    #[test]
    fn forcing_errors_propagate() {
        let bc = BoundaryCondition::value(Window);

        assert_relative_eq!(bc.evaluate(0.5).unwrap().value, 1.0);
        assert_eq!(
            bc.evaluate(2.0),
            Err(TimeOutOfRangeError {
                time: 2.0,
                start: 0.0,
                end: 1.0,
            })
        );
    }
}
