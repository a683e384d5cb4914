use crate::TimeOutOfRangeError;

/// A state-dependent volumetric sink, such as root water uptake.
///
/// The rate is the content removed per unit volume per unit time.
/// Solvers lag the sink by one iterate: it is evaluated at the latest known
/// state and treated as a known source term while solving.
pub trait Sink: Send + Sync {
    /// Returns the removal rate at `position` when the local state is `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeOutOfRangeError`] if a time-dependent input driving
    /// the sink is not defined at `time`.
    fn rate(&self, time: f64, position: f64, value: f64) -> Result<f64, TimeOutOfRangeError>;
}
