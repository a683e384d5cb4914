//! Tabulated time-dependent forcings for boundary conditions and sinks.
//!
//! Both forcings are defined only on the span their data covers and return
//! a [`vadose_core::TimeOutOfRangeError`] elsewhere, which halts a run
//! instead of silently extrapolating.

mod step_series;
mod time_series;

pub use step_series::{Step, StepSeries};
pub use time_series::TimeSeries;
