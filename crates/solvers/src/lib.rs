//! Solvers for implicit one-dimensional transport.
//!
//! - [`tridiagonal`] — direct solution of the assembled linear systems
//! - [`assembly`] — builds the mass-conservative system for one iteration
//! - [`transient::implicit`] — the adaptive time-step controller

pub mod assembly;
pub mod transient;
pub mod tridiagonal;
