//! Reusable observers for vadose transport solvers.
//!
//! This crate provides [`Observer`] implementations that record or steer a
//! run, and the capability traits they are written against.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for solver-agnostic observers
//!   ([`HasAcceptedStep`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`TimeLevels`] — one summary row per accepted step
//! - [`Probes`] — state values at selected nodes over time
//! - [`Profiles`] — full states at a regular stride of accepted steps
//! - [`Steady`] — stops a run once the state stops changing
//!
//! Each observer can be passed by value or as `&mut`, so its records remain
//! available after the solve.
//!
//! [`Observer`]: vadose_core::Observer
//! [`HasAcceptedStep`]: traits::HasAcceptedStep
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod probes;
mod profiles;
mod steady;
mod time_levels;

pub use probes::Probes;
pub use profiles::Profiles;
pub use steady::Steady;
pub use time_levels::{TimeLevel, TimeLevels};
