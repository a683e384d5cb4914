//! Core types and traits for implicit one-dimensional transport models.
//!
//! This crate defines the shared abstractions that solvers, material
//! models, and observers build on:
//!
//! - [`Grid`] — the immutable spatial discretization
//! - [`State`] — one primary-variable value per node
//! - [`MaterialModel`] — maps a state value to [`Coefficients`]
//! - [`BoundaryCondition`] and [`Forcing`] — time-dependent end constraints
//! - [`Sink`] — state-dependent volumetric removal, such as root uptake
//! - [`Column`] — grid, materials, boundaries, and transport settings
//! - [`TridiagonalSystem`] — the linear system assembled for one iteration
//! - [`Observer`] — receives solver events and optionally returns actions

mod boundary;
mod column;
mod grid;
mod material;
mod observer;
mod scheme;
mod sink;
mod state;
mod system;

pub use boundary::{BoundaryCondition, BoundaryKind, Evaluation, Forcing, TimeOutOfRangeError};
pub use column::{Column, ColumnError, Sources, Transport};
pub use grid::{Grid, GridError};
pub use material::{Coefficients, MaterialModel, OutOfRangeError};
pub use observer::Observer;
pub use scheme::{Averaging, TimeWeighting, WeightingError};
pub use sink::Sink;
pub use state::State;
pub use system::{SystemShapeError, TridiagonalSystem};
