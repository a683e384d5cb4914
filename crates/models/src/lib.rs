//! Constitutive models, forcings, and sinks for vadose zone transport.
//!
//! Materials implement [`vadose_core::MaterialModel`], forcings implement
//! [`vadose_core::Forcing`], and sinks implement [`vadose_core::Sink`], so
//! everything here plugs directly into a [`vadose_core::Column`].

mod error;

pub mod forcing;
pub mod material;
pub mod sink;

pub use error::{ParameterError, SeriesError};
pub use forcing::{Step, StepSeries, TimeSeries};
pub use material::{
    Bounded, BrooksCorey, Linear, Material, Solute, Table, Tabulated, Thermal,
    ThermalProperties, VanGenuchten,
};
pub use sink::{FeddesStress, RootProfile, RootUptake};
