//! State-dependent sinks.

mod root_uptake;

pub use root_uptake::{FeddesStress, RootProfile, RootUptake};
