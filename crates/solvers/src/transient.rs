//! Time integration of transport columns.

pub mod implicit;
