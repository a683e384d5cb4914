//! Shared fixtures for the scenario tests.

use vadose_core::{Grid, Transport};
use vadose_models::VanGenuchten;

/// A loam in centimeters and days.
#[must_use]
pub fn loam() -> VanGenuchten {
    VanGenuchten::new(0.078, 0.43, 0.036, 1.56, 24.96).expect("loam parameters are valid")
}

/// A vertical grid from `0` at the bottom to `depth` at the surface.
#[must_use]
pub fn vertical_grid(depth: f64, nodes: usize) -> Grid {
    let spacing = depth / (nodes - 1) as f64;
    Grid::uniform(0.0, spacing, nodes).expect("grid parameters are valid")
}

/// Richards transport with position measured upward.
#[must_use]
pub fn richards() -> Transport {
    Transport {
        gravity: 1.0,
        ..Transport::default()
    }
}

/// Installs a test-friendly `tracing` subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}
