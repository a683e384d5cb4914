use approx::assert_relative_eq;

use vadose_core::{Averaging, BoundaryCondition, Column, Grid, State, Transport};
use vadose_models::{Linear, Material};
use vadose_solvers::transient::implicit::{self, Config};

/// Steady conduction through two layers, one ten times more conductive.
///
/// At steady state the flux is the same through every face, so each face's
/// drop is inversely proportional to its mean conductivity.
#[test]
fn steady_flux_is_continuous_across_layers() {
    let nodes = 9;
    let grid = Grid::uniform(0.0, 0.125, nodes).unwrap();
    let conductivities = [0.2, 2.0];
    let materials: Vec<Material> = conductivities
        .iter()
        .map(|&k| Linear::new(1.0, k).unwrap().into())
        .collect();
    let layout: Vec<usize> = (0..nodes).map(|i| usize::from(i >= 4)).collect();

    let column = Column::layered(
        grid,
        materials,
        layout.clone(),
        BoundaryCondition::value(0.0),
        BoundaryCondition::value(1.0),
    )
    .unwrap()
    .with_transport(Transport {
        averaging: Averaging::Harmonic,
        ..Transport::default()
    });
    let config = Config::new(0.0, 50.0)
        .unwrap()
        .with_step_sizes(0.01, 1e-6, 2.0)
        .unwrap();

    let solution = implicit::solve_unobserved(&column, State::uniform(0.0, nodes), &config).unwrap();

    let face_k: Vec<f64> = layout
        .windows(2)
        .map(|pair| {
            Averaging::Harmonic.mean(conductivities[pair[0]], conductivities[pair[1]])
        })
        .collect();
    let resistance: f64 = face_k.iter().map(|k| 1.0 / k).sum();
    let mut expected = vec![0.0];
    for k in &face_k {
        let last = expected[expected.len() - 1];
        expected.push(last + 1.0 / (k * resistance));
    }

    for (actual, expected) in solution.state.values().iter().zip(&expected) {
        assert_relative_eq!(actual, expected, epsilon = 1e-6);
    }
}

#[test]
fn layout_must_match_grid() {
    let result = Column::layered(
        Grid::uniform(0.0, 1.0, 3).unwrap(),
        vec![Linear::new(1.0, 1.0).unwrap()],
        vec![0, 0],
        BoundaryCondition::NoFlow,
        BoundaryCondition::NoFlow,
    );
    assert!(result.is_err());
}
