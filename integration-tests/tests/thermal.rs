use approx::assert_relative_eq;

use vadose_core::{BoundaryCondition, Column, Grid, State, TimeWeighting, Transport};
use vadose_models::{Thermal, ThermalProperties};
use vadose_observers::Steady;
use vadose_solvers::transient::implicit::{self, Config, Status};

fn soil() -> Thermal {
    Thermal::new(&ThermalProperties::default(), 0.0, 0.4, 0.2).unwrap()
}

/// A one meter column between 10 °C and 20 °C, in seconds.
fn column(weighting: TimeWeighting) -> Column<Thermal> {
    Column::homogeneous(
        Grid::uniform(0.0, 0.05, 21).unwrap(),
        soil(),
        BoundaryCondition::value(10.0),
        BoundaryCondition::value(20.0),
    )
    .with_transport(Transport {
        weighting,
        ..Transport::default()
    })
}

#[test]
fn conduction_reaches_linear_profile() {
    let config = Config::new(0.0, 2e7)
        .unwrap()
        .with_step_sizes(100.0, 1e-3, 1e5)
        .unwrap();
    let solution = implicit::solve_unobserved(
        &column(TimeWeighting::BACKWARD_EULER),
        State::uniform(10.0, 21),
        &config,
    )
    .unwrap();

    assert_eq!(solution.status, Status::Complete);
    for (i, &t) in solution.state.values().iter().enumerate() {
        assert_relative_eq!(t, 10.0 + 0.5 * i as f64, epsilon = 1e-6);
    }
}

#[test]
fn crank_nicolson_stops_at_steady_state() {
    let initial = State::uniform(10.0, 21);
    let mut steady = Steady::new(1e-9).from_initial(&initial);
    let config = Config::new(0.0, 1e8)
        .unwrap()
        .with_step_sizes(100.0, 1e-3, 2e4)
        .unwrap();

    let solution = implicit::solve(
        &column(TimeWeighting::CRANK_NICOLSON),
        initial,
        &config,
        &mut steady,
    )
    .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert!(steady.reached().is_some_and(|t| t < 1e8));
    assert_relative_eq!(solution.state[10], 15.0, epsilon = 1e-3);
}
