//! Assembly of the implicit finite-difference system for one iteration.
//!
//! Each node `i` owns a control volume of width `wᵢ`. With `n` the start of
//! the step, `m` the latest iterate, and `ω` the time weight, node `i`
//! balances
//!
//! ```text
//! wᵢ·[Cᵢᵐ·(uᵢᵐ⁺¹ − uᵢᵐ) + θᵢᵐ − θᵢⁿ] / Δt
//!     = ω·[net inflow(uᵐ⁺¹; Kᵐ) + wᵢ·(s − λ·uᵢᵐ⁺¹ − Sᵢᵐ)]
//!     + (1 − ω)·[net inflow(uⁿ; Kⁿ) + wᵢ·(s − λ·uᵢⁿ − Sᵢⁿ)]
//! ```
//!
//! where `θ` is the material storage, `C` its capacity, `s` the production
//! rate, `λ` the decay rate, and `S` the lagged sink. Tracking `θᵐ − θⁿ`
//! directly (the mixed form) keeps the scheme mass conservative for
//! nonlinear storage; `C` only linearizes the remaining change.
//!
//! Interface conductivities use the column's [`Averaging`] rule plus any
//! mechanical dispersion, and advection is upwinded with each face's own
//! flux. Every interior face adds equal and opposite entries to its two
//! rows, so the flux part of each matrix column sums to zero.
//!
//! [`face_fluxes`] recovers the flux field of a solved level, so a water
//! solution can drive the advection of a solute or heat column.
//!
//! [`Averaging`]: vadose_core::Averaging

use vadose_core::{
    BoundaryKind, Coefficients, Column, Evaluation, MaterialModel, Sources, TimeOutOfRangeError,
    Transport, TridiagonalSystem,
};

/// Everything known about one time level of a step.
///
/// The old level is the accepted state at the start of the step, evaluated
/// at the start time. The iterate level is the latest nonlinear iterate,
/// with boundaries evaluated at the end of the step.
#[derive(Debug, Clone, Copy)]
pub struct Level<'a> {
    pub values: &'a [f64],
    pub coefficients: &'a [Coefficients],
    pub sink: &'a [f64],
    pub lower: Evaluation,
    pub upper: Evaluation,
}

/// Linearized flux through one interior face: `J = α·u[i] + β·u[i+1] + γ`.
#[derive(Debug, Clone, Copy)]
struct Face {
    alpha: f64,
    beta: f64,
    gamma: f64,
}

impl Face {
    fn new(
        transport: &Transport,
        q: f64,
        dz: f64,
        below: &Coefficients,
        above: &Coefficients,
    ) -> Self {
        let k = transport
            .averaging
            .mean(below.conductivity, above.conductivity)
            + transport.dispersivity * q.abs();
        Self {
            alpha: k / dz + q.max(0.0),
            beta: -k / dz + q.min(0.0),
            gamma: -k * transport.gravity,
        }
    }

    fn flux(&self, below: f64, above: f64) -> f64 {
        self.alpha * below + self.beta * above + self.gamma
    }
}

/// Assembles the system whose solution is the next iterate `uᵐ⁺¹`.
///
/// Inputs are only read; a fresh system is returned on every call.
///
/// # Panics
///
/// Panics if any per-node slice in `old` or `iterate` does not have one
/// entry per node, or if `dt` is not positive.
#[must_use]
pub fn assemble<M: MaterialModel>(
    column: &Column<M>,
    dt: f64,
    old: &Level<'_>,
    iterate: &Level<'_>,
) -> TridiagonalSystem {
    let n = column.node_count();
    for level in [old, iterate] {
        assert_eq!(level.values.len(), n, "one value per node");
        assert_eq!(level.coefficients.len(), n, "one coefficient set per node");
        assert_eq!(level.sink.len(), n, "one sink rate per node");
    }
    assert!(dt > 0.0, "step size must be positive");

    let grid = column.grid();
    let transport = column.transport();
    let Sources { production, decay } = *column.sources();
    let w_new = transport.weighting.implicit();
    let w_old = transport.weighting.explicit();

    let mut system = TridiagonalSystem::zeros(n);

    for i in 0..n {
        let width = grid.control_width(i);
        let c = &iterate.coefficients[i];
        let storage_change = c.storage - old.coefficients[i].storage;

        system.add_diagonal(i, width * (c.capacity / dt + w_new * decay));
        system.add_rhs(
            i,
            width
                * ((c.capacity * iterate.values[i] - storage_change) / dt + production
                    - w_old * decay * old.values[i]
                    - (w_new * iterate.sink[i] + w_old * old.sink[i])),
        );
    }

    for f in 0..n - 1 {
        let dz = grid.spacing(f);
        let q = column.advection(f);
        let face = Face::new(
            transport,
            q,
            dz,
            &iterate.coefficients[f],
            &iterate.coefficients[f + 1],
        );

        // Outflow from node f is inflow to node f + 1.
        system.add_diagonal(f, w_new * face.alpha);
        system.add_upper(f, w_new * face.beta);
        system.add_rhs(f, -w_new * face.gamma);
        system.add_lower(f + 1, -w_new * face.alpha);
        system.add_diagonal(f + 1, -w_new * face.beta);
        system.add_rhs(f + 1, w_new * face.gamma);

        if w_old > 0.0 {
            let old_face = Face::new(
                transport,
                q,
                dz,
                &old.coefficients[f],
                &old.coefficients[f + 1],
            );
            let flux = old_face.flux(old.values[f], old.values[f + 1]);
            system.add_rhs(f, -w_old * flux);
            system.add_rhs(f + 1, w_old * flux);
        }
    }

    let lower_q = column.advection(0);
    let upper_q = column.advection(n - 2);
    apply_boundary(&mut system, transport, lower_q, End::Lower, old, iterate);
    apply_boundary(&mut system, transport, upper_q, End::Upper, old, iterate);

    system
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Lower,
    Upper,
}

/// Applies one boundary to its row.
///
/// Fluxes are positive into the domain. Through the lower end that is the
/// `+z` direction and through the upper end the `-z` direction, so free
/// drainage contributes `-K·g` at the lower end and `+K·g` at the upper end.
/// `q` is the advective flux of the face next to the boundary node.
fn apply_boundary(
    system: &mut TridiagonalSystem,
    transport: &Transport,
    q: f64,
    end: End,
    old: &Level<'_>,
    iterate: &Level<'_>,
) {
    let w_new = transport.weighting.implicit();
    let w_old = transport.weighting.explicit();
    let (node, new_bc, old_bc, sign) = match end {
        End::Lower => (0, iterate.lower, old.lower, 1.0),
        End::Upper => (system.len() - 1, iterate.upper, old.upper, -1.0),
    };

    match new_bc.kind {
        BoundaryKind::Value => system.fix(node, new_bc.value),
        BoundaryKind::Flux => {
            // A value-type old level has no flux history; weight the new flux fully.
            let old_flux = if old_bc.kind == BoundaryKind::Flux {
                old_bc.value
            } else {
                new_bc.value
            };
            system.add_rhs(node, w_new * new_bc.value + w_old * old_flux);
        }
        BoundaryKind::FreeDrainage => {
            let gravity_inflow = |k: f64| -sign * k * transport.gravity;

            system.add_rhs(
                node,
                w_new * gravity_inflow(iterate.coefficients[node].conductivity)
                    + w_old * gravity_inflow(old.coefficients[node].conductivity),
            );

            // Zero-gradient advection carries the boundary node's own value.
            system.add_diagonal(node, -sign * w_new * q);
            system.add_rhs(node, sign * w_old * q * old.values[node]);
        }
        BoundaryKind::NoFlow => {}
    }
}

/// Returns the flux through each interior face at one level, positive
/// toward increasing position.
///
/// Face `f` lies between nodes `f` and `f + 1`. For a water column these
/// are the Darcy fluxes `-K·(dh/dz + gravity)`.
///
/// # Panics
///
/// Panics if `values` or `coefficients` does not have one entry per node.
#[must_use]
pub fn face_fluxes<M: MaterialModel>(
    column: &Column<M>,
    values: &[f64],
    coefficients: &[Coefficients],
) -> Vec<f64> {
    let n = column.node_count();
    assert_eq!(values.len(), n, "one value per node");
    assert_eq!(coefficients.len(), n, "one coefficient set per node");

    let grid = column.grid();
    let transport = column.transport();
    (0..n - 1)
        .map(|f| {
            let face = Face::new(
                transport,
                column.advection(f),
                grid.spacing(f),
                &coefficients[f],
                &coefficients[f + 1],
            );
            face.flux(values[f], values[f + 1])
        })
        .collect()
}

/// Evaluates the column's sink at every node, or zeros without a sink.
///
/// # Errors
///
/// Returns a [`TimeOutOfRangeError`] if the sink's forcing is not defined
/// at `time`.
pub fn sink_rates<M: MaterialModel>(
    column: &Column<M>,
    time: f64,
    values: &[f64],
) -> Result<Vec<f64>, TimeOutOfRangeError> {
    match column.sink() {
        Some(sink) => column
            .grid()
            .positions()
            .iter()
            .zip(values)
            .map(|(&z, &u)| sink.rate(time, z, u))
            .collect(),
        None => Ok(vec![0.0; column.node_count()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use vadose_core::{
        Averaging, BoundaryCondition, Grid, OutOfRangeError, Sink, State, TimeWeighting,
    };

    use crate::tridiagonal;

    /// Capacity 1, storage `u`, conductivity `1 + u²`.
    struct Quadratic;

    impl MaterialModel for Quadratic {
        fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
            Ok(Coefficients {
                capacity: 1.0,
                conductivity: 1.0 + value * value,
                storage: value,
            })
        }
    }

    /// Constant capacity 2 and conductivity 0.5.
    struct Constant;

    impl MaterialModel for Constant {
        fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
            Ok(Coefficients {
                capacity: 2.0,
                conductivity: 0.5,
                storage: 2.0 * value,
            })
        }
    }

    struct Uptake;

    impl Sink for Uptake {
        fn rate(&self, _time: f64, position: f64, value: f64) -> Result<f64, TimeOutOfRangeError> {
            Ok(0.1 * position * value)
        }
    }

    fn evaluate(bc: &BoundaryCondition) -> Evaluation {
        bc.evaluate(0.0).unwrap()
    }

    struct Levels {
        values: Vec<f64>,
        coefficients: Vec<Coefficients>,
        sink: Vec<f64>,
    }

    impl Levels {
        fn new<M: MaterialModel>(column: &Column<M>, values: &[f64]) -> Self {
            Self {
                values: values.to_vec(),
                coefficients: column.coefficients(values).unwrap(),
                sink: sink_rates(column, 0.0, values).unwrap(),
            }
        }

        fn level<M: MaterialModel>(&self, column: &Column<M>) -> Level<'_> {
            Level {
                values: &self.values,
                coefficients: &self.coefficients,
                sink: &self.sink,
                lower: evaluate(column.lower()),
                upper: evaluate(column.upper()),
            }
        }
    }

    fn closed_column() -> Column<Quadratic> {
        let grid = Grid::from_positions([0.0, 0.5, 1.5, 2.0, 3.5]).unwrap();
        Column::homogeneous(
            grid,
            Quadratic,
            BoundaryCondition::NoFlow,
            BoundaryCondition::NoFlow,
        )
        .with_transport(Transport {
            gravity: 1.0,
            advection: 0.3,
            dispersivity: 0.0,
            averaging: Averaging::Harmonic,
            weighting: TimeWeighting::CRANK_NICOLSON,
        })
    }

    #[test]
    fn flux_operator_columns_sum_to_zero() {
        let column = closed_column();
        let dt = 0.25;
        let old = Levels::new(&column, &[0.1, 0.4, -0.2, 0.7, 1.0]);
        let iterate = Levels::new(&column, &[0.2, 0.3, 0.1, 0.6, 0.9]);

        let system = assemble(&column, dt, &old.level(&column), &iterate.level(&column));

        for (j, sum) in system.column_sums().into_iter().enumerate() {
            let storage = column.grid().control_width(j) * iterate.coefficients[j].capacity / dt;
            assert_relative_eq!(sum, storage, epsilon = 1e-12);
        }
    }

    #[test]
    fn varying_face_fluxes_keep_columns_balanced() {
        let column = closed_column()
            .with_transport(Transport {
                dispersivity: 0.2,
                ..*closed_column().transport()
            })
            .with_face_fluxes([0.4, -0.2, 0.1, -0.3])
            .unwrap();
        let dt = 0.25;
        let old = Levels::new(&column, &[0.1, 0.4, -0.2, 0.7, 1.0]);
        let iterate = Levels::new(&column, &[0.2, 0.3, 0.1, 0.6, 0.9]);

        let system = assemble(&column, dt, &old.level(&column), &iterate.level(&column));

        for (j, sum) in system.column_sums().into_iter().enumerate() {
            let storage = column.grid().control_width(j) * iterate.coefficients[j].capacity / dt;
            assert_relative_eq!(sum, storage, epsilon = 1e-12);
        }
    }

    #[test]
    fn face_fluxes_follow_darcy_law() {
        let column = Column::homogeneous(
            Grid::uniform(0.0, 1.0, 3).unwrap(),
            Constant,
            BoundaryCondition::NoFlow,
            BoundaryCondition::NoFlow,
        )
        .with_transport(Transport {
            gravity: 1.0,
            ..Transport::default()
        });
        let values = [0.0, 1.0, 2.0];
        let coefficients = column.coefficients(&values).unwrap();

        // J = -0.5·(1 + 1) on both faces.
        let fluxes = face_fluxes(&column, &values, &coefficients);
        assert_eq!(fluxes.len(), 2);
        for q in fluxes {
            assert_relative_eq!(q, -1.0);
        }
    }

    #[test]
    fn dispersion_adds_to_face_conductance() {
        let column = Column::homogeneous(
            Grid::uniform(0.0, 1.0, 3).unwrap(),
            Constant,
            BoundaryCondition::NoFlow,
            BoundaryCondition::NoFlow,
        )
        .with_transport(Transport {
            advection: -0.5,
            dispersivity: 2.0,
            ..Transport::default()
        });
        let values = [1.0, 0.0, 0.0];
        let coefficients = column.coefficients(&values).unwrap();

        // Conductance 0.5 + 2·0.5; the downward flow carries the zero above.
        let fluxes = face_fluxes(&column, &values, &coefficients);
        assert_relative_eq!(fluxes[0], 1.5);
        assert_relative_eq!(fluxes[1], 0.0);
    }

    #[test]
    fn free_drainage_advects_with_adjacent_face_flux() {
        let column = Column::homogeneous(
            Grid::uniform(0.0, 1.0, 3).unwrap(),
            Constant,
            BoundaryCondition::FreeDrainage,
            BoundaryCondition::NoFlow,
        )
        .with_face_fluxes([-0.25, 0.0])
        .unwrap();
        let state = Levels::new(&column, &[1.0; 3]);

        let system = assemble(&column, 1.0, &state.level(&column), &state.level(&column));
        let next = tridiagonal::solve(&system, 1e-14).unwrap();
        let next = Levels::new(&column, &next);

        // Outflow through the lower end is 0.25·u[0] over one unit of time.
        let before = column.content(&state.coefficients);
        let after = column.content(&next.coefficients);
        assert_relative_eq!(before - after, 0.25 * next.values[0], epsilon = 1e-12);
    }

    #[test]
    fn closed_column_conserves_content() {
        let column = closed_column();
        let dt = 0.5;
        let start = Levels::new(&column, &[0.1, 0.4, -0.2, 0.7, 1.0]);
        let initial_content = column.content(&start.coefficients);

        let system = assemble(&column, dt, &start.level(&column), &start.level(&column));
        let next = tridiagonal::solve(&system, 1e-14).unwrap();
        let next = Levels::new(&column, &next);

        assert_relative_eq!(
            column.content(&next.coefficients),
            initial_content,
            epsilon = 1e-12
        );
    }

    #[test]
    fn linear_profile_is_steady() {
        let grid = Grid::uniform(0.0, 0.25, 5).unwrap();
        let column = Column::homogeneous(
            grid,
            Constant,
            BoundaryCondition::value(1.0),
            BoundaryCondition::value(2.0),
        );
        let profile = Levels::new(&column, &[1.0, 1.25, 1.5, 1.75, 2.0]);

        let system = assemble(&column, 10.0, &profile.level(&column), &profile.level(&column));
        let next = tridiagonal::solve(&system, 1e-14).unwrap();

        for (u, expected) in next.iter().zip(&profile.values) {
            assert_relative_eq!(*u, *expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn value_boundary_fixes_row() {
        let grid = Grid::uniform(0.0, 1.0, 3).unwrap();
        let column = Column::homogeneous(
            grid,
            Constant,
            BoundaryCondition::NoFlow,
            BoundaryCondition::value(-3.0),
        );
        let state = Levels::new(&column, &[0.0; 3]);

        let system = assemble(&column, 1.0, &state.level(&column), &state.level(&column));

        assert_relative_eq!(system.lower()[2], 0.0);
        assert_relative_eq!(system.diagonal()[2], 1.0);
        assert_relative_eq!(system.rhs()[2], -3.0);
    }

    #[test]
    fn flux_boundary_adds_inflow_to_rhs() {
        let grid = Grid::uniform(0.0, 1.0, 3).unwrap();
        let build = |lower: BoundaryCondition| {
            let column = Column::homogeneous(grid.clone(), Constant, lower, BoundaryCondition::NoFlow)
                .with_transport(Transport {
                    weighting: TimeWeighting::new(0.75).unwrap(),
                    ..Transport::default()
                });
            let state = Levels::new(&column, &[1.0; 3]);
            assemble(&column, 1.0, &state.level(&column), &state.level(&column))
        };

        let closed = build(BoundaryCondition::NoFlow);
        let fed = build(BoundaryCondition::flux(2.0));

        assert_relative_eq!(fed.rhs()[0] - closed.rhs()[0], 2.0);
        assert_eq!(fed.diagonal(), closed.diagonal());
        assert_eq!(fed.upper(), closed.upper());
    }

    #[test]
    fn free_drainage_releases_gravity_flux() {
        let grid = Grid::uniform(0.0, 1.0, 3).unwrap();
        let column = Column::homogeneous(
            grid,
            Constant,
            BoundaryCondition::FreeDrainage,
            BoundaryCondition::NoFlow,
        )
        .with_transport(Transport {
            gravity: 1.0,
            ..Transport::default()
        });
        let state = Levels::new(&column, &[0.0; 3]);
        let dt = 1.0;

        let system = assemble(&column, dt, &state.level(&column), &state.level(&column));
        let next = tridiagonal::solve(&system, 1e-14).unwrap();
        let next = Levels::new(&column, &next);

        // Only the lower end drains: content drops by K·g·dt = 0.5.
        let before = column.content(&state.coefficients);
        let after = column.content(&next.coefficients);
        assert_relative_eq!(before - after, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn sink_rates_follow_positions() {
        let grid = Grid::uniform(0.0, 1.0, 3).unwrap();
        let column = Column::homogeneous(
            grid,
            Constant,
            BoundaryCondition::NoFlow,
            BoundaryCondition::NoFlow,
        )
        .with_sink(Uptake);
        let state = State::new([2.0, 2.0, 2.0]);

        let rates = sink_rates(&column, 0.0, state.values()).unwrap();
        assert_relative_eq!(rates[0], 0.0);
        assert_relative_eq!(rates[2], 0.4);

        let without = Column::homogeneous(
            Grid::uniform(0.0, 1.0, 3).unwrap(),
            Constant,
            BoundaryCondition::NoFlow,
            BoundaryCondition::NoFlow,
        );
        assert_eq!(sink_rates(&without, 0.0, state.values()).unwrap(), vec![0.0; 3]);
    }
}
