use thiserror::Error;

use crate::{
    Averaging, BoundaryCondition, Coefficients, Grid, MaterialModel, OutOfRangeError, Sink,
    TimeWeighting,
};

/// Transport settings shared by every node of a column.
///
/// The flux through the interface between nodes `i` and `i + 1` is
///
/// ```text
/// J = -(K + dispersivity·|q|)·((u[i+1] - u[i]) / dz + gravity) + q·u_upwind
/// ```
///
/// positive toward increasing position, where `K` is the averaged node
/// conductivity and `q` the face's advective flux. `q` is `advection` on
/// every face unless the column carries a per-face field
/// (see [`Column::with_face_fluxes`]).
///
/// For water flow with position measured upward, `gravity` is `cos(α)` of
/// the column inclination; heat and solute transport use zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Transport {
    pub gravity: f64,
    pub advection: f64,

    /// Mechanical dispersivity, added to each face's conductance in
    /// proportion to `|q|`.
    pub dispersivity: f64,

    pub averaging: Averaging,
    pub weighting: TimeWeighting,
}

/// Uniform volumetric sources.
///
/// `production` adds content at a constant rate per unit volume;
/// `decay` removes content at `decay·u` per unit volume (first order).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Sources {
    pub production: f64,
    pub decay: f64,
}

/// Errors that can occur when assembling a [`Column`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ColumnError {
    #[error("a column needs at least one material")]
    NoMaterials,

    #[error("layout has {layout} entries but the grid has {nodes} nodes")]
    LayoutLength { layout: usize, nodes: usize },

    #[error("node {node} refers to material {material}, but only {count} are defined")]
    UnknownMaterial {
        node: usize,
        material: usize,
        count: usize,
    },

    #[error("{fluxes} face fluxes given but the grid has {faces} interior faces")]
    FaceFluxLength { fluxes: usize, faces: usize },

    #[error("flux through face {face} is not finite")]
    NonFiniteFlux { face: usize },
}

/// A discretized one-dimensional domain with its materials and boundaries.
///
/// Materials are assigned to nodes through a layout of indices, so a
/// layered profile stores each distinct material once.
#[derive(Debug)]
pub struct Column<M> {
    grid: Grid,
    materials: Vec<M>,
    layout: Vec<usize>,
    lower: BoundaryCondition,
    upper: BoundaryCondition,
    transport: Transport,
    face_fluxes: Option<Vec<f64>>,
    sources: Sources,
    sink: Option<SinkBox>,
}

struct SinkBox(Box<dyn Sink>);

impl std::fmt::Debug for SinkBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Sink")
    }
}

impl<M: MaterialModel> Column<M> {
    /// Creates a column with one material at every node.
    #[must_use]
    pub fn homogeneous(
        grid: Grid,
        material: M,
        lower: BoundaryCondition,
        upper: BoundaryCondition,
    ) -> Self {
        let layout = vec![0; grid.node_count()];
        Self {
            grid,
            materials: vec![material],
            layout,
            lower,
            upper,
            transport: Transport::default(),
            face_fluxes: None,
            sources: Sources::default(),
            sink: None,
        }
    }

    /// Creates a layered column where node `i` uses `materials[layout[i]]`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no materials, if the layout length
    /// differs from the node count, or if an index is out of bounds.
    pub fn layered(
        grid: Grid,
        materials: Vec<M>,
        layout: Vec<usize>,
        lower: BoundaryCondition,
        upper: BoundaryCondition,
    ) -> Result<Self, ColumnError> {
        if materials.is_empty() {
            return Err(ColumnError::NoMaterials);
        }
        if layout.len() != grid.node_count() {
            return Err(ColumnError::LayoutLength {
                layout: layout.len(),
                nodes: grid.node_count(),
            });
        }
        if let Some((node, &material)) = layout
            .iter()
            .enumerate()
            .find(|&(_, &m)| m >= materials.len())
        {
            return Err(ColumnError::UnknownMaterial {
                node,
                material,
                count: materials.len(),
            });
        }

        Ok(Self {
            grid,
            materials,
            layout,
            lower,
            upper,
            transport: Transport::default(),
            face_fluxes: None,
            sources: Sources::default(),
            sink: None,
        })
    }

    /// Sets the transport settings.
    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Sets a per-face advective flux, replacing the uniform
    /// [`Transport::advection`].
    ///
    /// Face `f` lies between nodes `f` and `f + 1`. A free-drainage
    /// boundary advects with the flux of its adjacent face.
    ///
    /// # Errors
    ///
    /// Returns an error unless there is one finite flux per interior face.
    pub fn with_face_fluxes(mut self, fluxes: impl Into<Vec<f64>>) -> Result<Self, ColumnError> {
        let fluxes = fluxes.into();
        let faces = self.node_count() - 1;
        if fluxes.len() != faces {
            return Err(ColumnError::FaceFluxLength {
                fluxes: fluxes.len(),
                faces,
            });
        }
        if let Some(face) = fluxes.iter().position(|q| !q.is_finite()) {
            return Err(ColumnError::NonFiniteFlux { face });
        }
        self.face_fluxes = Some(fluxes);
        Ok(self)
    }

    /// Sets the uniform volumetric sources.
    #[must_use]
    pub fn with_sources(mut self, sources: Sources) -> Self {
        self.sources = sources;
        self
    }

    /// Adds a state-dependent sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Some(SinkBox(Box::new(sink)));
        self
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.grid.node_count()
    }

    /// Returns the material assigned to `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[must_use]
    pub fn material(&self, node: usize) -> &M {
        &self.materials[self.layout[node]]
    }

    /// Returns the boundary at node `0`.
    #[must_use]
    pub fn lower(&self) -> &BoundaryCondition {
        &self.lower
    }

    /// Returns the boundary at the last node.
    #[must_use]
    pub fn upper(&self) -> &BoundaryCondition {
        &self.upper
    }

    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Returns the advective flux through face `face`.
    ///
    /// # Panics
    ///
    /// Panics if a per-face field is set and `face` is out of bounds.
    #[must_use]
    pub fn advection(&self, face: usize) -> f64 {
        self.face_fluxes
            .as_ref()
            .map_or(self.transport.advection, |fluxes| fluxes[face])
    }

    #[must_use]
    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Returns the sink, if one is configured.
    #[must_use]
    pub fn sink(&self) -> Option<&dyn Sink> {
        self.sink.as_ref().map(|sink| sink.0.as_ref())
    }

    /// Evaluates every node's material at the given state values.
    ///
    /// With the `parallel` feature, nodes are evaluated concurrently; the
    /// call returns only after every node is done.
    ///
    /// # Errors
    ///
    /// Returns an [`OutOfRangeError`] if any node's value is outside its
    /// material's valid range.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold one value per node.
    pub fn coefficients(&self, values: &[f64]) -> Result<Vec<Coefficients>, OutOfRangeError> {
        assert_eq!(values.len(), self.node_count(), "one value per node");

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            values
                .par_iter()
                .enumerate()
                .map(|(i, &u)| self.material(i).coefficients(u))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            values
                .iter()
                .enumerate()
                .map(|(i, &u)| self.material(i).coefficients(u))
                .collect()
        }
    }

    /// Returns the total content `Σ wᵢ·storageᵢ` over all control volumes.
    ///
    /// # Panics
    ///
    /// Panics if `coefficients` does not hold one entry per node.
    #[must_use]
    pub fn content(&self, coefficients: &[Coefficients]) -> f64 {
        assert_eq!(coefficients.len(), self.node_count(), "one entry per node");
        coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| self.grid.control_width(i) * c.storage)
            .sum()
    }
}
