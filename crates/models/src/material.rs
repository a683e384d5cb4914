//! Constitutive models mapping a state value to transport coefficients.
//!
//! Each model implements [`MaterialModel`]. Use [`Material`] when layers of
//! a column need different models.

mod bounded;
mod brooks_corey;
mod linear;
mod solute;
mod tabulated;
mod thermal;
mod van_genuchten;

pub use bounded::Bounded;
pub use brooks_corey::BrooksCorey;
pub use linear::Linear;
pub use solute::Solute;
pub use tabulated::{Table, Tabulated};
pub use thermal::{Thermal, ThermalProperties};
pub use van_genuchten::VanGenuchten;

use vadose_core::{Coefficients, MaterialModel, OutOfRangeError};

/// Any of the built-in material models.
///
/// Deserialized from a map tagged with a `model` key, for example
/// `{ "model": "linear", "capacity": 1.0, "conductivity": 0.5 }`.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(tag = "model", rename_all = "snake_case")
)]
pub enum Material {
    Linear(Linear),
    VanGenuchten(VanGenuchten),
    BrooksCorey(BrooksCorey),
    Tabulated(Tabulated),
    Thermal(Thermal),
    Solute(Solute),
}

impl MaterialModel for Material {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        match self {
            Self::Linear(m) => m.coefficients(value),
            Self::VanGenuchten(m) => m.coefficients(value),
            Self::BrooksCorey(m) => m.coefficients(value),
            Self::Tabulated(m) => m.coefficients(value),
            Self::Thermal(m) => m.coefficients(value),
            Self::Solute(m) => m.coefficients(value),
        }
    }
}

impl From<Linear> for Material {
    fn from(m: Linear) -> Self {
        Self::Linear(m)
    }
}

impl From<VanGenuchten> for Material {
    fn from(m: VanGenuchten) -> Self {
        Self::VanGenuchten(m)
    }
}

impl From<BrooksCorey> for Material {
    fn from(m: BrooksCorey) -> Self {
        Self::BrooksCorey(m)
    }
}

impl From<Tabulated> for Material {
    fn from(m: Tabulated) -> Self {
        Self::Tabulated(m)
    }
}

impl From<Thermal> for Material {
    fn from(m: Thermal) -> Self {
        Self::Thermal(m)
    }
}

impl From<Solute> for Material {
    fn from(m: Solute) -> Self {
        Self::Solute(m)
    }
}
