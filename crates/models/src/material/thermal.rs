use uom::si::{
    f64::{Length, MassDensity, SpecificHeatCapacity, ThermalConductivity, Velocity},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    velocity::meter_per_second,
};
use vadose_core::{Coefficients, MaterialModel, OutOfRangeError};

use crate::ParameterError;

/// Thermal properties of a soil's solid grains and pore water.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalProperties {
    pub solid_density: MassDensity,
    pub solid_heat_capacity: SpecificHeatCapacity,
    pub water_density: MassDensity,
    pub water_heat_capacity: SpecificHeatCapacity,
    pub dry_conductivity: ThermalConductivity,
    pub saturated_conductivity: ThermalConductivity,
}

impl Default for ThermalProperties {
    /// Quartz-dominated mineral soil with liquid water.
    fn default() -> Self {
        Self {
            solid_density: MassDensity::new::<kilogram_per_cubic_meter>(2650.0),
            solid_heat_capacity: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(800.0),
            water_density: MassDensity::new::<kilogram_per_cubic_meter>(1000.0),
            water_heat_capacity: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4180.0),
            dry_conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(0.25),
            saturated_conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(2.5),
        }
    }
}

impl ThermalProperties {
    /// Returns `ρw·cw` in J/(m³·K).
    ///
    /// Scaling water fluxes in m/s by this value gives the advective heat
    /// fluxes for [`Column::with_face_fluxes`]; a column dispersivity then
    /// adds `ρw·cw·αT·|q|` on every face.
    ///
    /// [`Column::with_face_fluxes`]: vadose_core::Column::with_face_fluxes
    #[must_use]
    pub fn water_volumetric_heat_capacity(&self) -> f64 {
        self.water_density.get::<kilogram_per_cubic_meter>()
            * self.water_heat_capacity.get::<joule_per_kilogram_kelvin>()
    }
}

/// Heat conduction through a soil at fixed water content.
///
/// The state is temperature in kelvin or degrees Celsius; either works since
/// only differences are transported. Coefficients are in SI base units:
///
/// - capacity: `ρs·cs·(1 − θs) + ρw·cw·θ` in J/(m³·K)
/// - conductivity: `λdry + (λsat − λdry)·Se` in W/(m·K)
/// - storage: `capacity·T`
///
/// where `Se = (θ − θr)/(θs − θr)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "ThermalParams")
)]
pub struct Thermal {
    capacity: f64,
    conductivity: f64,
}

impl Thermal {
    /// Creates a thermal material from soil properties and a water content.
    ///
    /// # Errors
    ///
    /// Returns an error if the water contents are inconsistent, if
    /// `water_content` lies outside `[residual, saturated]`, or if any
    /// property is negative or non-finite.
    pub fn new(
        properties: &ThermalProperties,
        residual: f64,
        saturated: f64,
        water_content: f64,
    ) -> Result<Self, ParameterError> {
        ParameterError::water_contents(residual, saturated)?;
        if !(residual..=saturated).contains(&water_content) {
            return Err(ParameterError::WaterContent {
                value: water_content,
                residual,
                saturated,
            });
        }

        let heat = |density: MassDensity, specific: SpecificHeatCapacity, name: &'static str| {
            let rho = ParameterError::non_negative(name, density.get::<kilogram_per_cubic_meter>())?;
            let c = ParameterError::non_negative(
                name,
                specific.get::<joule_per_kilogram_kelvin>(),
            )?;
            Ok::<_, ParameterError>(rho * c)
        };
        let solid = heat(
            properties.solid_density,
            properties.solid_heat_capacity,
            "solid_heat_capacity",
        )?;
        let water = heat(
            properties.water_density,
            properties.water_heat_capacity,
            "water_heat_capacity",
        )?;

        let dry = ParameterError::non_negative(
            "dry_conductivity",
            properties.dry_conductivity.get::<watt_per_meter_kelvin>(),
        )?;
        let wet = ParameterError::non_negative(
            "saturated_conductivity",
            properties.saturated_conductivity.get::<watt_per_meter_kelvin>(),
        )?;
        let se = (water_content - residual) / (saturated - residual);

        Ok(Self {
            capacity: solid * (1.0 - saturated) + water * water_content,
            conductivity: dry + (wet - dry) * se,
        })
    }

    /// Adds thermal dispersion `ρw·cw·α·|q|` for water moving at a uniform
    /// `flux`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dispersivity is negative or either quantity
    /// is non-finite.
    pub fn with_dispersion(
        mut self,
        properties: &ThermalProperties,
        dispersivity: Length,
        flux: Velocity,
    ) -> Result<Self, ParameterError> {
        let alpha = ParameterError::non_negative("dispersivity", dispersivity.get::<meter>())?;
        let q = ParameterError::finite("flux", flux.get::<meter_per_second>())?;
        self.conductivity += properties.water_volumetric_heat_capacity() * alpha * q.abs();
        Ok(self)
    }

    /// Volumetric heat capacity in J/(m³·K).
    #[must_use]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Effective thermal conductivity in W/(m·K).
    #[must_use]
    pub fn conductivity(&self) -> f64 {
        self.conductivity
    }
}

impl MaterialModel for Thermal {
    fn coefficients(&self, value: f64) -> Result<Coefficients, OutOfRangeError> {
        let temperature = OutOfRangeError::check_finite(value)?;
        Ok(Coefficients {
            capacity: self.capacity,
            conductivity: self.conductivity,
            storage: self.capacity * temperature,
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ThermalParams {
    #[serde(default)]
    properties: ThermalProperties,
    residual: f64,
    saturated: f64,
    water_content: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<ThermalParams> for Thermal {
    type Error = ParameterError;

    fn try_from(p: ThermalParams) -> Result<Self, Self::Error> {
        Self::new(&p.properties, p.residual, p.saturated, p.water_content)
    }
}
