//! The cost engine: expenditure, capital cost, and CO2 per fuel axis.
//!
//! Four computations cover the energy uses of a household group: on-grid
//! lighting, off-grid lighting, non-solid-fuel cooking (LPG), and solid-fuel
//! cooking. Expenditure and capital figures are reported in $m, CO2 in
//! tonnes per year. Cost-table scalars are monthly fuel dollars, one-off
//! capital dollars, and *annual* CO2 kg per household — except the solid
//! cooking CO2 factor, which the source sheet records monthly and the
//! engine annualizes with a single ×12.

use crate::error::ModelError;
use crate::model::types::{
    BaselineTarget, CostTable, GridDirectEnergy, GridTiers, Metric, TechType, Tier,
    TypeDescriptions,
};
use crate::model::{CAPITAL_DIVISOR, CO2_DIVISOR, EXPENDITURE_DIVISOR, Model};

/// Expenditure and emissions for an axis with no capital component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyCosts {
    /// $m per year.
    pub expenditure: f64,
    /// Tonnes CO2 per year.
    pub co2: f64,
}

/// Full cost triple for an off-grid or solid-fuel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    /// $m per year.
    pub expenditure: f64,
    /// One-off capital cost, $m.
    pub capital: f64,
    /// Tonnes CO2 per year.
    pub co2: f64,
}

/// A costed axis together with its resolved technology.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisResult {
    pub tech: TechType,
    pub description: String,
    pub costs: CostBreakdown,
}

/// Off-grid lighting and solid cooking for one row; either axis is `None`
/// when its technology type is not applicable for the tier/segment, meaning
/// the figures are undefined — not zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffgridSolid {
    pub lighting: Option<AxisResult>,
    pub cooking: Option<AxisResult>,
}

impl Model {
    /// Per-household annual grid consumption: appliance survey data when
    /// nonzero, else the configured access-tier fallback.
    fn kwh_per_hh_per_yr(
        &self,
        grid_tiers: &GridTiers,
        elec_appliances_kwh: f64,
    ) -> Result<f64, ModelError> {
        if elec_appliances_kwh != 0.0 {
            return Ok(elec_appliances_kwh);
        }
        grid_tiers.get(self.constants.lighting_grid_tier)
    }

    /// Costs grid-connected lighting for households with grid access.
    ///
    /// Grid electricity carries no capital cost in this model.
    ///
    /// # Errors
    ///
    /// [`ModelError::MissingGridTier`] when the appliance figure is zero and
    /// the configured fallback tier is not in the table.
    pub fn ongrid_lighting(
        &self,
        hh_grid_access: f64,
        grid_tiers: &GridTiers,
        elec_appliances_kwh: f64,
        grid_co2_factor: f64,
    ) -> Result<EnergyCosts, ModelError> {
        let kwh_per_hh_per_yr = self.kwh_per_hh_per_yr(grid_tiers, elec_appliances_kwh)?;

        // electricity cost is in cents per kWh
        let expenditure_per_hh = self.constants.electricity_cost * kwh_per_hh_per_yr / 100.0;
        let expenditure = hh_grid_access * expenditure_per_hh / EXPENDITURE_DIVISOR;

        let co2_per_hh = grid_co2_factor * kwh_per_hh_per_yr;
        let co2 = hh_grid_access * co2_per_hh / CO2_DIVISOR;

        Ok(EnergyCosts { expenditure, co2 })
    }

    /// Costs off-grid lighting for households without grid access.
    ///
    /// Off-grid technologies may still draw indirect grid energy (e.g.
    /// recharging), accounted through the direct-energy table and the
    /// country's grid CO2 factor.
    ///
    /// # Errors
    ///
    /// Missing cost or direct-energy entries for the technology are data
    /// errors.
    pub fn offgrid_lighting(
        &self,
        category: BaselineTarget,
        hh_offgrid: f64,
        tech: TechType,
        costs: &CostTable,
        direct_energy: &GridDirectEnergy,
        grid_co2_factor: f64,
    ) -> Result<CostBreakdown, ModelError> {
        let scaled_hh = hh_offgrid * self.constants.lighting_offgrid_scaling_factor;

        let expenditure = fuel_expenditure(scaled_hh, costs, category, tech)?;
        let capital = capital_cost(scaled_hh, costs, category, tech)?;
        let co2 = annual_co2(scaled_hh, costs, category, tech)?;
        let grid_co2 =
            scaled_hh / CO2_DIVISOR * grid_co2_factor * direct_energy.get(category, tech)?;

        Ok(CostBreakdown {
            expenditure,
            capital,
            co2: co2 + grid_co2,
        })
    }

    /// Per-household annual LPG kg: survey data when nonzero, else the
    /// configured fallback; both are monthly and annualized here.
    fn kg_per_hh_per_yr(&self, lpg_kg_per_month: f64) -> f64 {
        let kg_per_month = if lpg_kg_per_month != 0.0 {
            lpg_kg_per_month
        } else {
            self.constants.cooking_lpg_fallback
        };
        kg_per_month * 12.0
    }

    /// Costs non-solid-fuel (LPG) cooking for households with access.
    pub fn nonsolid_cooking(&self, hh_nonsolid_access: f64, lpg_kg_per_month: f64) -> EnergyCosts {
        let kg_per_hh_per_yr = self.kg_per_hh_per_yr(lpg_kg_per_month);

        let expenditure_per_hh = self.constants.cooking_lpg_noncamp_price * kg_per_hh_per_yr;
        let expenditure = hh_nonsolid_access * expenditure_per_hh / EXPENDITURE_DIVISOR;

        let co2_per_hh = self.constants.kerosene_co2_emissions * kg_per_hh_per_yr;
        let co2 = hh_nonsolid_access * co2_per_hh / CO2_DIVISOR;

        EnergyCosts { expenditure, co2 }
    }

    /// Costs solid-fuel cooking for households without non-solid access.
    ///
    /// The solid-cooking CO2 factor is recorded monthly in the source sheet,
    /// unlike every other CO2 factor; the ×12 here annualizes it and must be
    /// applied exactly once.
    ///
    /// # Errors
    ///
    /// Missing cost entries for the technology are data errors.
    pub fn solid_cooking(
        &self,
        category: BaselineTarget,
        hh_no_nonsolid_access: f64,
        tech: TechType,
        costs: &CostTable,
    ) -> Result<CostBreakdown, ModelError> {
        let scaled_hh = hh_no_nonsolid_access * self.constants.cooking_solid_scaling_factor;

        let expenditure = fuel_expenditure(scaled_hh, costs, category, tech)?;
        let capital = capital_cost(scaled_hh, costs, category, tech)?;
        let co2 = annual_co2(scaled_hh, costs, category, tech)? * 12.0;

        Ok(CostBreakdown {
            expenditure,
            capital,
            co2,
        })
    }

    /// Costs the off-grid lighting and solid cooking axes of one result row.
    ///
    /// Either technology type may be `None` ("not applicable for this
    /// tier/segment"), leaving that axis undefined while the other is still
    /// computed.
    ///
    /// # Errors
    ///
    /// Missing cost, direct-energy, or description entries are data errors.
    #[allow(clippy::too_many_arguments)]
    pub fn offgrid_solid(
        &self,
        tier: Tier,
        hh_offgrid: f64,
        lighting_tech: Option<TechType>,
        lighting_costs: &CostTable,
        direct_energy: &GridDirectEnergy,
        grid_co2_factor: f64,
        hh_no_nonsolid_access: f64,
        cooking_tech: Option<TechType>,
        cooking_costs: &CostTable,
        lighting_descriptions: &TypeDescriptions,
        cooking_descriptions: &TypeDescriptions,
    ) -> Result<OffgridSolid, ModelError> {
        let category = tier.baseline_target();

        let lighting = match lighting_tech {
            Some(tech) => Some(AxisResult {
                tech,
                description: lighting_descriptions.get(category, tech)?.to_string(),
                costs: self.offgrid_lighting(
                    category,
                    hh_offgrid,
                    tech,
                    lighting_costs,
                    direct_energy,
                    grid_co2_factor,
                )?,
            }),
            None => None,
        };

        let cooking = match cooking_tech {
            Some(tech) => Some(AxisResult {
                tech,
                description: cooking_descriptions.get(category, tech)?.to_string(),
                costs: self.solid_cooking(category, hh_no_nonsolid_access, tech, cooking_costs)?,
            }),
            None => None,
        };

        Ok(OffgridSolid { lighting, cooking })
    }
}

fn fuel_expenditure(
    scaled_hh: f64,
    costs: &CostTable,
    category: BaselineTarget,
    tech: TechType,
) -> Result<f64, ModelError> {
    Ok(scaled_hh / EXPENDITURE_DIVISOR * 12.0 * costs.get(Metric::Fuel, category, tech)?)
}

fn capital_cost(
    scaled_hh: f64,
    costs: &CostTable,
    category: BaselineTarget,
    tech: TechType,
) -> Result<f64, ModelError> {
    Ok(scaled_hh / CAPITAL_DIVISOR * costs.get(Metric::Capital, category, tech)?)
}

fn annual_co2(
    scaled_hh: f64,
    costs: &CostTable,
    category: BaselineTarget,
    tech: TechType,
) -> Result<f64, ModelError> {
    Ok(scaled_hh / CO2_DIVISOR * costs.get(Metric::Co2, category, tech)?)
}
