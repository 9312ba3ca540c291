//! Run-wide model constants.
//!
//! Constants arrive from collaborators as a flat string-keyed map (the
//! source is a two-column spreadsheet); [`ModelConstants::from_key_values`]
//! parses that shape. For self-contained runs and tests the same struct also
//! deserializes from TOML with per-field defaults.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ConstantsError;

/// All scalar constants and keyword lists the model needs for one run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConstants {
    /// Persons per household.
    pub household_size: f64,
    /// Share of the rural-classified displaced population folded into the
    /// urban+slum pool before splitting.
    pub population_adjustment_factor: f64,
    /// Grid electricity price (cents per kWh).
    pub electricity_cost: f64,
    /// LPG price for non-camp households (dollars per kg).
    pub cooking_lpg_noncamp_price: f64,
    /// Kerosene CO2 factor (kg CO2 per kg fuel).
    pub kerosene_co2_emissions: f64,
    /// Scaling applied to off-grid households before lighting costs.
    pub lighting_offgrid_scaling_factor: f64,
    /// Scaling applied to no-nonsolid-access households before cooking costs.
    pub cooking_solid_scaling_factor: f64,
    /// Index into the grid-consumption tier table used when a country has no
    /// appliance data.
    pub lighting_grid_tier: u32,
    /// Monthly LPG kg per household used when a country has no LPG data.
    pub cooking_lpg_fallback: f64,
    /// Accommodation-type keywords classifying a record as a camp.
    pub camp_types: Vec<String>,
    /// Accommodation-type keywords classifying a record as non-camp.
    pub non_camp_types: Vec<String>,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            household_size: 5.0,
            population_adjustment_factor: 1.0,
            electricity_cost: 25.0,
            cooking_lpg_noncamp_price: 1.8,
            kerosene_co2_emissions: 2.96,
            lighting_offgrid_scaling_factor: 1.0,
            cooking_solid_scaling_factor: 1.0,
            lighting_grid_tier: 0,
            cooking_lpg_fallback: 4.0,
            camp_types: Vec::new(),
            non_camp_types: Vec::new(),
        }
    }
}

/// Spreadsheet keys for the flat map shape, in struct field order.
const KEY_HOUSEHOLD_SIZE: &str = "Household Size";
const KEY_POPULATION_ADJUSTMENT: &str = "Population Adjustment Factor";
const KEY_ELECTRICITY_COST: &str = "Electricity Cost";
const KEY_LPG_PRICE: &str = "Cooking LPG NonCamp Price";
const KEY_KEROSENE_CO2: &str = "Kerosene CO2 Emissions";
const KEY_LIGHTING_SCALING: &str = "Lighting Offgrid Scaling Factor";
const KEY_COOKING_SCALING: &str = "Cooking Solid Scaling Factor";
const KEY_LIGHTING_GRID_TIER: &str = "Lighting Grid Tier";
const KEY_LPG_FALLBACK: &str = "Cooking LPG Fallback";
const KEY_CAMP_TYPES: &str = "Camp Types";
const KEY_NON_CAMP_TYPES: &str = "Non Camp Types";

impl ModelConstants {
    /// Builds constants from the flat string-keyed map supplied by
    /// collaborators. Unknown keys are ignored; the keyword lists are
    /// comma-separated.
    ///
    /// # Errors
    ///
    /// [`ConstantsError::Missing`] for an absent key,
    /// [`ConstantsError::Invalid`] for an unparseable number.
    pub fn from_key_values(map: &BTreeMap<String, String>) -> Result<Self, ConstantsError> {
        let tier = parse_number(map, KEY_LIGHTING_GRID_TIER)?;
        if tier < 0.0 || tier.fract() != 0.0 {
            return Err(ConstantsError::Invalid {
                key: KEY_LIGHTING_GRID_TIER,
                message: format!("expected a non-negative integer, got {tier}"),
            });
        }
        Ok(Self {
            household_size: parse_number(map, KEY_HOUSEHOLD_SIZE)?,
            population_adjustment_factor: parse_number(map, KEY_POPULATION_ADJUSTMENT)?,
            electricity_cost: parse_number(map, KEY_ELECTRICITY_COST)?,
            cooking_lpg_noncamp_price: parse_number(map, KEY_LPG_PRICE)?,
            kerosene_co2_emissions: parse_number(map, KEY_KEROSENE_CO2)?,
            lighting_offgrid_scaling_factor: parse_number(map, KEY_LIGHTING_SCALING)?,
            cooking_solid_scaling_factor: parse_number(map, KEY_COOKING_SCALING)?,
            lighting_grid_tier: tier as u32,
            cooking_lpg_fallback: parse_number(map, KEY_LPG_FALLBACK)?,
            camp_types: parse_keywords(map, KEY_CAMP_TYPES)?,
            non_camp_types: parse_keywords(map, KEY_NON_CAMP_TYPES)?,
        })
    }

    /// Parses constants from a TOML string.
    ///
    /// # Errors
    ///
    /// [`ConstantsError::Invalid`] if the TOML is malformed or contains
    /// unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConstantsError> {
        toml::from_str(s).map_err(|e| ConstantsError::Invalid {
            key: "toml",
            message: e.to_string(),
        })
    }

    /// Validates bounds and returns every violation found.
    pub fn validate(&self) -> Vec<ConstantsError> {
        let mut errors = Vec::new();
        let mut require_positive = |key: &'static str, value: f64| {
            if value <= 0.0 {
                errors.push(ConstantsError::Invalid {
                    key,
                    message: format!("must be > 0, got {value}"),
                });
            }
        };
        require_positive(KEY_HOUSEHOLD_SIZE, self.household_size);
        require_positive(KEY_LIGHTING_SCALING, self.lighting_offgrid_scaling_factor);
        require_positive(KEY_COOKING_SCALING, self.cooking_solid_scaling_factor);
        if !(0.0..=1.0).contains(&self.population_adjustment_factor) {
            errors.push(ConstantsError::Invalid {
                key: KEY_POPULATION_ADJUSTMENT,
                message: format!("must be in [0, 1], got {}", self.population_adjustment_factor),
            });
        }
        if self.cooking_lpg_fallback < 0.0 {
            errors.push(ConstantsError::Invalid {
                key: KEY_LPG_FALLBACK,
                message: format!("must be >= 0, got {}", self.cooking_lpg_fallback),
            });
        }
        errors
    }
}

fn parse_number(map: &BTreeMap<String, String>, key: &'static str) -> Result<f64, ConstantsError> {
    let raw = map.get(key).ok_or(ConstantsError::Missing { key })?;
    raw.trim().parse().map_err(|_| ConstantsError::Invalid {
        key,
        message: format!("expected a number, got \"{raw}\""),
    })
}

fn parse_keywords(
    map: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<Vec<String>, ConstantsError> {
    let raw = map.get(key).ok_or(ConstantsError::Missing { key })?;
    Ok(raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
