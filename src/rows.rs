//! Per-(identifier, tier) result rows.
//!
//! One row is produced per country segment / camp / small-camp group and
//! tier. Rows carry the computed cost figures, the resolved technology for
//! each fuel axis, and an info trail recording every data substitution that
//! went into the numbers, so an unexpected figure can be traced to the
//! imputation that produced it.

use crate::model::types::{Segment, Tier};
use crate::model::{EnergyCosts, OffgridSolid};

/// Result row for an urban, slum, or rural population segment.
///
/// Non-camp rows carry the two grid-dependent axes (on-grid lighting and
/// non-solid cooking) in addition to the off-grid/solid pair; camp rows do
/// not, since camp households are modelled entirely off-grid.
#[derive(Debug, Clone, PartialEq)]
pub struct NonCampRow {
    pub iso3: String,
    pub country_name: String,
    pub segment: Segment,
    /// Rounded population represented by the segment's household count.
    pub population: i64,
    pub tier: Tier,
    /// On-grid lighting for the grid-access share of households.
    pub grid: EnergyCosts,
    /// LPG cooking for the non-solid-access share of households.
    pub nonsolid: EnergyCosts,
    pub offgrid_solid: OffgridSolid,
    /// Comma-joined data-substitution notes, possibly empty.
    pub info: String,
}

/// Result row for one individually-modelled camp.
#[derive(Debug, Clone, PartialEq)]
pub struct CampRow {
    pub iso3: String,
    pub country_name: String,
    pub camp_name: String,
    pub population: i64,
    pub tier: Tier,
    pub offgrid_solid: OffgridSolid,
    pub info: String,
}

/// Result row for a regional group of camps too small to model individually.
#[derive(Debug, Clone, PartialEq)]
pub struct SmallCampRow {
    pub region: String,
    pub population: i64,
    pub tier: Tier,
    pub offgrid_solid: OffgridSolid,
    pub info: String,
}

/// Joins info-trail entries into the row's free-text column.
pub fn join_info(entries: &[String]) -> String {
    entries.join(",")
}

/// Grid CO2 factor for a small-camp group.
///
/// The small-camp reference sheet leaves the factor blank for some regions;
/// a blank is taken as 0 and noted on the info trail rather than rejected,
/// since the groups are aggregates with no country to impute from.
pub fn small_camp_grid_co2(value: Option<f64>, info: &mut Vec<String>) -> f64 {
    match value {
        Some(v) => v,
        None => {
            info.push("Blank elco2".to_string());
            0.0
        }
    }
}
