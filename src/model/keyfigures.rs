//! Headline figures accumulated across all baseline rows.
//!
//! Answers the summary questions the per-row output cannot: how much the
//! whole displaced population spends on household energy today, what share
//! cooks on biomass, and what share lights off-grid — overall and for camps
//! alone.

use crate::model::costs::OffgridSolid;
use crate::model::types::Tier;
use crate::model::Model;
use crate::rows::{CampRow, NonCampRow, SmallCampRow};

/// Baseline-tier tallies, threaded by value through row processing.
///
/// Each `add_*` consumes and returns the accumulator, so the flow of totals
/// is explicit at the call site. Rows for target tiers are ignored: the key
/// figures describe current practice, not a scenario.
///
/// Cooking population is bucketed as biomass when the resolved cooking
/// technology's description mentions firewood; lighting population is
/// bucketed as grid when the lighting description mentions the grid. A row
/// whose axis is not applicable contributes no population to that bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyFigures {
    spending: f64,
    biomass: i64,
    nonbiomass: i64,
    grid: i64,
    offgrid: i64,
    camp_biomass: i64,
    camp_nonbiomass: i64,
    camp_grid: i64,
    camp_offgrid: i64,
}

impl KeyFigures {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_noncamp(self, row: &NonCampRow) -> Self {
        if row.tier != Tier::Baseline {
            return self;
        }
        self.add(
            row.population,
            row.grid.expenditure,
            row.nonsolid.expenditure,
            &row.offgrid_solid,
            false,
        )
    }

    #[must_use]
    pub fn add_camp(self, row: &CampRow) -> Self {
        if row.tier != Tier::Baseline {
            return self;
        }
        self.add(row.population, 0.0, 0.0, &row.offgrid_solid, true)
    }

    #[must_use]
    pub fn add_small_camp(self, row: &SmallCampRow) -> Self {
        if row.tier != Tier::Baseline {
            return self;
        }
        self.add(row.population, 0.0, 0.0, &row.offgrid_solid, true)
    }

    fn add(
        mut self,
        population: i64,
        grid_expenditure: f64,
        nonsolid_expenditure: f64,
        offgrid_solid: &OffgridSolid,
        is_camp: bool,
    ) -> Self {
        let mut lighting_expenditure = grid_expenditure;
        let mut cooking_expenditure = nonsolid_expenditure;

        if let Some(lighting) = &offgrid_solid.lighting {
            lighting_expenditure += lighting.costs.expenditure;
            if lighting.description.to_lowercase().contains("grid") {
                self.grid += population;
                self.camp_grid += i64::from(is_camp) * population;
            } else {
                self.offgrid += population;
                self.camp_offgrid += i64::from(is_camp) * population;
            }
        }
        if let Some(cooking) = &offgrid_solid.cooking {
            cooking_expenditure += cooking.costs.expenditure;
            if cooking.description.to_lowercase().contains("firewood") {
                self.biomass += population;
                self.camp_biomass += i64::from(is_camp) * population;
            } else {
                self.nonbiomass += population;
                self.camp_nonbiomass += i64::from(is_camp) * population;
            }
        }

        self.spending += lighting_expenditure + cooking_expenditure;
        self
    }

    /// Total baseline spending in whole dollars, rounded at the $m level
    /// the per-row figures carry.
    pub fn total_spending(&self) -> i64 {
        Model::round_half_up(self.spending) * 1_000_000
    }

    /// Share of the cooking population on biomass, or `None` before any
    /// row with an applicable cooking axis has been added.
    pub fn percentage_biomass(&self) -> Option<f64> {
        ratio(self.biomass, self.nonbiomass)
    }

    pub fn camp_percentage_biomass(&self) -> Option<f64> {
        ratio(self.camp_biomass, self.camp_nonbiomass)
    }

    /// Share of the lighting population off-grid, or `None` before any
    /// row with an applicable lighting axis has been added.
    pub fn percentage_offgrid(&self) -> Option<f64> {
        ratio(self.offgrid, self.grid)
    }

    pub fn camp_percentage_offgrid(&self) -> Option<f64> {
        ratio(self.camp_offgrid, self.camp_grid)
    }
}

fn ratio(part: i64, rest: i64) -> Option<f64> {
    let total = part + rest;
    (total != 0).then(|| part as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::model::costs::{AxisResult, CostBreakdown, EnergyCosts, OffgridSolid};
    use crate::model::types::{Segment, TechType, Tier};
    use crate::rows::{CampRow, NonCampRow, SmallCampRow};

    fn axis(description: &str, expenditure: f64) -> AxisResult {
        AxisResult {
            tech: TechType::new(1).unwrap(),
            description: description.to_string(),
            costs: CostBreakdown {
                expenditure,
                capital: 0.0,
                co2: 0.0,
            },
        }
    }

    fn noncamp_row(population: i64, tier: Tier) -> NonCampRow {
        NonCampRow {
            iso3: "ago".to_string(),
            country_name: "Angola".to_string(),
            segment: Segment::Rural,
            population,
            tier,
            grid: EnergyCosts {
                expenditure: 0.5,
                co2: 0.0,
            },
            nonsolid: EnergyCosts {
                expenditure: 0.25,
                co2: 0.0,
            },
            offgrid_solid: OffgridSolid {
                lighting: Some(axis("Kerosene/candles", 1.0)),
                cooking: Some(axis("Firewood (three-stone fire)", 2.0)),
            },
            info: String::new(),
        }
    }

    fn camp_row(population: i64, lighting_desc: &str, cooking_desc: &str) -> CampRow {
        CampRow {
            iso3: "sdn".to_string(),
            country_name: "Sudan".to_string(),
            camp_name: "Southern Darfur".to_string(),
            population,
            tier: Tier::Baseline,
            offgrid_solid: OffgridSolid {
                lighting: Some(axis(lighting_desc, 1.5)),
                cooking: Some(axis(cooking_desc, 3.0)),
            },
            info: String::new(),
        }
    }

    #[test]
    fn baseline_rows_accumulate_spending_and_populations() {
        let kf = KeyFigures::new().add_noncamp(&noncamp_row(10_000, Tier::Baseline));
        // grid 0.5 + offgrid 1.0 lighting, nonsolid 0.25 + solid 2.0 cooking
        assert_eq!(kf.total_spending(), 4_000_000);
        assert_eq!(kf.percentage_biomass(), Some(1.0));
        assert_eq!(kf.percentage_offgrid(), Some(1.0));
        // nothing was a camp
        assert_eq!(kf.camp_percentage_biomass(), None);
    }

    #[test]
    fn target_rows_are_ignored() {
        let kf = KeyFigures::new()
            .add_noncamp(&noncamp_row(10_000, Tier::Target1))
            .add_noncamp(&noncamp_row(10_000, Tier::Target3));
        assert_eq!(kf, KeyFigures::new());
    }

    #[test]
    fn descriptions_drive_bucketing() {
        let kf = KeyFigures::new()
            .add_camp(&camp_row(6_000, "Grid connection", "LPG stove"))
            .add_camp(&camp_row(4_000, "Solar lantern", "Firewood (improved stove)"));
        assert_relative_eq!(kf.percentage_biomass().unwrap(), 0.4);
        assert_relative_eq!(kf.percentage_offgrid().unwrap(), 0.4);
        assert_relative_eq!(kf.camp_percentage_biomass().unwrap(), 0.4);
        assert_relative_eq!(kf.camp_percentage_offgrid().unwrap(), 0.4);
    }

    #[test]
    fn not_applicable_axis_contributes_no_population() {
        let mut row = camp_row(5_000, "Solar lantern", "Firewood");
        row.offgrid_solid.cooking = None;
        let kf = KeyFigures::new().add_camp(&row);
        assert_eq!(kf.percentage_biomass(), None);
        assert_eq!(kf.percentage_offgrid(), Some(1.0));
        // lighting expenditure still counts
        assert_eq!(kf.total_spending(), 2_000_000);
    }

    #[test]
    fn small_camp_rows_count_as_camps() {
        let row = SmallCampRow {
            region: "Central Africa and the Great Lakes".to_string(),
            population: 2_500,
            tier: Tier::Baseline,
            offgrid_solid: OffgridSolid {
                lighting: Some(axis("Kerosene/candles", 0.1)),
                cooking: Some(axis("Firewood", 0.2)),
            },
            info: String::new(),
        };
        let kf = KeyFigures::new().add_small_camp(&row);
        assert_eq!(kf.camp_percentage_biomass(), Some(1.0));
        assert_eq!(kf.camp_percentage_offgrid(), Some(1.0));
    }

    #[test]
    fn spending_rounds_half_up_at_the_million_level() {
        let mut row = camp_row(1_000, "Solar lantern", "LPG stove");
        row.offgrid_solid.lighting.as_mut().unwrap().costs.expenditure = 1.3;
        row.offgrid_solid.cooking.as_mut().unwrap().costs.expenditure = 0.2;
        let kf = KeyFigures::new().add_camp(&row);
        assert_eq!(kf.total_spending(), 2_000_000);
    }
}
