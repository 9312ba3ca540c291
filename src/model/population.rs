//! Splitting displaced populations into segments and access groups.

use std::collections::BTreeMap;

use crate::country::RegionCatalog;
use crate::error::ModelError;
use crate::model::Model;
use crate::regional::regional_average;

/// Household counts per non-camp segment for one country.
///
/// The counts are fractional by design; rounding happens only when a
/// population figure is reported back out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseholdsBySegment {
    pub urban: f64,
    pub slum: f64,
    pub rural: f64,
}

impl Model {
    /// Splits a country's total displaced population into urban, slum, and
    /// rural household counts.
    ///
    /// The urban ratio is blended with the population adjustment factor
    /// (displaced populations skew more urban than the national ratio), the
    /// remainder is rural, and the slum share is carved out of the urban
    /// pool. Ratios missing from the tables — or recorded as 0, which the
    /// source data uses interchangeably with missing — are imputed
    /// regionally, appending an info-trail entry per imputation.
    ///
    /// # Errors
    ///
    /// [`ModelError::EmptyReferenceTable`] when a ratio needs imputing and
    /// its table is empty (a configuration error).
    pub fn split_population(
        &self,
        iso3: &str,
        displaced_population: f64,
        urban_ratios: &BTreeMap<String, f64>,
        slum_ratios: &BTreeMap<String, f64>,
        catalog: &RegionCatalog,
        info: &mut Vec<String>,
    ) -> Result<HouseholdsBySegment, ModelError> {
        let urban_ratio =
            ratio_or_regional("Urban ratio", "ur", urban_ratios, iso3, catalog, info)?;
        let combined_urban_ratio =
            (1.0 - urban_ratio) * self.constants.population_adjustment_factor + urban_ratio;
        let urban_displaced = displaced_population * combined_urban_ratio;
        let rural_displaced = displaced_population - urban_displaced;

        let slum_ratio = ratio_or_regional("Slum ratio", "sr", slum_ratios, iso3, catalog, info)?;
        let slum_displaced = urban_displaced * slum_ratio;
        let urban_minus_slum_displaced = urban_displaced - slum_displaced;

        Ok(HouseholdsBySegment {
            urban: self.household_count(urban_minus_slum_displaced),
            slum: self.household_count(slum_displaced),
            rural: self.household_count(rural_displaced),
        })
    }
}

/// Ratio lookup treating a present-but-zero entry as missing, since the
/// source ratio sheets use 0 for "no data".
fn ratio_or_regional(
    value_type: &str,
    tag: &str,
    table: &BTreeMap<String, f64>,
    iso3: &str,
    catalog: &RegionCatalog,
    info: &mut Vec<String>,
) -> Result<f64, ModelError> {
    if let Some(ratio) = table.get(iso3).copied().filter(|r| *r != 0.0) {
        return Ok(ratio);
    }
    let resolved = regional_average(value_type, table, iso3, catalog)?;
    info.push(format!("{tag}({:03})={:.4}", resolved.region, resolved.value));
    Ok(resolved.value)
}

/// Splits a household count by an access ratio into (access, no access).
///
/// Pure and total; a ratio outside `[0, 1]` is a caller data-quality issue
/// and propagates transparently.
pub fn split_access(households: f64, ratio: f64) -> (f64, f64) {
    let access = households * ratio;
    (access, households - access)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::ModelConstants;
    use crate::country::{CountryRegions, RegionCatalog};

    fn reference_model() -> Model {
        let mut constants = ModelConstants::default();
        constants.population_adjustment_factor = 0.721_683_362_2;
        constants.household_size = 5.0;
        Model::new(constants)
    }

    fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn reference_country_split() {
        let model = reference_model();
        let mut info = Vec::new();
        let hh = model
            .split_population(
                "ago",
                59_970.0,
                &table(&[("ago", 0.58379)]),
                &table(&[("ago", 0.658)]),
                &RegionCatalog::new(),
                &mut info,
            )
            .unwrap();
        assert_relative_eq!(hh.urban, 3626.785859192263, max_relative = 1e-10);
        assert_relative_eq!(hh.slum, 6977.851155989793, max_relative = 1e-10);
        assert_relative_eq!(hh.rural, 1389.3629848179437, max_relative = 1e-10);
        assert!(info.is_empty());
    }

    #[test]
    fn segment_households_reassemble_to_total() {
        let model = reference_model();
        let mut info = Vec::new();
        let total = 123_456.0;
        let hh = model
            .split_population(
                "ago",
                total,
                &table(&[("ago", 0.58379)]),
                &table(&[("ago", 0.658)]),
                &RegionCatalog::new(),
                &mut info,
            )
            .unwrap();
        let hh_size = model.constants.household_size;
        let reassembled = (hh.urban + hh.slum + hh.rural) * hh_size;
        assert_relative_eq!(reassembled, total, max_relative = 1e-12);
    }

    #[test]
    fn missing_ratio_imputed_regionally_with_info_entry() {
        let model = reference_model();
        let mut catalog = RegionCatalog::new();
        catalog.insert_country(
            "dji",
            CountryRegions { sub: Some(14), intermediate: None, main: Some(2) },
        );
        catalog.insert_country(
            "eth",
            CountryRegions { sub: Some(14), intermediate: None, main: Some(2) },
        );
        let mut info = Vec::new();
        let hh = model
            .split_population(
                "dji",
                1_000.0,
                &table(&[("eth", 0.4)]),
                &table(&[("dji", 0.5)]),
                &catalog,
                &mut info,
            )
            .unwrap();
        assert!(hh.urban > 0.0 && hh.rural > 0.0);
        assert_eq!(info, ["ur(014)=0.4000"]);
    }

    #[test]
    fn zero_ratio_is_treated_as_missing() {
        let model = reference_model();
        let mut catalog = RegionCatalog::new();
        catalog.insert_country(
            "dji",
            CountryRegions { sub: Some(14), intermediate: None, main: None },
        );
        catalog.insert_country(
            "eth",
            CountryRegions { sub: Some(14), intermediate: None, main: None },
        );
        let mut info = Vec::new();
        let urban = table(&[("dji", 0.0), ("eth", 0.6)]);
        let hh = model
            .split_population("dji", 1_000.0, &urban, &table(&[("dji", 0.5)]), &catalog, &mut info)
            .unwrap();
        // imputed from ETH, not taken as a 0.0 urban share
        assert!(hh.urban > 0.0);
        assert_eq!(info, ["ur(014)=0.6000"]);
    }

    #[test]
    fn empty_ratio_table_is_loud() {
        let model = reference_model();
        let mut info = Vec::new();
        let err = model.split_population(
            "ago",
            59_970.0,
            &BTreeMap::new(),
            &table(&[("ago", 0.658)]),
            &RegionCatalog::new(),
            &mut info,
        );
        assert!(matches!(err, Err(ModelError::EmptyReferenceTable { .. })));
    }

    #[test]
    fn access_split_reference_values() {
        let (access, no_access) = split_access(1389.3629848179437, 0.055);
        assert_relative_eq!(access, 76.4149641649869, max_relative = 1e-10);
        assert_relative_eq!(no_access, 1312.9480206529568, max_relative = 1e-10);
    }

    #[test]
    fn access_split_is_complementary() {
        for &(n, r) in &[(0.0, 0.5), (10.0, 0.0), (10.0, 1.0), (250.5, 0.31)] {
            let (access, no_access) = split_access(n, r);
            assert_relative_eq!(access + no_access, n, max_relative = 1e-12);
            assert_relative_eq!(access, n * r, max_relative = 1e-12);
        }
    }
}
