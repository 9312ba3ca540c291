//! Regional fallback imputation for missing per-country scalars.
//!
//! When a country is absent from a reference table (urban ratio, grid CO2
//! factor, appliance consumption, ...) its value is imputed as the mean over
//! the countries sharing its most specific region that has any data,
//! climbing sub → intermediate → main and finally falling back to the global
//! mean over the whole table. The climb is an explicit ordered list of
//! levels, runs at most four averaging passes, and always terminates.

use std::collections::BTreeMap;

use tracing::warn;

use crate::country::{RegionCatalog, RegionLevel, WORLD_REGION_CODE};
use crate::error::ModelError;

/// The level a fallback value was resolved at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackLevel {
    Region(RegionLevel),
    Global,
}

/// An imputed scalar together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub value: f64,
    /// Region code the average was taken over ([`WORLD_REGION_CODE`] for the
    /// global pass).
    pub region: u32,
    pub level: FallbackLevel,
}

/// Arithmetic mean of the table values for `keys`, ignoring keys absent from
/// the table. `None` when no key contributes.
///
/// A 0.0 entry counts as data: "defined" means at least one contributor, not
/// a non-zero mean.
pub fn average<'a>(
    table: &BTreeMap<String, f64>,
    keys: impl IntoIterator<Item = &'a str>,
) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for key in keys {
        if let Some(value) = table.get(key) {
            sum += value;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Imputes a missing scalar for `iso3` by climbing the region hierarchy.
///
/// `value_type` is a human-readable label used in logs and errors only; it
/// never affects the computed value.
///
/// # Errors
///
/// [`ModelError::EmptyReferenceTable`] when even the global pass has no data,
/// i.e. the table is empty. That is a configuration error and must surface
/// loudly rather than yield a placeholder.
pub fn regional_average(
    value_type: &str,
    table: &BTreeMap<String, f64>,
    iso3: &str,
    catalog: &RegionCatalog,
) -> Result<Resolved, ModelError> {
    let regions = catalog.country(iso3).copied().unwrap_or_default();
    for level in RegionLevel::ORDERED {
        let Some(code) = regions.at(level) else {
            continue;
        };
        if let Some(value) = average(table, catalog.members(code)) {
            warn!(
                iso3,
                value_type,
                region = %catalog.region_name(code),
                level = level.label(),
                "using regional average"
            );
            return Ok(Resolved {
                value,
                region: code,
                level: FallbackLevel::Region(level),
            });
        }
    }
    let value = average(table, table.keys().map(String::as_str)).ok_or_else(|| {
        ModelError::EmptyReferenceTable {
            value_type: value_type.to_string(),
        }
    })?;
    warn!(iso3, value_type, "using global average");
    Ok(Resolved {
        value,
        region: WORLD_REGION_CODE,
        level: FallbackLevel::Global,
    })
}

/// Direct table hit for `iso3`, or a regional average with an info-trail
/// entry `"<tag>(<region code>)=<value>"` appended.
///
/// Falls back only when the country is absent from the table; a present 0.0
/// is used as-is. Ratio lookups that treat zero as missing filter before
/// calling (see [`crate::model::population`]).
///
/// # Errors
///
/// Propagates [`ModelError::EmptyReferenceTable`] from the fallback path.
pub fn lookup_or_regional(
    value_type: &str,
    tag: &str,
    table: &BTreeMap<String, f64>,
    iso3: &str,
    catalog: &RegionCatalog,
    info: &mut Vec<String>,
) -> Result<f64, ModelError> {
    if let Some(value) = table.get(iso3) {
        return Ok(*value);
    }
    let resolved = regional_average(value_type, table, iso3, catalog)?;
    info.push(format!("{tag}({:03})={:.4}", resolved.region, resolved.value));
    Ok(resolved.value)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use approx::assert_relative_eq;

    use super::*;
    use crate::country::CountryRegions;

    fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Eastern-Africa-flavored catalog: DJI shares a sub-region with ETH and
    /// COM only, and a main region with everything African.
    fn african_catalog() -> RegionCatalog {
        let mut catalog = RegionCatalog::new();
        let eastern = Some(14);
        let middle = Some(17);
        let southern = Some(18);
        let northern = Some(15);
        let africa = Some(2);
        catalog.insert_country("dji", CountryRegions { sub: eastern, intermediate: None, main: africa });
        catalog.insert_country("eth", CountryRegions { sub: eastern, intermediate: None, main: africa });
        catalog.insert_country("com", CountryRegions { sub: eastern, intermediate: None, main: africa });
        catalog.insert_country("ago", CountryRegions { sub: middle, intermediate: None, main: africa });
        catalog.insert_country("lso", CountryRegions { sub: southern, intermediate: None, main: africa });
        catalog.insert_country("dza", CountryRegions { sub: northern, intermediate: None, main: africa });
        catalog.insert_country("lby", CountryRegions { sub: northern, intermediate: None, main: africa });
        catalog.set_region_name(14, "Eastern Africa");
        catalog.set_region_name(2, "Africa");
        catalog
    }

    #[test]
    fn prefers_most_specific_level_with_data() {
        let catalog = african_catalog();
        let resolved = regional_average(
            "things",
            &table(&[("com", 0.5), ("eth", 0.1), ("ago", 0.9)]),
            "dji",
            &catalog,
        )
        .unwrap();
        // COM and ETH share DJI's sub-region; AGO does not contribute here.
        assert_relative_eq!(resolved.value, 0.3, max_relative = 1e-12);
        assert_eq!(resolved.region, 14);
        assert_eq!(resolved.level, FallbackLevel::Region(RegionLevel::Sub));
    }

    #[test]
    fn climbs_to_main_region_when_no_sibling_has_data() {
        let catalog = african_catalog();
        let resolved = regional_average(
            "things",
            &table(&[("ago", 0.3), ("lso", 0.7), ("dza", 0.7)]),
            "dji",
            &catalog,
        )
        .unwrap();
        assert_relative_eq!(resolved.value, 0.5, max_relative = 1e-12);
        assert_eq!(resolved.region, 2);
        assert_eq!(resolved.level, FallbackLevel::Region(RegionLevel::Main));
    }

    #[test]
    fn main_region_average_skips_countries_outside_region() {
        let catalog = african_catalog();
        // AIA is unknown to the catalog, so only AGO and COM are siblings.
        let resolved = regional_average(
            "things",
            &table(&[("ago", 0.3), ("com", 0.5), ("aia", 0.9)]),
            "lby",
            &catalog,
        )
        .unwrap();
        assert_relative_eq!(resolved.value, 0.4, max_relative = 1e-12);
        assert_eq!(resolved.region, 2);
    }

    #[test]
    fn unknown_country_falls_to_global_average() {
        let catalog = african_catalog();
        let resolved =
            regional_average("things", &table(&[("aaa", 0.2), ("bbb", 0.6)]), "xxx", &catalog)
                .unwrap();
        assert_relative_eq!(resolved.value, 0.4, max_relative = 1e-12);
        assert_eq!(resolved.region, WORLD_REGION_CODE);
        assert_eq!(resolved.level, FallbackLevel::Global);
    }

    #[test]
    fn zero_valued_sibling_counts_as_data() {
        let catalog = african_catalog();
        let resolved =
            regional_average("things", &table(&[("eth", 0.0)]), "dji", &catalog).unwrap();
        assert_eq!(resolved.value, 0.0);
        assert_eq!(resolved.level, FallbackLevel::Region(RegionLevel::Sub));
    }

    #[test]
    fn empty_table_is_configuration_error() {
        let catalog = african_catalog();
        let err = regional_average("things", &BTreeMap::new(), "dji", &catalog);
        assert!(matches!(err, Err(ModelError::EmptyReferenceTable { .. })));
    }

    #[test]
    fn lookup_uses_direct_value_without_info_entry() {
        let catalog = african_catalog();
        let mut info = Vec::new();
        let value = lookup_or_regional(
            "things",
            "th",
            &table(&[("dji", 0.25)]),
            "dji",
            &catalog,
            &mut info,
        )
        .unwrap();
        assert_eq!(value, 0.25);
        assert!(info.is_empty());
    }

    #[test]
    fn lookup_fallback_records_provenance() {
        let catalog = african_catalog();
        let mut info = Vec::new();
        let value = lookup_or_regional(
            "things",
            "th",
            &table(&[("eth", 0.1), ("com", 0.5)]),
            "dji",
            &catalog,
            &mut info,
        )
        .unwrap();
        assert_relative_eq!(value, 0.3, max_relative = 1e-12);
        assert_eq!(info, ["th(014)=0.3000"]);
    }
}
