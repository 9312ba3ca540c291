//! Country metadata: the three-level administrative region hierarchy.
//!
//! Countries are identified by lowercase ISO3 codes. Each country carries up
//! to three nested region codes (sub-region, intermediate region, main
//! region); the catalog derives the member set of every region code so the
//! fallback imputation in [`crate::regional`] can average over siblings.
//! Member sets iterate in lexicographic ISO3 order, which is load-bearing:
//! reproducibility of the whole run depends on canonical iteration order.

use std::collections::{BTreeMap, BTreeSet};

/// Region code of the "world" sentinel used when imputation falls through to
/// the global average (UN M49 code 001).
pub const WORLD_REGION_CODE: u32 = 1;

/// The region hierarchy level a code belongs to, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLevel {
    Sub,
    Intermediate,
    Main,
}

impl RegionLevel {
    /// Levels in imputation order: most specific to most general.
    pub const ORDERED: [RegionLevel; 3] =
        [RegionLevel::Sub, RegionLevel::Intermediate, RegionLevel::Main];

    /// Lowercase label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            RegionLevel::Sub => "sub",
            RegionLevel::Intermediate => "intermediate",
            RegionLevel::Main => "main",
        }
    }
}

/// A country's region code at each hierarchy level; any level may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountryRegions {
    pub sub: Option<u32>,
    pub intermediate: Option<u32>,
    pub main: Option<u32>,
}

impl CountryRegions {
    /// The code at one level, if the country has one.
    pub fn at(&self, level: RegionLevel) -> Option<u32> {
        match level {
            RegionLevel::Sub => self.sub,
            RegionLevel::Intermediate => self.intermediate,
            RegionLevel::Main => self.main,
        }
    }
}

/// Read-only catalog of country region hierarchies for one run.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    countries: BTreeMap<String, CountryRegions>,
    names: BTreeMap<u32, String>,
    members: BTreeMap<u32, BTreeSet<String>>,
}

impl RegionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a country and files it under each of its region codes.
    pub fn insert_country(&mut self, iso3: impl Into<String>, regions: CountryRegions) {
        let iso3 = iso3.into();
        for level in RegionLevel::ORDERED {
            if let Some(code) = regions.at(level) {
                self.members.entry(code).or_default().insert(iso3.clone());
            }
        }
        self.countries.insert(iso3, regions);
    }

    /// Names a region code for log and info-trail output.
    pub fn set_region_name(&mut self, code: u32, name: impl Into<String>) {
        self.names.insert(code, name.into());
    }

    /// The region hierarchy of a country, if known.
    pub fn country(&self, iso3: &str) -> Option<&CountryRegions> {
        self.countries.get(iso3)
    }

    /// Display name of a region code, falling back to the numeric code.
    pub fn region_name(&self, code: u32) -> String {
        match self.names.get(&code) {
            Some(name) => name.clone(),
            None => format!("{code:03}"),
        }
    }

    /// Countries sharing a region code, in lexicographic ISO3 order.
    pub fn members(&self, code: u32) -> impl Iterator<Item = &str> {
        self.members.get(&code).into_iter().flatten().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_derived_per_level() {
        let mut catalog = RegionCatalog::new();
        catalog.insert_country(
            "dji",
            CountryRegions { sub: Some(14), intermediate: None, main: Some(2) },
        );
        catalog.insert_country(
            "ago",
            CountryRegions { sub: Some(17), intermediate: None, main: Some(2) },
        );

        let main_members: Vec<&str> = catalog.members(2).collect();
        assert_eq!(main_members, ["ago", "dji"]);
        let sub_members: Vec<&str> = catalog.members(14).collect();
        assert_eq!(sub_members, ["dji"]);
        assert_eq!(catalog.members(99).count(), 0);
    }

    #[test]
    fn region_name_falls_back_to_zero_padded_code() {
        let mut catalog = RegionCatalog::new();
        catalog.set_region_name(2, "Africa");
        assert_eq!(catalog.region_name(2), "Africa");
        assert_eq!(catalog.region_name(WORLD_REGION_CODE), "001");
    }

    #[test]
    fn level_order_is_most_specific_first() {
        let labels: Vec<&str> = RegionLevel::ORDERED.iter().map(|l| l.label()).collect();
        assert_eq!(labels, ["sub", "intermediate", "main"]);
    }
}
