//! Camp/non-camp classification and reconciliation of displacement records.
//!
//! Raw records pair a location name and a free-text accommodation type with
//! a population count. Classification buckets each record as a named camp, a
//! non-camp population, or excluded, while a parallel aggregate keeps every
//! record exactly once so per-country totals can be reconciled after named
//! camps are matched to their technology configuration. Whatever is not
//! removed from the aggregate is what remains unaccounted for ("extra"
//! camps, costed through tier-level type fallbacks).

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::error::ModelError;
use crate::model::Model;
use crate::model::types::{TechType, Tier};

/// One raw row from the source displacement table.
#[derive(Debug, Clone)]
pub struct CampRecord {
    pub name: String,
    /// Lowercase ISO3 country code.
    pub iso3: String,
    /// Free-text accommodation type; matched case-insensitively.
    pub accommodation_type: String,
    pub population: u64,
}

/// Totals for one named camp, accumulated over repeated records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampTotal {
    pub population: u64,
    pub iso3: String,
    /// The camp-type keyword that matched first.
    pub camp_type: String,
}

/// Caller-supplied corrections: accommodation-type replacements and camps
/// absent from the source data entirely.
#[derive(Debug, Clone, Default)]
pub struct CampOverrides {
    /// Camp name → replacement accommodation type.
    pub accommodation_type: BTreeMap<String, String>,
    /// Camp name → population, appended as synthetic records when the name
    /// was never seen in the source data.
    pub population: BTreeMap<String, u64>,
    /// Camp name → lowercase ISO3, for the synthetic records.
    pub country: BTreeMap<String, String>,
}

/// Nested population totals: `iso3 → accommodation type → camp name → population`.
///
/// The classification aggregate is the reconciliation source of truth: its
/// per-country sum equals the country's total recorded displaced population
/// at ingestion time, and stays consistent as matched entries are removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateBucket {
    countries: BTreeMap<String, BTreeMap<String, BTreeMap<String, u64>>>,
}

impl AggregateBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a population count, accumulating for repeated names.
    pub fn add(&mut self, iso3: &str, accommodation_type: &str, name: &str, population: u64) {
        let camps = self
            .countries
            .entry(iso3.to_string())
            .or_default()
            .entry(accommodation_type.to_string())
            .or_default();
        *camps.entry(name.to_string()).or_insert(0) += population;
    }

    /// The accommodation-type map for one country.
    pub fn country(&self, iso3: &str) -> Option<&BTreeMap<String, BTreeMap<String, u64>>> {
        self.countries.get(iso3)
    }

    /// Countries present in the bucket, in lexicographic order.
    pub fn iso3s(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    /// Removes one camp entry, returning its population if present.
    pub fn remove(&mut self, iso3: &str, accommodation_type: &str, name: &str) -> Option<u64> {
        self.countries
            .get_mut(iso3)?
            .get_mut(accommodation_type)?
            .remove(name)
    }
}

/// Sums all populations recorded for a country across accommodation types
/// and camp names, in lexicographic order. Returns 0 for an unknown country.
///
/// When `remove_from` is given, each summed entry is also deleted from that
/// bucket: summing a matched subset against the reconciliation aggregate
/// leaves exactly the unaccounted-for entries behind.
pub fn sum_population(
    totals: &AggregateBucket,
    iso3: &str,
    mut remove_from: Option<&mut AggregateBucket>,
) -> u64 {
    let Some(accom_types) = totals.country(iso3) else {
        return 0;
    };
    let mut population = 0;
    for (accom_type, camps) in accom_types {
        for (name, pop) in camps {
            population += pop;
            if let Some(bucket) = remove_from.as_deref_mut() {
                bucket.remove(iso3, accom_type, name);
            }
        }
    }
    population
}

/// Output of [`classify`].
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Every record exactly once, keyed under the matched keyword (or the
    /// raw accommodation type when nothing matched).
    pub all_camps: AggregateBucket,
    /// Populations whose accommodation type matched a non-camp keyword.
    pub non_camp: AggregateBucket,
    /// Named camps whose accommodation type matched a camp keyword.
    pub camps: BTreeMap<String, CampTotal>,
    /// Records matching neither keyword set.
    pub excluded: AggregateBucket,
}

/// Whether a location name denotes a population dispersed across a country
/// or territory rather than a specific site.
pub fn is_dispersed_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("dispersed") && (lower.contains("country") || lower.contains("territory"))
}

/// Classifies raw displacement records into camp, non-camp, and excluded
/// buckets, maintaining the reconciliation aggregate.
///
/// Records are processed in stable sorted-by-name order so duplicate-name
/// accumulation and downstream matching are reproducible regardless of the
/// source row order. Keyword matching is substring containment against the
/// lowercased effective accommodation type, first keyword in list order
/// wins, and the two keyword sets are tested independently (a record can
/// contribute to both a named camp and the non-camp totals). Camps listed in
/// the population override but never seen in the records are appended as
/// synthetic records through the same matching steps.
pub fn classify(
    records: &[CampRecord],
    camp_types: &[String],
    non_camp_types: &[String],
    overrides: &CampOverrides,
) -> Classification {
    let mut result = Classification::default();

    let mut order: Vec<&CampRecord> = records.iter().collect();
    order.sort_by(|a, b| a.name.cmp(&b.name));

    for record in order {
        let accommodation_type = effective_accommodation_type(
            &record.name,
            &record.accommodation_type,
            overrides,
        );
        match_record(
            &mut result,
            &record.name,
            &accommodation_type,
            record.population,
            &record.iso3,
            camp_types,
            non_camp_types,
        );
    }

    for (name, population) in &overrides.population {
        if result.camps.contains_key(name) {
            continue;
        }
        let Some(iso3) = overrides.country.get(name) else {
            warn!(name, "population override has no country, skipping");
            continue;
        };
        let Some(accommodation_type) = overrides.accommodation_type.get(name) else {
            warn!(name, "population override has no accommodation type, skipping");
            continue;
        };
        info!(name, iso3, population, "adding camp from override");
        match_record(
            &mut result,
            name,
            &accommodation_type.to_lowercase(),
            *population,
            iso3,
            camp_types,
            non_camp_types,
        );
    }

    result
}

fn effective_accommodation_type(name: &str, raw: &str, overrides: &CampOverrides) -> String {
    match overrides.accommodation_type.get(name) {
        Some(replacement) => {
            info!(name, accommodation_type = %replacement, "overriding accommodation type");
            replacement.to_lowercase()
        }
        None => raw.to_lowercase(),
    }
}

fn match_record(
    result: &mut Classification,
    name: &str,
    accommodation_type: &str,
    population: u64,
    iso3: &str,
    camp_types: &[String],
    non_camp_types: &[String],
) {
    let mut accommodation_type = accommodation_type;
    if is_dispersed_name(name) {
        if let Some(first) = non_camp_types.first() {
            info!(name, "treating dispersed population as non-camp");
            accommodation_type = first;
        }
    }

    let mut found = None;
    for camp_type in camp_types {
        if accommodation_type.contains(camp_type.as_str()) {
            found = Some(camp_type.as_str());
            let entry = result.camps.entry(name.to_string()).or_insert_with(|| CampTotal {
                population: 0,
                iso3: iso3.to_string(),
                camp_type: camp_type.clone(),
            });
            entry.population += population;
            break;
        }
    }
    for non_camp_type in non_camp_types {
        if accommodation_type.contains(non_camp_type.as_str()) {
            found = Some(non_camp_type.as_str());
            result.non_camp.add(iso3, non_camp_type, name, population);
            break;
        }
    }

    match found {
        Some(keyword) => result.all_camps.add(iso3, keyword, name, population),
        None => {
            result.excluded.add(iso3, accommodation_type, name, population);
            result.all_camps.add(iso3, accommodation_type, name, population);
        }
    }
}

/// A named-camp match against the classified camp totals.
#[derive(Debug, Clone, Copy)]
pub struct CampNameMatch<'a> {
    /// The name the camp is recorded under in the source data.
    pub source_name: &'a str,
    pub total: &'a CampTotal,
    /// False when the match came from the first-part heuristic.
    pub exact: bool,
}

/// Finds a configured camp name among the classified camps.
///
/// Exact match first; otherwise the substring before the first `:` in
/// `name` is searched for within every known name in sorted order and the
/// lexicographically first containing name wins. The heuristic is
/// deliberately loose (several candidates can share a prefix) and keeps the
/// deterministic first-match tie-break; expect the occasional mismatch
/// rather than a miss.
pub fn match_camp_name<'a>(
    camps: &'a BTreeMap<String, CampTotal>,
    name: &str,
) -> Option<CampNameMatch<'a>> {
    if let Some((source_name, total)) = camps.get_key_value(name) {
        return Some(CampNameMatch {
            source_name,
            total,
            exact: true,
        });
    }
    let first_part = name.split(':').next().unwrap_or(name).trim();
    for (source_name, total) in camps {
        if source_name.contains(first_part) {
            info!(name, source_name, "matched first part of camp name");
            return Some(CampNameMatch {
                source_name,
                total,
                exact: false,
            });
        }
    }
    None
}

/// Per-camp technology types configured for each tier and fuel axis.
#[derive(Debug, Clone, Default)]
pub struct CampTechTypes {
    pub lighting_offgrid: BTreeMap<Tier, Option<TechType>>,
    pub cooking_solid: BTreeMap<Tier, Option<TechType>>,
}

impl CampTechTypes {
    /// # Errors
    ///
    /// [`ModelError::MissingCampTypeEntry`] when the tier key is absent
    /// (`Ok(None)` means configured as not applicable).
    pub fn lighting_offgrid(&self, camp: &str, tier: Tier) -> Result<Option<TechType>, ModelError> {
        self.lighting_offgrid
            .get(&tier)
            .copied()
            .ok_or_else(|| ModelError::MissingCampTypeEntry {
                camp: camp.to_string(),
                axis: "lighting off-grid",
                tier,
            })
    }

    /// # Errors
    ///
    /// [`ModelError::MissingCampTypeEntry`] when the tier key is absent.
    pub fn cooking_solid(&self, camp: &str, tier: Tier) -> Result<Option<TechType>, ModelError> {
        self.cooking_solid
            .get(&tier)
            .copied()
            .ok_or_else(|| ModelError::MissingCampTypeEntry {
                camp: camp.to_string(),
                axis: "cooking solid",
                tier,
            })
    }
}

/// Technology-type table for named camps (and small-camp groups).
pub type CampTypesTable = BTreeMap<String, CampTechTypes>;

/// Technology types observed on camps successfully matched to configuration,
/// recorded per country and tier. Used to impute types for the extra camps
/// left in the reconciliation aggregate.
#[derive(Debug, Clone, Default)]
pub struct CampTypeObservations {
    lighting: BTreeMap<String, BTreeMap<Tier, BTreeMap<String, Option<TechType>>>>,
    cooking: BTreeMap<String, BTreeMap<Tier, BTreeMap<String, Option<TechType>>>>,
}

impl CampTypeObservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the types a matched camp used at one tier.
    pub fn record(
        &mut self,
        iso3: &str,
        camp: &str,
        tier: Tier,
        lighting_offgrid: Option<TechType>,
        cooking_solid: Option<TechType>,
    ) {
        self.lighting
            .entry(iso3.to_string())
            .or_default()
            .entry(tier)
            .or_default()
            .insert(camp.to_string(), lighting_offgrid);
        self.cooking
            .entry(iso3.to_string())
            .or_default()
            .entry(tier)
            .or_default()
            .insert(camp.to_string(), cooking_solid);
    }

    fn has_country(&self, iso3: &str) -> bool {
        self.lighting.contains_key(iso3)
    }

    fn average_type(
        observations: &BTreeMap<String, BTreeMap<Tier, BTreeMap<String, Option<TechType>>>>,
        iso3: &str,
        tier: Tier,
    ) -> Option<TechType> {
        let camps = observations.get(iso3)?.get(&tier)?;
        let mut sum = 0u64;
        let mut count = 0u64;
        for tech in camps.values().flatten() {
            sum += u64::from(tech.get());
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let rounded = Model::round_half_up(sum as f64 / count as f64);
        TechType::new(rounded as u32)
    }
}

/// Configured per-country technology-type fallbacks for extra camps, used
/// when the country has no matched camps to average over.
#[derive(Debug, Clone, Default)]
pub struct CampTypeFallbacks {
    pub lighting_offgrid: BTreeMap<String, BTreeMap<Tier, Option<TechType>>>,
    pub cooking_solid: BTreeMap<String, BTreeMap<Tier, Option<TechType>>>,
}

/// Where the extra-camp types for a country came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraTypeSource {
    /// Rounded average over the country's matched camps.
    CountryCampAverage,
    /// The configured per-country fallback table.
    ConfiguredFallback,
}

/// Technology types imputed for one extra camp at one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraCampTierTypes {
    pub lighting_offgrid: Option<TechType>,
    pub cooking_solid: Option<TechType>,
}

/// Resolves the per-tier technology types to cost an extra camp with.
///
/// Preference order: average the types of the country's matched camps; else
/// use the configured fallback pair; else `None` — the camp cannot be
/// costed and is reported and skipped by the caller.
pub fn resolve_extra_camp_types(
    iso3: &str,
    observations: &CampTypeObservations,
    fallbacks: &CampTypeFallbacks,
) -> Option<(BTreeMap<Tier, ExtraCampTierTypes>, ExtraTypeSource)> {
    if observations.has_country(iso3) {
        let mut tiers = BTreeMap::new();
        for tier in Tier::ALL {
            tiers.insert(
                tier,
                ExtraCampTierTypes {
                    lighting_offgrid: CampTypeObservations::average_type(
                        &observations.lighting,
                        iso3,
                        tier,
                    ),
                    cooking_solid: CampTypeObservations::average_type(
                        &observations.cooking,
                        iso3,
                        tier,
                    ),
                },
            );
        }
        return Some((tiers, ExtraTypeSource::CountryCampAverage));
    }
    let lighting = fallbacks.lighting_offgrid.get(iso3)?;
    let cooking = fallbacks.cooking_solid.get(iso3);
    let mut tiers = BTreeMap::new();
    for (tier, tech) in lighting {
        tiers.insert(
            *tier,
            ExtraCampTierTypes {
                lighting_offgrid: *tech,
                cooking_solid: cooking.and_then(|c| c.get(tier).copied()).flatten(),
            },
        );
    }
    Some((tiers, ExtraTypeSource::ConfiguredFallback))
}
