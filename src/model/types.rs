//! Core model enums and structured-key lookup tables.
//!
//! The source spreadsheets key everything by formatted strings such as
//! `"Fuel Target Type 3"` or `"Rural Baseline Type"`. Those keys are
//! restructured here into enum tuples so a typo is a compile error and a
//! missing entry is a precise [`ModelError`] instead of a silent miss.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A population sub-group with distinct access ratios and cost profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    Urban,
    Slum,
    Rural,
    Camp,
    SmallCamp,
}

impl Segment {
    /// The three segments produced by splitting a country's displaced total.
    pub const NON_CAMP: [Segment; 3] = [Segment::Urban, Segment::Slum, Segment::Rural];

    /// Whether this segment is one of the per-country non-camp groups.
    pub fn is_non_camp(self) -> bool {
        matches!(self, Segment::Urban | Segment::Slum | Segment::Rural)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Segment::Urban => "Urban",
            Segment::Slum => "Slum",
            Segment::Rural => "Rural",
            Segment::Camp => "Camp",
            Segment::SmallCamp => "Small Camp",
        };
        f.write_str(s)
    }
}

/// A scenario level: current practice or one of three improvement targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Baseline,
    Target1,
    Target2,
    Target3,
}

impl Tier {
    /// All tiers in reporting order.
    pub const ALL: [Tier; 4] = [Tier::Baseline, Tier::Target1, Tier::Target2, Tier::Target3];

    /// The cost-table category this tier is priced under.
    ///
    /// All three targets share cost tables; they differ only in which
    /// technology type each segment resolves to.
    pub fn baseline_target(self) -> BaselineTarget {
        match self {
            Tier::Baseline => BaselineTarget::Baseline,
            Tier::Target1 | Tier::Target2 | Tier::Target3 => BaselineTarget::Target,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Baseline => "Baseline",
            Tier::Target1 => "Target 1",
            Tier::Target2 => "Target 2",
            Tier::Target3 => "Target 3",
        };
        f.write_str(s)
    }
}

/// Cost-table category a [`Tier`] maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaselineTarget {
    Baseline,
    Target,
}

impl fmt::Display for BaselineTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BaselineTarget::Baseline => "Baseline",
            BaselineTarget::Target => "Target",
        };
        f.write_str(s)
    }
}

/// Scalar metric axis of a cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Monthly fuel cost per million households (dollars).
    Fuel,
    /// One-off capital cost per million households (dollars).
    Capital,
    /// CO2 emission factor per thousand households (tonnes).
    Co2,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::Fuel => "Fuel",
            Metric::Capital => "Capital",
            Metric::Co2 => "CO2",
        };
        f.write_str(s)
    }
}

/// A lighting or cooking technology identifier.
///
/// Always positive: a zero or absent type in the source data means "not
/// applicable for this tier/segment" and is represented as `Option::None`,
/// never as a type with zero cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechType(NonZeroU32);

impl TechType {
    /// Builds a technology type from a raw integer; 0 means not applicable.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(TechType)
    }

    /// The raw type number.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TechType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cost scalars keyed by `(metric, category, technology type)`.
///
/// One table exists per fuel axis (lighting off-grid, cooking solid). An
/// absent entry is a data error, not a fallback case: the type tables should
/// never resolve to a technology the cost sheet does not price.
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    values: BTreeMap<(Metric, BaselineTarget, TechType), f64>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one scalar, replacing any previous entry for the key.
    pub fn insert(&mut self, metric: Metric, category: BaselineTarget, tech: TechType, value: f64) {
        self.values.insert((metric, category, tech), value);
    }

    /// Looks up one scalar.
    ///
    /// # Errors
    ///
    /// [`ModelError::MissingCostEntry`] if the key is absent.
    pub fn get(
        &self,
        metric: Metric,
        category: BaselineTarget,
        tech: TechType,
    ) -> Result<f64, ModelError> {
        self.values
            .get(&(metric, category, tech))
            .copied()
            .ok_or(ModelError::MissingCostEntry {
                metric,
                category,
                tech,
            })
    }
}

/// Indirect grid energy drawn by off-grid lighting technologies
/// (kWh per household per year), keyed by `(category, type)`.
#[derive(Debug, Clone, Default)]
pub struct GridDirectEnergy {
    values: BTreeMap<(BaselineTarget, TechType), f64>,
}

impl GridDirectEnergy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: BaselineTarget, tech: TechType, kwh_per_yr: f64) {
        self.values.insert((category, tech), kwh_per_yr);
    }

    /// # Errors
    ///
    /// [`ModelError::MissingDirectEnergyEntry`] if the key is absent.
    pub fn get(&self, category: BaselineTarget, tech: TechType) -> Result<f64, ModelError> {
        self.values
            .get(&(category, tech))
            .copied()
            .ok_or(ModelError::MissingDirectEnergyEntry { category, tech })
    }
}

/// Technology type resolved per `(segment, tier)` for non-camp segments.
///
/// `Ok(None)` means the axis is not applicable for that combination (the
/// source sheet holds a blank or zero); a missing *key* is a configuration
/// error and fails hard.
#[derive(Debug, Clone, Default)]
pub struct SegmentTierTypes {
    values: BTreeMap<(Segment, Tier), Option<TechType>>,
}

impl SegmentTierTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts from a raw type number; 0 becomes "not applicable".
    pub fn insert_raw(&mut self, segment: Segment, tier: Tier, raw: u32) {
        self.values.insert((segment, tier), TechType::new(raw));
    }

    /// # Errors
    ///
    /// [`ModelError::MissingTypeEntry`] if no entry exists for the key.
    pub fn get(&self, segment: Segment, tier: Tier) -> Result<Option<TechType>, ModelError> {
        self.values
            .get(&(segment, tier))
            .copied()
            .ok_or(ModelError::MissingTypeEntry { segment, tier })
    }
}

/// Grid electricity consumption fallback (kWh per household per year) keyed
/// by access-tier index, used when a country has no appliance data.
#[derive(Debug, Clone, Default)]
pub struct GridTiers {
    values: BTreeMap<u32, f64>,
}

impl GridTiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: u32, kwh_per_yr: f64) {
        self.values.insert(index, kwh_per_yr);
    }

    /// # Errors
    ///
    /// [`ModelError::MissingGridTier`] if the index is not configured.
    pub fn get(&self, index: u32) -> Result<f64, ModelError> {
        self.values
            .get(&index)
            .copied()
            .ok_or(ModelError::MissingGridTier { index })
    }
}

/// Human-readable technology descriptions keyed by `(category, type)`.
///
/// Descriptions ride along on result rows and drive the biomass/grid
/// bucketing in [`crate::model::keyfigures`].
#[derive(Debug, Clone, Default)]
pub struct TypeDescriptions {
    values: BTreeMap<(BaselineTarget, TechType), String>,
}

impl TypeDescriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: BaselineTarget, tech: TechType, description: impl Into<String>) {
        self.values.insert((category, tech), description.into());
    }

    /// # Errors
    ///
    /// [`ModelError::MissingDescription`] if the key is absent.
    pub fn get(&self, category: BaselineTarget, tech: TechType) -> Result<&str, ModelError> {
        self.values
            .get(&(category, tech))
            .map(String::as_str)
            .ok_or(ModelError::MissingDescription { category, tech })
    }
}
