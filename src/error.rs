//! Crate-level error types.

use thiserror::Error;

use crate::model::types::{BaselineTarget, Metric, Segment, TechType, Tier};

/// Hard failures of the model.
///
/// Per-country data gaps are never errors — they are imputed through
/// [`crate::regional::regional_average`]. Errors here mean the run's
/// configuration or reference data is broken and results would be
/// meaningless.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A reference table had no data at any region level, including global.
    #[error("no data at any region level for {value_type}: reference table is empty")]
    EmptyReferenceTable {
        /// Human-readable name of the value being imputed.
        value_type: String,
    },

    /// A cost table is missing a `(metric, category, type)` entry.
    #[error("missing cost entry: {metric} {category} type {tech}")]
    MissingCostEntry {
        metric: Metric,
        category: BaselineTarget,
        tech: TechType,
    },

    /// The grid direct-energy table is missing a `(category, type)` entry.
    #[error("missing grid direct energy entry: {category} type {tech}")]
    MissingDirectEnergyEntry {
        category: BaselineTarget,
        tech: TechType,
    },

    /// The non-camp technology-type table has no key for a segment/tier.
    #[error("missing technology type entry for {segment} {tier}")]
    MissingTypeEntry { segment: Segment, tier: Tier },

    /// A camp's technology-type configuration has no key for a tier.
    #[error("camp \"{camp}\" has no {axis} entry for {tier}")]
    MissingCampTypeEntry {
        camp: String,
        /// `"lighting off-grid"` or `"cooking solid"`.
        axis: &'static str,
        tier: Tier,
    },

    /// The grid consumption table has no entry for the configured tier index.
    #[error("missing grid consumption entry for tier index {index}")]
    MissingGridTier { index: u32 },

    /// A type-description table is missing a `(category, type)` entry.
    #[error("missing type description: {category} type {tech}")]
    MissingDescription {
        category: BaselineTarget,
        tech: TechType,
    },
}

/// Errors raised while ingesting or validating model constants.
#[derive(Debug, Error)]
pub enum ConstantsError {
    /// A required key was absent from the flat constants map.
    #[error("missing constant \"{key}\"")]
    Missing { key: &'static str },

    /// A constant was present but could not be parsed or violates a bound.
    #[error("constant \"{key}\": {message}")]
    Invalid { key: &'static str, message: String },
}
