//! Household energy model for displaced populations.
//!
//! Estimates annual energy expenditure, capital cost, and CO2 emissions for
//! displaced households across population segments (urban, slum, rural, camp,
//! small camp) and improvement tiers (baseline through three targets).
//!
//! The crate is a pure, single-threaded batch calculator: all lookup tables,
//! constants, and displacement records are materialized in memory by the
//! caller before anything runs, and every map iterates in lexicographic key
//! order so results are reproducible. Data retrieval, tabular parsing, CSV
//! output, and CLI orchestration are external collaborators.
//!
//! Missing per-country inputs (ratios, appliance data, grid CO2 factors) are
//! imputed by averaging over the country's region hierarchy via
//! [`regional::regional_average`]; missing structured-key entries (cost
//! tables, technology types) are configuration errors and fail hard.

pub mod camps;
pub mod constants;
pub mod country;
pub mod error;
/// Population segmentation, access splitting, and the cost engine.
pub mod model;
pub mod regional;
pub mod rows;

pub use constants::ModelConstants;
pub use error::ModelError;
pub use model::Model;
pub use model::types::{BaselineTarget, Metric, Segment, TechType, Tier};
