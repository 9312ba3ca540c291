//! The estimation model: segmentation, access splitting, and costing.

pub mod costs;
pub mod keyfigures;
pub mod population;
pub mod types;

pub use costs::{AxisResult, CostBreakdown, EnergyCosts, OffgridSolid};
pub use keyfigures::KeyFigures;
pub use population::{HouseholdsBySegment, split_access};

use crate::constants::ModelConstants;

/// Divisor turning per-household dollar figures into $m.
pub(crate) const EXPENDITURE_DIVISOR: f64 = 1_000_000.0;
/// Divisor turning per-household capital dollar figures into $m.
pub(crate) const CAPITAL_DIVISOR: f64 = 1_000_000.0;
/// Divisor turning per-household kg CO2 figures into tonnes.
pub(crate) const CO2_DIVISOR: f64 = 1_000.0;

/// The model facade: run-wide constants plus the calculation methods in
/// [`population`] and [`costs`].
///
/// Stateless apart from the constants — every method is a pure function of
/// its arguments, so one instance can serve any number of countries, camps,
/// and tiers in any order.
#[derive(Debug, Clone)]
pub struct Model {
    pub constants: ModelConstants,
}

impl Model {
    pub fn new(constants: ModelConstants) -> Self {
        Self { constants }
    }

    /// Half-up rounding used for populations and averaged technology types.
    pub fn round_half_up(value: f64) -> i64 {
        (value + 0.5).floor() as i64
    }

    /// Households in a population at the configured household size.
    pub fn household_count(&self, population: f64) -> f64 {
        population / self.constants.household_size
    }

    /// Rounded population represented by a household count.
    pub fn population_from_households(&self, households: f64) -> i64 {
        Self::round_half_up(households * self.constants.household_size)
    }
}
