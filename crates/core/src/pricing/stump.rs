use rust_decimal::Decimal;

use crate::domain::workload::Stump;
use crate::errors::PricingError;
use crate::pricing::settings::StumpScoreWeights;
use crate::pricing::{add, multiply, require_non_negative};

/// Difficulty score for one stump. Implementations must be non-decreasing in
/// diameter, height above grade and depth below grade, and never negative.
pub trait StumpScorer: Send + Sync {
    fn score(&self, stump: &Stump) -> Result<Decimal, PricingError>;
}

/// `diameter^2 * (height_weight * height_above + depth_weight * depth_below)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedStumpScorer {
    weights: StumpScoreWeights,
}

impl WeightedStumpScorer {
    pub fn new(weights: StumpScoreWeights) -> Result<Self, PricingError> {
        require_non_negative(weights.height_weight, "stump_score.height_weight")?;
        require_non_negative(weights.depth_weight, "stump_score.depth_weight")?;
        Ok(Self { weights })
    }
}

impl StumpScorer for WeightedStumpScorer {
    fn score(&self, stump: &Stump) -> Result<Decimal, PricingError> {
        validate_stump(stump)?;

        let extent = add(
            multiply(self.weights.height_weight, stump.height_above_feet, "height_above")?,
            multiply(self.weights.depth_weight, stump.depth_below_feet, "depth_below")?,
            "stump_score",
        )?;
        let face = multiply(stump.diameter_inches, stump.diameter_inches, "diameter")?;
        multiply(face, extent, "stump_score")
    }
}

pub fn validate_stump(stump: &Stump) -> Result<(), PricingError> {
    require_non_negative(stump.diameter_inches, "diameter")?;
    require_non_negative(stump.height_above_feet, "height_above")?;
    require_non_negative(stump.depth_below_feet, "depth_below")
}
