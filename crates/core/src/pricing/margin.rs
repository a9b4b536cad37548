use rust_decimal::Decimal;

use crate::domain::cost::BillingRateResult;
use crate::errors::PricingError;
use crate::pricing::{divide, require_non_negative, require_positive};

/// Converts an hourly cost to a selling rate. `margin` is a fraction of the
/// selling price, so `rate = cost / (1 - margin)`.
pub fn billing_rate(cost: Decimal, margin: Decimal) -> Result<BillingRateResult, PricingError> {
    if margin < Decimal::ZERO || margin >= Decimal::ONE {
        return Err(PricingError::InvalidMargin { margin });
    }
    require_non_negative(cost, "cost_per_hour")?;

    let billing_rate_per_hour = divide(cost, Decimal::ONE - margin, "margin")?;
    Ok(BillingRateResult { cost_per_hour: cost, margin, billing_rate_per_hour })
}

/// Effective margin of a selling rate over its cost.
pub fn margin_from_rates(cost: Decimal, billing_rate: Decimal) -> Result<Decimal, PricingError> {
    require_positive(billing_rate, "billing_rate_per_hour")?;
    require_non_negative(cost, "cost_per_hour")?;
    Ok(Decimal::ONE - divide(cost, billing_rate, "billing_rate_per_hour")?)
}
