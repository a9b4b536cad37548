pub mod cost;
pub mod loadout;
pub mod margin;
pub mod quote;
pub mod settings;
pub mod stump;
pub mod workload;

use rust_decimal::Decimal;

use crate::domain::quote::{Quote, QuoteRequest};
use crate::errors::PricingError;

use self::{
    settings::EngineSettings,
    stump::{StumpScorer, WeightedStumpScorer},
};

pub trait QuoteComposer: Send + Sync {
    fn settings(&self) -> &EngineSettings;
    fn compose(&self, request: &QuoteRequest) -> Result<Quote, PricingError>;
}

pub struct DeterministicQuoteComposer<S = WeightedStumpScorer> {
    settings: EngineSettings,
    scorer: S,
}

impl<S> DeterministicQuoteComposer<S> {
    pub fn new(settings: EngineSettings, scorer: S) -> Self {
        Self { settings, scorer }
    }
}

impl DeterministicQuoteComposer<WeightedStumpScorer> {
    pub fn from_settings(settings: EngineSettings) -> Result<Self, PricingError> {
        let scorer = WeightedStumpScorer::new(settings.stump_score.clone())?;
        Ok(Self::new(settings, scorer))
    }
}

impl<S> QuoteComposer for DeterministicQuoteComposer<S>
where
    S: StumpScorer,
{
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn compose(&self, request: &QuoteRequest) -> Result<Quote, PricingError> {
        quote::compose_quote(request, &self.settings, &self.scorer)
    }
}

pub(crate) fn require_positive(value: Decimal, field: &str) -> Result<(), PricingError> {
    if value <= Decimal::ZERO {
        return Err(PricingError::invalid_input(
            field,
            format!("must be greater than zero, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn require_non_negative(value: Decimal, field: &str) -> Result<(), PricingError> {
    if value < Decimal::ZERO {
        return Err(PricingError::invalid_input(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

/// Division that refuses non-positive denominators instead of panicking.
pub(crate) fn divide(
    numerator: Decimal,
    denominator: Decimal,
    field: &str,
) -> Result<Decimal, PricingError> {
    require_positive(denominator, field)?;
    numerator.checked_div(denominator).ok_or_else(|| out_of_range(field))
}

pub(crate) fn add(left: Decimal, right: Decimal, field: &str) -> Result<Decimal, PricingError> {
    left.checked_add(right).ok_or_else(|| out_of_range(field))
}

/// Checked running total; an empty input sums to zero.
pub(crate) fn sum<I>(values: I, field: &str) -> Result<Decimal, PricingError>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |total, value| add(total, value, field))
}

pub(crate) fn multiply(
    left: Decimal,
    right: Decimal,
    field: &str,
) -> Result<Decimal, PricingError> {
    left.checked_mul(right).ok_or_else(|| out_of_range(field))
}

fn out_of_range(field: &str) -> PricingError {
    PricingError::invalid_input(field, "value is out of range")
}
