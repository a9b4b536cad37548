use canopy_core::config::LoadOptions;
use canopy_core::domain::quote::{PricingStrategy, Quote, QuoteRequest};
use canopy_core::errors::ApplicationError;
use canopy_core::intake::{self, FormFields};
use canopy_core::pricing::margin::margin_from_rates;
use canopy_core::pricing::{DeterministicQuoteComposer, QuoteComposer};
use canopy_core::record::QuoteRecord;
use clap::Args;
use rust_decimal::Decimal;
use tracing::info;

use super::{load_config, CommandResult};

const COMMAND: &str = "quote";

#[derive(Debug, Clone, Default, Args)]
pub struct QuoteArgs {
    /// forestry_mulching, stump_grinding or land_clearing.
    #[arg(long)]
    pub service: String,
    /// Workload or pricing field as `key=value`, e.g. `acreage=8`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
    /// Emit an auditable record (inputs, quote and checksum) instead of the bare quote.
    #[arg(long)]
    pub record: bool,
}

pub fn run(args: &QuoteArgs, options: &LoadOptions) -> CommandResult {
    match execute(args, options) {
        Ok(result) => result,
        Err(error) => CommandResult::from_error(COMMAND, error),
    }
}

fn execute(args: &QuoteArgs, options: &LoadOptions) -> Result<CommandResult, ApplicationError> {
    let config = load_config(options)?;
    let fields = FormFields::from_assignments(&args.fields)?;
    let request = intake::quote_request(&args.service, &fields, &config.engine)?;
    let composer = DeterministicQuoteComposer::from_settings(config.engine_settings())?;

    if args.record {
        let record = QuoteRecord::create(request, &composer)?;
        info!(
            event_name = "cli.quote.recorded",
            record_id = %record.id.0,
            input_checksum = %record.input_checksum,
            "quote record created"
        );
        let message = summarize(&record.request, &record.quote);
        return Ok(CommandResult::success_with_data(COMMAND, message, &record));
    }

    let quote = composer.compose(&request)?;
    Ok(CommandResult::success_with_data(COMMAND, summarize(&request, &quote), &quote))
}

fn summarize(request: &QuoteRequest, quote: &Quote) -> String {
    let hours = quote.estimated_hours.round_dp(1).normalize();
    let low = quote.low_price.round_dp(2);
    let high = quote.high_price.round_dp(2);
    let mut message = if low == high {
        format!("{} quote: {low} for {hours} hours", quote.service_type.label())
    } else {
        format!("{} quote: {low} to {high} for {hours} hours", quote.service_type.label())
    };

    if let PricingStrategy::FixedBand { low_per_hour, high_per_hour } = &request.pricing {
        let cost = request.loadout_cost_per_hour;
        if cost > Decimal::ZERO {
            if let (Ok(low_margin), Ok(high_margin)) =
                (margin_from_rates(cost, *low_per_hour), margin_from_rates(cost, *high_per_hour))
            {
                message.push_str(&format!(
                    " (margin over loadout cost {}% to {}%)",
                    percent(low_margin),
                    percent(high_margin)
                ));
            }
        }
    }

    message
}

fn percent(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).round_dp(1).normalize()
}
