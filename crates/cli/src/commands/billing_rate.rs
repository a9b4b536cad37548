use canopy_core::config::LoadOptions;
use canopy_core::errors::ApplicationError;
use canopy_core::intake::{self, FormFields};
use canopy_core::pricing::margin::billing_rate;
use clap::Args;
use rust_decimal::Decimal;

use super::{load_config, CommandResult};

const COMMAND: &str = "billing-rate";

#[derive(Debug, Clone, Default, Args)]
pub struct BillingRateArgs {
    /// Loadout cost per hour.
    #[arg(long)]
    pub cost: String,
    /// Margin as a fraction of price; defaults to `pricing.default_margin`.
    #[arg(long)]
    pub margin: Option<String>,
}

pub fn run(args: &BillingRateArgs, options: &LoadOptions) -> CommandResult {
    match execute(args, options) {
        Ok(result) => result,
        Err(error) => CommandResult::from_error(COMMAND, error),
    }
}

fn execute(
    args: &BillingRateArgs,
    options: &LoadOptions,
) -> Result<CommandResult, ApplicationError> {
    let config = load_config(options)?;

    let mut fields = FormFields::new();
    fields.insert("cost", args.cost.as_str());
    if let Some(margin) = &args.margin {
        fields.insert("margin", margin.as_str());
    }
    let (cost, margin) = intake::billing_rate_input(&fields, &config.engine)?;
    let result = billing_rate(cost, margin)?;

    Ok(CommandResult::success_with_data(
        COMMAND,
        format!(
            "bill {}/hour for a {}% margin",
            result.billing_rate_per_hour.round_dp(2),
            (margin * Decimal::ONE_HUNDRED).normalize()
        ),
        &result,
    ))
}
