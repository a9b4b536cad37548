use canopy_core::config::LoadOptions;
use canopy_core::errors::ApplicationError;
use canopy_core::intake::{self, FormFields};
use canopy_core::pricing::cost::employee_cost;
use clap::Args;

use super::{load_config, CommandResult};

const COMMAND: &str = "employee";

#[derive(Debug, Clone, Default, Args)]
pub struct EmployeeArgs {
    /// Labor field as `key=value`, e.g. `base_hourly_rate=35` or `position=crew_lead`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

pub fn run(args: &EmployeeArgs, options: &LoadOptions) -> CommandResult {
    match execute(args, options) {
        Ok(result) => result,
        Err(error) => CommandResult::from_error(COMMAND, error),
    }
}

fn execute(args: &EmployeeArgs, options: &LoadOptions) -> Result<CommandResult, ApplicationError> {
    let config = load_config(options)?;
    let fields = FormFields::from_assignments(&args.fields)?;
    let input = intake::employee_input(&fields, &config.engine)?;
    let result = employee_cost(&input)?;

    Ok(CommandResult::success_with_data(
        COMMAND,
        format!(
            "true labor cost {}/hour at burden {}",
            result.true_cost_per_hour.round_dp(2),
            result.burden_multiplier
        ),
        &result,
    ))
}
