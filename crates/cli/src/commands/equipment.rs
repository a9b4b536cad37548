use canopy_core::errors::ApplicationError;
use canopy_core::intake::{self, FormFields};
use canopy_core::pricing::cost::equipment_cost;
use clap::Args;
use tracing::info;

use super::CommandResult;

const COMMAND: &str = "equipment";

#[derive(Debug, Clone, Default, Args)]
pub struct EquipmentArgs {
    /// Cost field as `key=value`, e.g. `purchase_price=65000`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

pub fn run(args: &EquipmentArgs) -> CommandResult {
    match execute(args) {
        Ok(result) => result,
        Err(error) => CommandResult::from_error(COMMAND, error),
    }
}

fn execute(args: &EquipmentArgs) -> Result<CommandResult, ApplicationError> {
    let fields = FormFields::from_assignments(&args.fields)?;
    let input = intake::equipment_input(&fields)?;
    let result = equipment_cost(&input)?;

    info!(
        event_name = "cli.equipment.costed",
        total_cost_per_hour = %result.total_cost_per_hour,
        "equipment cost computed"
    );

    Ok(CommandResult::success_with_data(
        COMMAND,
        format!("equipment costs {}/hour", result.total_cost_per_hour.round_dp(2)),
        &result,
    ))
}
