use canopy_core::errors::ApplicationError;
use canopy_core::intake;
use canopy_core::pricing::loadout::loadout_cost_from_rates;
use clap::Args;

use super::CommandResult;

const COMMAND: &str = "loadout";

#[derive(Debug, Clone, Default, Args)]
pub struct LoadoutArgs {
    /// Hourly cost of one machine; repeat per machine.
    #[arg(long = "equipment", value_name = "RATE")]
    pub equipment: Vec<String>,
    /// Hourly true cost of one crew member; repeat per person.
    #[arg(long = "labor", value_name = "RATE")]
    pub labor: Vec<String>,
}

pub fn run(args: &LoadoutArgs) -> CommandResult {
    match execute(args) {
        Ok(result) => result,
        Err(error) => CommandResult::from_error(COMMAND, error),
    }
}

fn execute(args: &LoadoutArgs) -> Result<CommandResult, ApplicationError> {
    let equipment = intake::hourly_rates("equipment", args.equipment.as_slice())?;
    let labor = intake::hourly_rates("labor", args.labor.as_slice())?;
    let cost = loadout_cost_from_rates(&equipment, &labor)?;

    Ok(CommandResult::success_with_data(
        COMMAND,
        format!(
            "loadout of {} machines and {} crew costs {}/hour",
            equipment.len(),
            labor.len(),
            cost.total_loadout_cost_per_hour.round_dp(2)
        ),
        &cost,
    ))
}
