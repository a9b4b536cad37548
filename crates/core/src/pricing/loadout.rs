use rust_decimal::Decimal;

use crate::domain::cost::{EmployeeCostResult, EquipmentCostResult, Loadout, LoadoutCost};
use crate::errors::PricingError;
use crate::pricing::{add, require_non_negative, sum};

/// Sums already-computed equipment and labor rates into one crew-hour cost.
/// Empty selections are valid and cost nothing. Totals saturate at
/// `Decimal::MAX`; callers that must reject such loadouts use
/// [`loadout_cost_from_rates`] or `require_loadout`.
pub fn loadout_cost(
    equipment: &[EquipmentCostResult],
    labor: &[EmployeeCostResult],
) -> LoadoutCost {
    let total_equipment_cost_per_hour = equipment
        .iter()
        .fold(Decimal::ZERO, |total, item| total.saturating_add(item.total_cost_per_hour));
    let total_labor_cost_per_hour = labor
        .iter()
        .fold(Decimal::ZERO, |total, employee| total.saturating_add(employee.true_cost_per_hour));

    LoadoutCost {
        total_equipment_cost_per_hour,
        total_labor_cost_per_hour,
        total_loadout_cost_per_hour: total_equipment_cost_per_hour
            .saturating_add(total_labor_cost_per_hour),
    }
}

/// Checked aggregation over bare hourly rates, for callers that only kept the
/// per-hour totals of each member.
pub fn loadout_cost_from_rates(
    equipment_rates: &[Decimal],
    labor_rates: &[Decimal],
) -> Result<LoadoutCost, PricingError> {
    for rate in equipment_rates {
        require_non_negative(*rate, "equipment_cost_per_hour")?;
    }
    for rate in labor_rates {
        require_non_negative(*rate, "labor_cost_per_hour")?;
    }

    let total_equipment_cost_per_hour =
        sum(equipment_rates.iter().copied(), "equipment_cost_per_hour")?;
    let total_labor_cost_per_hour = sum(labor_rates.iter().copied(), "labor_cost_per_hour")?;
    Ok(LoadoutCost {
        total_equipment_cost_per_hour,
        total_labor_cost_per_hour,
        total_loadout_cost_per_hour: add(
            total_equipment_cost_per_hour,
            total_labor_cost_per_hour,
            "loadout_cost_per_hour",
        )?,
    })
}

impl Loadout {
    pub fn cost(&self) -> LoadoutCost {
        loadout_cost(&self.equipment, &self.labor)
    }
}
