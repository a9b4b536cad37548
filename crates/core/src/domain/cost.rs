use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCostInput {
    pub purchase_price: Decimal,
    pub useful_life_years: Decimal,
    pub annual_finance_cost: Decimal,
    pub annual_insurance: Decimal,
    pub annual_registration: Decimal,
    pub annual_hours: Decimal,
    pub fuel_gallons_per_hour: Decimal,
    pub fuel_price_per_gallon: Decimal,
    pub annual_maintenance: Decimal,
    pub annual_repairs: Decimal,
}

/// Hourly share of each cost line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCostBreakdown {
    pub depreciation: Decimal,
    pub finance: Decimal,
    pub insurance: Decimal,
    pub registration: Decimal,
    pub fuel: Decimal,
    pub maintenance: Decimal,
    pub repairs: Decimal,
}

impl EquipmentCostBreakdown {
    pub fn total(&self) -> Decimal {
        self.depreciation
            + self.finance
            + self.insurance
            + self.registration
            + self.fuel
            + self.maintenance
            + self.repairs
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCostResult {
    pub ownership_cost_per_hour: Decimal,
    pub operating_cost_per_hour: Decimal,
    pub total_cost_per_hour: Decimal,
    pub breakdown: EquipmentCostBreakdown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCostInput {
    pub base_hourly_rate: Decimal,
    pub annual_hours: Decimal,
    pub burden_multiplier: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCostResult {
    pub true_cost_per_hour: Decimal,
    pub annual_base_cost: Decimal,
    pub annual_burden_cost: Decimal,
    pub annual_true_cost: Decimal,
    pub burden_multiplier: Decimal,
}

/// Typical burden multipliers by crew role. Informational only; any
/// multiplier >= 1 is accepted by the cost calculators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewPosition {
    EntryCrew,
    Experienced,
    CrewLead,
    CertifiedSpecialist,
    SpecializedOperator,
}

impl CrewPosition {
    pub const ALL: [CrewPosition; 5] = [
        CrewPosition::EntryCrew,
        CrewPosition::Experienced,
        CrewPosition::CrewLead,
        CrewPosition::CertifiedSpecialist,
        CrewPosition::SpecializedOperator,
    ];

    pub fn burden_multiplier(&self) -> Decimal {
        match self {
            Self::EntryCrew => Decimal::new(16, 1),
            Self::Experienced => Decimal::new(17, 1),
            Self::CrewLead => Decimal::new(18, 1),
            Self::CertifiedSpecialist => Decimal::new(19, 1),
            Self::SpecializedOperator => Decimal::new(20, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntryCrew => "entry_crew",
            Self::Experienced => "experienced",
            Self::CrewLead => "crew_lead",
            Self::CertifiedSpecialist => "certified_specialist",
            Self::SpecializedOperator => "specialized_operator",
        }
    }
}

impl fmt::Display for CrewPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrewPosition {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|position| position.as_str() == normalized).ok_or_else(|| {
            PricingError::invalid_input(
                "position",
                format!(
                    "`{}` is not a crew position (expected entry_crew|experienced|crew_lead|\
                     certified_specialist|specialized_operator)",
                    value.trim()
                ),
            )
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutCost {
    pub total_equipment_cost_per_hour: Decimal,
    pub total_labor_cost_per_hour: Decimal,
    pub total_loadout_cost_per_hour: Decimal,
}

/// A named crew bundle whose combined hourly cost is the basis for project pricing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub name: String,
    pub equipment: Vec<EquipmentCostResult>,
    pub labor: Vec<EmployeeCostResult>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRateResult {
    pub cost_per_hour: Decimal,
    pub margin: Decimal,
    pub billing_rate_per_hour: Decimal,
}
