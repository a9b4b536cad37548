use rust_decimal::Decimal;

use crate::domain::cost::{
    EmployeeCostInput, EmployeeCostResult, EquipmentCostBreakdown, EquipmentCostInput,
    EquipmentCostResult,
};
use crate::errors::PricingError;
use crate::pricing::{add, divide, multiply, require_non_negative, require_positive, sum};

pub fn equipment_cost(input: &EquipmentCostInput) -> Result<EquipmentCostResult, PricingError> {
    require_positive(input.useful_life_years, "useful_life_years")?;
    require_positive(input.annual_hours, "annual_hours")?;
    require_positive(input.fuel_price_per_gallon, "fuel_price_per_gallon")?;
    for (field, value) in [
        ("purchase_price", input.purchase_price),
        ("annual_finance_cost", input.annual_finance_cost),
        ("annual_insurance", input.annual_insurance),
        ("annual_registration", input.annual_registration),
        ("fuel_gallons_per_hour", input.fuel_gallons_per_hour),
        ("annual_maintenance", input.annual_maintenance),
        ("annual_repairs", input.annual_repairs),
    ] {
        require_non_negative(value, field)?;
    }

    let annual_depreciation =
        divide(input.purchase_price, input.useful_life_years, "useful_life_years")?;
    let hourly = |annual: Decimal| divide(annual, input.annual_hours, "annual_hours");

    let breakdown = EquipmentCostBreakdown {
        depreciation: hourly(annual_depreciation)?,
        finance: hourly(input.annual_finance_cost)?,
        insurance: hourly(input.annual_insurance)?,
        registration: hourly(input.annual_registration)?,
        fuel: multiply(input.fuel_gallons_per_hour, input.fuel_price_per_gallon, "fuel")?,
        maintenance: hourly(input.annual_maintenance)?,
        repairs: hourly(input.annual_repairs)?,
    };

    let ownership_cost_per_hour = sum(
        [breakdown.depreciation, breakdown.finance, breakdown.insurance, breakdown.registration],
        "ownership_cost_per_hour",
    )?;
    let operating_cost_per_hour =
        sum([breakdown.fuel, breakdown.maintenance, breakdown.repairs], "operating_cost_per_hour")?;
    let total_cost_per_hour =
        add(ownership_cost_per_hour, operating_cost_per_hour, "total_cost_per_hour")?;

    Ok(EquipmentCostResult {
        ownership_cost_per_hour,
        operating_cost_per_hour,
        total_cost_per_hour,
        breakdown,
    })
}

pub fn employee_cost(input: &EmployeeCostInput) -> Result<EmployeeCostResult, PricingError> {
    if input.burden_multiplier < Decimal::ONE {
        return Err(PricingError::InvalidBurden { multiplier: input.burden_multiplier });
    }
    require_positive(input.base_hourly_rate, "base_hourly_rate")?;
    require_positive(input.annual_hours, "annual_hours")?;

    let true_cost_per_hour =
        multiply(input.base_hourly_rate, input.burden_multiplier, "burden_multiplier")?;
    let annual_base_cost = multiply(input.base_hourly_rate, input.annual_hours, "annual_hours")?;
    let annual_burden_cost = multiply(
        annual_base_cost,
        input.burden_multiplier - Decimal::ONE,
        "burden_multiplier",
    )?;

    Ok(EmployeeCostResult {
        true_cost_per_hour,
        annual_base_cost,
        annual_burden_cost,
        annual_true_cost: add(annual_base_cost, annual_burden_cost, "annual_true_cost")?,
        burden_multiplier: input.burden_multiplier,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{employee_cost, equipment_cost};
    use crate::domain::cost::{CrewPosition, EmployeeCostInput, EquipmentCostInput};
    use crate::errors::PricingError;

    fn mulcher_input() -> EquipmentCostInput {
        EquipmentCostInput {
            purchase_price: Decimal::from(65_000),
            useful_life_years: Decimal::from(5),
            annual_finance_cost: Decimal::from(3_250),
            annual_insurance: Decimal::from(3_000),
            annual_registration: Decimal::from(600),
            annual_hours: Decimal::from(2_000),
            fuel_gallons_per_hour: Decimal::from(6),
            fuel_price_per_gallon: Decimal::new(375, 2),
            annual_maintenance: Decimal::from(8_500),
            annual_repairs: Decimal::from(3_500),
        }
    }

    #[test]
    fn equipment_cost_splits_ownership_and_operating() {
        let result = equipment_cost(&mulcher_input()).expect("valid equipment");

        assert_eq!(result.breakdown.depreciation, Decimal::new(65, 1));
        assert_eq!(result.breakdown.fuel, Decimal::new(225, 1));
        assert_eq!(result.ownership_cost_per_hour, Decimal::new(9_925, 3));
        assert_eq!(result.operating_cost_per_hour, Decimal::new(285, 1));
        assert_eq!(result.total_cost_per_hour, Decimal::new(38_425, 3));
        assert_eq!(result.breakdown.total(), result.total_cost_per_hour);
    }

    #[test]
    fn fuel_is_not_spread_over_annual_hours() {
        let mut input = mulcher_input();
        input.annual_hours = Decimal::from(1_000);
        let result = equipment_cost(&input).expect("valid equipment");
        assert_eq!(result.breakdown.fuel, Decimal::new(225, 1));
        assert_eq!(result.breakdown.maintenance, Decimal::new(85, 1));
    }

    #[test]
    fn zero_useful_life_is_rejected() {
        let mut input = mulcher_input();
        input.useful_life_years = Decimal::ZERO;
        let error = equipment_cost(&input).expect_err("zero life must not divide");
        assert!(matches!(
            error,
            PricingError::InvalidInput { ref field, .. } if field == "useful_life_years"
        ));
    }

    #[test]
    fn oversized_costs_are_rejected_instead_of_overflowing() {
        let mut input = mulcher_input();
        input.purchase_price = Decimal::MAX;
        input.annual_finance_cost = Decimal::MAX;
        input.useful_life_years = Decimal::ONE;
        input.annual_hours = Decimal::ONE;
        assert!(matches!(
            equipment_cost(&input),
            Err(PricingError::InvalidInput { ref field, .. }) if field == "ownership_cost_per_hour"
        ));

        let mut input = mulcher_input();
        input.purchase_price = Decimal::ZERO;
        input.annual_finance_cost = Decimal::ZERO;
        input.annual_hours = Decimal::ONE;
        input.fuel_gallons_per_hour = Decimal::ZERO;
        input.annual_maintenance = Decimal::MAX;
        input.annual_repairs = Decimal::ZERO;
        assert!(matches!(
            equipment_cost(&input),
            Err(PricingError::InvalidInput { ref field, .. }) if field == "total_cost_per_hour"
        ));
    }

    #[test]
    fn zero_or_negative_annual_hours_is_rejected() {
        for hours in [Decimal::ZERO, Decimal::NEGATIVE_ONE] {
            let mut input = mulcher_input();
            input.annual_hours = hours;
            assert!(matches!(
                equipment_cost(&input),
                Err(PricingError::InvalidInput { ref field, .. }) if field == "annual_hours"
            ));
        }
    }

    #[test]
    fn negative_money_fields_are_rejected() {
        let mut input = mulcher_input();
        input.annual_repairs = Decimal::new(-1, 0);
        assert!(matches!(
            equipment_cost(&input),
            Err(PricingError::InvalidInput { ref field, .. }) if field == "annual_repairs"
        ));
    }

    #[test]
    fn employee_true_cost_applies_burden() {
        let result = employee_cost(&EmployeeCostInput {
            base_hourly_rate: Decimal::from(35),
            annual_hours: Decimal::from(2_080),
            burden_multiplier: CrewPosition::Experienced.burden_multiplier(),
        })
        .expect("valid employee");

        assert_eq!(result.true_cost_per_hour, Decimal::new(5_950, 2));
        assert_eq!(result.annual_base_cost, Decimal::from(72_800));
        assert_eq!(result.annual_burden_cost, Decimal::from(50_960));
        assert_eq!(result.annual_true_cost, Decimal::from(123_760));
        assert_eq!(
            result.annual_true_cost,
            result.true_cost_per_hour * Decimal::from(2_080)
        );
    }

    #[test]
    fn burden_of_exactly_one_has_no_burden_cost() {
        let result = employee_cost(&EmployeeCostInput {
            base_hourly_rate: Decimal::from(20),
            annual_hours: Decimal::from(1_000),
            burden_multiplier: Decimal::ONE,
        })
        .expect("multiplier of one is valid");
        assert_eq!(result.annual_burden_cost, Decimal::ZERO);
        assert_eq!(result.true_cost_per_hour, Decimal::from(20));
    }

    #[test]
    fn burden_below_one_is_rejected() {
        let error = employee_cost(&EmployeeCostInput {
            base_hourly_rate: Decimal::from(35),
            annual_hours: Decimal::from(2_080),
            burden_multiplier: Decimal::new(9, 1),
        })
        .expect_err("burden cannot discount wages");
        assert_eq!(error, PricingError::InvalidBurden { multiplier: Decimal::new(9, 1) });
    }
}
