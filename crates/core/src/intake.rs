//! Parse-and-validate boundary between raw form values and the engine.
//!
//! UI forms hand over every value as text. Nothing here computes prices: each
//! function turns a [`FormFields`] map into a typed, range-checked engine input
//! or reports exactly which field is wrong.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::cost::{CrewPosition, EmployeeCostInput, EquipmentCostInput};
use crate::domain::quote::{PricingStrategy, QuoteRequest};
use crate::domain::service::{DbhPackage, ServiceType};
use crate::domain::workload::{Stump, WorkloadInput};
use crate::errors::PricingError;
use crate::pricing::settings::{EngineSettings, MulcherClass};

const FULL_TIME_ANNUAL_HOURS: i64 = 2_080;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("required field `{field}` is missing")]
    MissingField { field: String },
    #[error("field `{field}` is not a number: `{value}`")]
    NotANumber { field: String, value: String },
    #[error("field `{field}` is out of range: `{value}` ({expected})")]
    OutOfRange { field: String, value: String, expected: String },
    #[error("field `{field}` has unsupported value `{value}` (expected {expected})")]
    InvalidChoice { field: String, value: String, expected: String },
    #[error("malformed assignment `{0}` (expected key=value)")]
    MalformedAssignment(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds fields from `key=value` assignments; later keys win.
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, IntakeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let Some((key, value)) = assignment.split_once('=') else {
                return Err(IntakeError::MalformedAssignment(assignment.to_string()));
            };
            if key.trim().is_empty() {
                return Err(IntakeError::MalformedAssignment(assignment.to_string()));
            }
            fields.insert(key, value);
        }
        Ok(fields)
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.0.insert(normalize_key(key.as_ref()), value.into());
    }

    /// Trimmed value; blank form inputs count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&normalize_key(key)).map(|value| value.trim()).filter(|value| !value.is_empty())
    }

    fn require(&self, key: &str) -> Result<&str, IntakeError> {
        self.get(key).ok_or_else(|| IntakeError::MissingField { field: key.to_string() })
    }

    fn optional_decimal(&self, key: &str) -> Result<Option<Decimal>, IntakeError> {
        self.get(key).map(|value| parse_decimal(key, value)).transpose()
    }

    fn decimal(&self, key: &str) -> Result<Decimal, IntakeError> {
        parse_decimal(key, self.require(key)?)
    }

    fn positive(&self, key: &str) -> Result<Decimal, IntakeError> {
        let value = self.decimal(key)?;
        ensure_range(key, value, value > Decimal::ZERO, "must be greater than zero")
    }

    fn non_negative(&self, key: &str) -> Result<Decimal, IntakeError> {
        let value = self.decimal(key)?;
        ensure_range(key, value, value >= Decimal::ZERO, "must not be negative")
    }

    fn non_negative_or_zero(&self, key: &str) -> Result<Decimal, IntakeError> {
        match self.optional_decimal(key)? {
            Some(value) => ensure_range(key, value, value >= Decimal::ZERO, "must not be negative"),
            None => Ok(Decimal::ZERO),
        }
    }

    fn optional_positive(&self, key: &str) -> Result<Option<Decimal>, IntakeError> {
        self.optional_decimal(key)?
            .map(|value| {
                ensure_range(key, value, value > Decimal::ZERO, "must be greater than zero")
            })
            .transpose()
    }

    fn choice<T>(&self, key: &str, expected: &str) -> Result<Option<T>, IntakeError>
    where
        T: FromStr,
    {
        self.get(key)
            .map(|value| {
                value.parse::<T>().map_err(|_| IntakeError::InvalidChoice {
                    field: key.to_string(),
                    value: value.to_string(),
                    expected: expected.to_string(),
                })
            })
            .transpose()
    }
}

pub fn equipment_input(fields: &FormFields) -> Result<EquipmentCostInput, IntakeError> {
    Ok(EquipmentCostInput {
        purchase_price: fields.non_negative("purchase_price")?,
        useful_life_years: fields.positive("useful_life_years")?,
        annual_finance_cost: fields.non_negative_or_zero("annual_finance_cost")?,
        annual_insurance: fields.non_negative_or_zero("annual_insurance")?,
        annual_registration: fields.non_negative_or_zero("annual_registration")?,
        annual_hours: fields.positive("annual_hours")?,
        fuel_gallons_per_hour: fields.non_negative("fuel_gallons_per_hour")?,
        fuel_price_per_gallon: fields.positive("fuel_price_per_gallon")?,
        annual_maintenance: fields.non_negative_or_zero("annual_maintenance")?,
        annual_repairs: fields.non_negative_or_zero("annual_repairs")?,
    })
}

/// An explicit `burden_multiplier` wins over `position`; with neither, the
/// configured default applies.
pub fn employee_input(
    fields: &FormFields,
    settings: &EngineSettings,
) -> Result<EmployeeCostInput, IntakeError> {
    let position: Option<CrewPosition> = fields.choice(
        "position",
        "entry_crew|experienced|crew_lead|certified_specialist|specialized_operator",
    )?;
    let burden_multiplier = match fields.optional_decimal("burden_multiplier")? {
        Some(value) => {
            ensure_range("burden_multiplier", value, value >= Decimal::ONE, "must be at least 1")?
        }
        None => position
            .map(|position| position.burden_multiplier())
            .unwrap_or(settings.default_burden_multiplier),
    };

    Ok(EmployeeCostInput {
        base_hourly_rate: fields.positive("base_hourly_rate")?,
        annual_hours: fields
            .optional_positive("annual_hours")?
            .unwrap_or_else(|| Decimal::from(FULL_TIME_ANNUAL_HOURS)),
        burden_multiplier,
    })
}

pub fn quote_request(
    service: &str,
    fields: &FormFields,
    settings: &EngineSettings,
) -> Result<QuoteRequest, IntakeError> {
    let service_type = ServiceType::from_str(service)?;

    let workload = match service_type {
        ServiceType::ForestryMulching => {
            let raw_dbh = fields.require("dbh_package")?;
            let dbh_package = raw_dbh
                .parse::<u8>()
                .ok()
                .and_then(|inches| DbhPackage::try_from(inches).ok())
                .ok_or_else(|| IntakeError::InvalidChoice {
                    field: "dbh_package".to_string(),
                    value: raw_dbh.to_string(),
                    expected: "4|6|8".to_string(),
                })?;
            let production_rate = match fields.optional_positive("production_rate")? {
                Some(rate) => rate,
                None => {
                    let class: MulcherClass = fields
                        .choice("mulcher", "mulcher|high_throughput_mulcher")?
                        .unwrap_or(settings.production.default_mulcher);
                    settings.production.mulching_rate(class)
                }
            };
            WorkloadInput::ForestryMulching {
                acreage: fields.non_negative("acreage")?,
                dbh_package,
                production_rate,
            }
        }
        ServiceType::StumpGrinding => WorkloadInput::StumpGrinding {
            stumps: parse_stumps(fields.require("stumps")?)?,
            production_rate: fields
                .optional_positive("production_rate")?
                .unwrap_or(settings.production.stump_grinder),
        },
        ServiceType::LandClearing => {
            WorkloadInput::LandClearing { estimated_days: fields.non_negative("estimated_days")? }
        }
    };

    let strategy = fields.get("strategy").unwrap_or("margin").to_ascii_lowercase();
    let (pricing, loadout_cost_per_hour) = match strategy.as_str() {
        "margin" => (
            PricingStrategy::MarginBased { margin: margin_or_default(fields, settings)? },
            fields.positive("loadout_cost_per_hour")?,
        ),
        "band" => {
            let band = settings.band(service_type);
            let low_per_hour = match fields.optional_decimal("low_per_hour")? {
                Some(value) => ensure_range(
                    "low_per_hour",
                    value,
                    value >= Decimal::ZERO,
                    "must not be negative",
                )?,
                None => band.low_per_hour,
            };
            let high_per_hour = match fields.optional_decimal("high_per_hour")? {
                Some(value) => ensure_range(
                    "high_per_hour",
                    value,
                    value >= low_per_hour,
                    "must not be below low_per_hour",
                )?,
                None => band.high_per_hour,
            };
            (
                PricingStrategy::FixedBand { low_per_hour, high_per_hour },
                fields.non_negative_or_zero("loadout_cost_per_hour")?,
            )
        }
        other => {
            return Err(IntakeError::InvalidChoice {
                field: "strategy".to_string(),
                value: other.to_string(),
                expected: "margin|band".to_string(),
            })
        }
    };

    Ok(QuoteRequest {
        service_type,
        workload,
        loadout_cost_per_hour,
        drive_time_minutes: fields.non_negative_or_zero("drive_time_minutes")?,
        pricing,
    })
}

/// Cost and margin for a billing-rate lookup; the margin falls back to the
/// configured default.
pub fn billing_rate_input(
    fields: &FormFields,
    settings: &EngineSettings,
) -> Result<(Decimal, Decimal), IntakeError> {
    Ok((fields.non_negative("cost")?, margin_or_default(fields, settings)?))
}

/// Parses a list of already-computed hourly rates, e.g. loadout members.
pub fn hourly_rates<S: AsRef<str>>(field: &str, values: &[S]) -> Result<Vec<Decimal>, IntakeError> {
    values
        .iter()
        .map(|value| {
            let rate = parse_decimal(field, value.as_ref())?;
            ensure_range(field, rate, rate >= Decimal::ZERO, "must not be negative")
        })
        .collect()
}

fn margin_or_default(
    fields: &FormFields,
    settings: &EngineSettings,
) -> Result<Decimal, IntakeError> {
    match fields.optional_decimal("margin")? {
        Some(value) => ensure_range(
            "margin",
            value,
            value >= Decimal::ZERO && value < Decimal::ONE,
            "must be a fraction in [0, 1)",
        ),
        None => Ok(settings.default_margin),
    }
}

/// Parses `diameter:height:depth` entries separated by `;`.
pub fn parse_stumps(raw: &str) -> Result<Vec<Stump>, IntakeError> {
    let mut stumps = Vec::new();
    for entry in raw.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
        let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
        let [diameter, height, depth] = parts.as_slice() else {
            return Err(IntakeError::InvalidChoice {
                field: "stumps".to_string(),
                value: entry.to_string(),
                expected: "diameter:height:depth".to_string(),
            });
        };
        stumps.push(Stump {
            diameter_inches: stump_dimension("stumps.diameter", diameter)?,
            height_above_feet: stump_dimension("stumps.height_above", height)?,
            depth_below_feet: stump_dimension("stumps.depth_below", depth)?,
        });
    }
    Ok(stumps)
}

fn stump_dimension(field: &str, value: &str) -> Result<Decimal, IntakeError> {
    let parsed = parse_decimal(field, value)?;
    ensure_range(field, parsed, parsed >= Decimal::ZERO, "must not be negative")
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, IntakeError> {
    let cleaned: String = value.trim().chars().filter(|ch| !matches!(ch, ',' | '$')).collect();
    Decimal::from_str(&cleaned).map_err(|_| IntakeError::NotANumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn ensure_range(
    field: &str,
    value: Decimal,
    in_range: bool,
    expected: &str,
) -> Result<Decimal, IntakeError> {
    if in_range {
        return Ok(value);
    }
    Err(IntakeError::OutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        billing_rate_input, employee_input, equipment_input, hourly_rates, parse_stumps,
        quote_request, FormFields, IntakeError,
    };
    use crate::domain::quote::PricingStrategy;
    use crate::domain::service::DbhPackage;
    use crate::domain::workload::WorkloadInput;
    use crate::errors::PricingError;
    use crate::pricing::settings::EngineSettings;

    fn fields(pairs: &[&str]) -> FormFields {
        FormFields::from_assignments(pairs.iter().copied()).expect("well-formed assignments")
    }

    #[test]
    fn equipment_form_parses_currency_formatting_and_defaults_optional_costs() {
        let input = equipment_input(&fields(&[
            "purchase_price=$65,000",
            "useful_life_years=5",
            "annual_hours=2000",
            "fuel_gallons_per_hour=6",
            "fuel_price_per_gallon=3.75",
        ]))
        .expect("valid form");

        assert_eq!(input.purchase_price, Decimal::from(65_000));
        assert_eq!(input.annual_repairs, Decimal::ZERO);
        assert_eq!(input.fuel_price_per_gallon, Decimal::new(375, 2));
    }

    #[test]
    fn equipment_form_reports_missing_and_malformed_fields() {
        let missing = equipment_input(&fields(&["purchase_price=1000"])).expect_err("incomplete");
        assert_eq!(missing, IntakeError::MissingField { field: "useful_life_years".to_string() });

        let malformed = equipment_input(&fields(&[
            "purchase_price=lots",
            "useful_life_years=5",
        ]))
        .expect_err("not a number");
        assert!(matches!(
            malformed,
            IntakeError::NotANumber { ref field, .. } if field == "purchase_price"
        ));

        let zero_hours = equipment_input(&fields(&[
            "purchase_price=1000",
            "useful_life_years=5",
            "annual_hours=0",
            "fuel_gallons_per_hour=0",
            "fuel_price_per_gallon=3",
        ]))
        .expect_err("zero hours");
        assert!(matches!(
            zero_hours,
            IntakeError::OutOfRange { ref field, .. } if field == "annual_hours"
        ));
    }

    #[test]
    fn employee_burden_resolution_order() {
        let settings = EngineSettings::default();

        let explicit = employee_input(
            &fields(&["base_hourly_rate=35", "burden_multiplier=1.85", "position=crew_lead"]),
            &settings,
        )
        .expect("valid");
        assert_eq!(explicit.burden_multiplier, Decimal::new(185, 2));

        let preset =
            employee_input(&fields(&["base_hourly_rate=35", "position=crew-lead"]), &settings)
                .expect("valid");
        assert_eq!(preset.burden_multiplier, Decimal::new(18, 1));

        let fallback = employee_input(&fields(&["base_hourly_rate=35"]), &settings).expect("valid");
        assert_eq!(fallback.burden_multiplier, Decimal::new(17, 1));
        assert_eq!(fallback.annual_hours, Decimal::from(2_080));

        let too_low =
            employee_input(&fields(&["base_hourly_rate=35", "burden_multiplier=0.9"]), &settings);
        assert!(matches!(too_low, Err(IntakeError::OutOfRange { .. })));
    }

    #[test]
    fn mulching_request_uses_configured_machine_rate() {
        let settings = EngineSettings::default();
        let request = quote_request(
            "forestry-mulching",
            &fields(&[
                "acreage=8",
                "dbh_package=6",
                "mulcher=high_throughput_mulcher",
                "strategy=band",
                "drive_time_minutes=45",
            ]),
            &settings,
        )
        .expect("valid form");

        assert_eq!(
            request.workload,
            WorkloadInput::ForestryMulching {
                acreage: Decimal::from(8),
                dbh_package: DbhPackage::Six,
                production_rate: Decimal::from(5),
            }
        );
        assert_eq!(
            request.pricing,
            PricingStrategy::FixedBand {
                low_per_hour: Decimal::from(300),
                high_per_hour: Decimal::from(400),
            }
        );
        assert_eq!(request.loadout_cost_per_hour, Decimal::ZERO);
    }

    #[test]
    fn margin_strategy_requires_loadout_cost_and_defaults_margin() {
        let settings = EngineSettings::default();
        let missing = quote_request("land_clearing", &fields(&["estimated_days=2"]), &settings);
        assert_eq!(
            missing,
            Err(IntakeError::MissingField { field: "loadout_cost_per_hour".to_string() })
        );

        let request = quote_request(
            "land_clearing",
            &fields(&["estimated_days=2", "loadout_cost_per_hour=246.43"]),
            &settings,
        )
        .expect("valid form");
        assert_eq!(request.pricing, PricingStrategy::MarginBased { margin: Decimal::new(5, 1) });
        assert_eq!(request.drive_time_minutes, Decimal::ZERO);
    }

    #[test]
    fn unknown_service_and_dbh_are_rejected() {
        let settings = EngineSettings::default();
        assert_eq!(
            quote_request("tree_removal", &FormFields::new(), &settings),
            Err(IntakeError::Pricing(PricingError::UnknownServiceType("tree_removal".to_string())))
        );
        assert!(matches!(
            quote_request("mulching", &fields(&["acreage=2", "dbh_package=5"]), &settings),
            Err(IntakeError::InvalidChoice { ref field, .. }) if field == "dbh_package"
        ));
        assert!(matches!(
            quote_request(
                "mulching",
                &fields(&["acreage=2", "dbh_package=4", "strategy=cost_plus"]),
                &settings
            ),
            Err(IntakeError::InvalidChoice { ref field, .. }) if field == "strategy"
        ));
    }

    #[test]
    fn stump_list_parsing() {
        let stumps = parse_stumps("24:1:1; 18:0.5:1;").expect("valid list");
        assert_eq!(stumps.len(), 2);
        assert_eq!(stumps[1].height_above_feet, Decimal::new(5, 1));

        assert!(matches!(parse_stumps("24:1"), Err(IntakeError::InvalidChoice { .. })));
        assert!(matches!(parse_stumps("24:-1:1"), Err(IntakeError::OutOfRange { .. })));
    }

    #[test]
    fn billing_rate_form_defaults_margin() {
        let settings = EngineSettings::default();
        assert_eq!(
            billing_rate_input(&fields(&["cost=246.43"]), &settings),
            Ok((Decimal::new(24_643, 2), Decimal::new(5, 1)))
        );
        assert!(matches!(
            billing_rate_input(&fields(&["cost=100", "margin=1"]), &settings),
            Err(IntakeError::OutOfRange { ref field, .. }) if field == "margin"
        ));
    }

    #[test]
    fn hourly_rate_lists_reject_negatives() {
        assert_eq!(
            hourly_rates("equipment", &["38.425", "$12.10"]),
            Ok(vec![Decimal::new(38_425, 3), Decimal::new(1_210, 2)])
        );
        assert!(matches!(
            hourly_rates("labor", &["-4"]),
            Err(IntakeError::OutOfRange { ref field, .. }) if field == "labor"
        ));
    }

    #[test]
    fn assignments_must_have_keys() {
        assert_eq!(
            FormFields::from_assignments(["acreage"]),
            Err(IntakeError::MalformedAssignment("acreage".to_string()))
        );
        assert!(FormFields::from_assignments(["=4"]).is_err());
        let fields = FormFields::from_assignments(["Drive-Time Minutes= 30 "]).expect("valid");
        assert_eq!(fields.get("drive_time_minutes"), Some("30"));
    }
}
