use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::cost::{EmployeeCostResult, EquipmentCostResult, LoadoutCost};
use crate::domain::quote::{PricingStrategy, PricingTrace, Quote, QuoteRequest};
use crate::domain::service::ServiceType;
use crate::domain::workload::{ProjectWorkload, WorkloadInput};
use crate::errors::PricingError;
use crate::pricing::loadout::loadout_cost_from_rates;
use crate::pricing::margin::billing_rate;
use crate::pricing::settings::EngineSettings;
use crate::pricing::stump::StumpScorer;
use crate::pricing::workload::{
    inch_acres, project_workload, total_stump_score, transport_hours, work_hours,
};
use crate::pricing::{multiply, require_non_negative, sum};

impl PricingStrategy {
    pub fn default_margin(settings: &EngineSettings) -> Self {
        Self::MarginBased { margin: settings.default_margin }
    }

    pub fn fixed_band_for(service: ServiceType, settings: &EngineSettings) -> Self {
        let band = settings.band(service);
        Self::FixedBand { low_per_hour: band.low_per_hour, high_per_hour: band.high_per_hour }
    }
}

/// Caller-level loadout check: margin pricing needs both machines and crew.
pub fn require_loadout(
    equipment: &[EquipmentCostResult],
    labor: &[EmployeeCostResult],
) -> Result<LoadoutCost, PricingError> {
    if equipment.is_empty() {
        return Err(PricingError::empty_selection("loadout has no equipment"));
    }
    if labor.is_empty() {
        return Err(PricingError::empty_selection("loadout has no crew"));
    }

    let equipment_rates: Vec<Decimal> =
        equipment.iter().map(|item| item.total_cost_per_hour).collect();
    let labor_rates: Vec<Decimal> =
        labor.iter().map(|employee| employee.true_cost_per_hour).collect();
    loadout_cost_from_rates(&equipment_rates, &labor_rates)
}

pub fn compose_quote(
    request: &QuoteRequest,
    settings: &EngineSettings,
    scorer: &dyn StumpScorer,
) -> Result<Quote, PricingError> {
    let service = request.service_type;
    if request.workload.service_type() != service {
        return Err(PricingError::invalid_input(
            "workload",
            format!(
                "workload describes {} but the quote is for {service}",
                request.workload.service_type()
            ),
        ));
    }

    let mut trace = PricingTrace::default();

    let work = work_hours(&request.workload, settings, scorer)?;
    trace.record("work_hours", work_detail(&request.workload, settings), work);

    let transport_rate = settings.transport_rate(service);
    let transport = transport_hours(request.drive_time_minutes, transport_rate)?;
    trace.record(
        "transport_hours",
        format!("{} min / 60 * 2 * {transport_rate}", request.drive_time_minutes),
        transport,
    );

    let workload = project_workload(work, transport, settings.buffer_rate)?;
    trace.record(
        "buffer_hours",
        format!("(work + transport) * {}", settings.buffer_rate),
        workload.buffer_hours,
    );
    trace.record("total_hours", "work + transport + buffer", workload.total_hours);

    let (low_price, high_price, billing_rate_per_hour) = match &request.pricing {
        PricingStrategy::MarginBased { margin } => {
            require_non_negative(request.loadout_cost_per_hour, "loadout_cost_per_hour")?;
            if request.loadout_cost_per_hour.is_zero() {
                return Err(PricingError::empty_selection(
                    "margin-based pricing needs a loadout with a non-zero hourly cost",
                ));
            }
            let rate = billing_rate(request.loadout_cost_per_hour, *margin)?;
            trace.record(
                "billing_rate",
                format!("{} / (1 - {margin})", request.loadout_cost_per_hour),
                rate.billing_rate_per_hour,
            );
            let price = multiply(workload.total_hours, rate.billing_rate_per_hour, "price")?;
            trace.record("total_price", "total_hours * billing_rate", price);
            (price, price, Some(rate.billing_rate_per_hour))
        }
        PricingStrategy::FixedBand { low_per_hour, high_per_hour } => {
            require_non_negative(*low_per_hour, "low_per_hour")?;
            if high_per_hour < low_per_hour {
                return Err(PricingError::invalid_input(
                    "high_per_hour",
                    format!("band high {high_per_hour} is below band low {low_per_hour}"),
                ));
            }
            let low = multiply(workload.total_hours, *low_per_hour, "low_per_hour")?;
            let high = multiply(workload.total_hours, *high_per_hour, "high_per_hour")?;
            trace.record("low_price", format!("total_hours * {low_per_hour}"), low);
            trace.record("high_price", format!("total_hours * {high_per_hour}"), high);
            (low, high, None)
        }
    };

    let (scope_of_work, whats_included) =
        describe_scope(&request.workload, &workload, settings, scorer)?;

    debug!(
        event_name = "pricing.quote.composed",
        service_type = service.as_str(),
        work_hours = %workload.work_hours,
        total_hours = %workload.total_hours,
        low_price = %low_price,
        high_price = %high_price,
        "quote composed"
    );

    Ok(Quote {
        service_type: service,
        estimated_hours: workload.total_hours,
        workload,
        low_price,
        high_price,
        billing_rate_per_hour,
        scope_of_work,
        whats_included,
        trace,
    })
}

fn work_detail(workload: &WorkloadInput, settings: &EngineSettings) -> String {
    match workload {
        WorkloadInput::ForestryMulching { acreage, dbh_package, production_rate } => {
            format!("{acreage} ac * {dbh_package} in / {production_rate} IA per hour")
        }
        WorkloadInput::StumpGrinding { stumps, production_rate } => format!(
            "max(score of {} stumps / {production_rate}, {})",
            stumps.len(),
            settings.min_stump_job_hours
        ),
        WorkloadInput::LandClearing { estimated_days } => {
            format!("{estimated_days} days * {} hours", settings.hours_per_day)
        }
    }
}

fn describe_scope(
    input: &WorkloadInput,
    workload: &ProjectWorkload,
    settings: &EngineSettings,
    scorer: &dyn StumpScorer,
) -> Result<(Vec<String>, Vec<String>), PricingError> {
    let hours_line = format!(
        "Estimated {} on-site hours plus {} transport and {} buffer hours ({} total)",
        display_hours(workload.work_hours),
        display_hours(workload.transport_hours),
        display_hours(workload.buffer_hours),
        display_hours(workload.total_hours),
    );

    let described = match input {
        WorkloadInput::ForestryMulching { acreage, dbh_package, .. } => {
            let acres = acreage.normalize();
            let ia = inch_acres(*acreage, *dbh_package)?.normalize();
            (
                vec![
                    format!(
                        "Forestry mulching of {acres} acres at the {dbh_package}\" DBH package \
                         ({ia} inch-acres)"
                    ),
                    hours_line,
                ],
                vec![
                    format!(
                        "Mulching of vegetation up to {dbh_package}\" DBH across {acres} acres"
                    ),
                    "Mulch left on site as ground cover".to_string(),
                    "Equipment mobilization and transport".to_string(),
                    "Final walkthrough with the customer".to_string(),
                ],
            )
        }
        WorkloadInput::StumpGrinding { stumps, .. } => {
            let count = stumps.len();
            let noun = if count == 1 { "stump" } else { "stumps" };
            let diameter = sum(stumps.iter().map(|stump| stump.diameter_inches), "diameter")?;
            let deepest = stumps
                .iter()
                .map(|stump| stump.depth_below_feet)
                .max()
                .unwrap_or(Decimal::ZERO);
            let score = total_stump_score(stumps, scorer)?;
            (
                vec![
                    format!(
                        "Grinding of {count} {noun} totaling {}\" of diameter (stump score {})",
                        diameter.normalize(),
                        score.normalize()
                    ),
                    format!("Ground up to {} ft below grade", deepest.normalize()),
                    hours_line,
                ],
                vec![
                    format!("Grinding of {count} {noun}"),
                    "Chips raked back into stump holes".to_string(),
                    "Equipment mobilization and transport".to_string(),
                ],
            )
        }
        WorkloadInput::LandClearing { estimated_days } => {
            let days = estimated_days.normalize();
            (
                vec![
                    format!(
                        "Land clearing over {days} working days \
                         ({} crew hours at {} hours per day)",
                        display_hours(workload.work_hours),
                        settings.hours_per_day.normalize()
                    ),
                    hours_line,
                ],
                vec![
                    format!("Clearing of the designated work area for {days} days"),
                    "Debris processed on site".to_string(),
                    "Equipment mobilization and transport".to_string(),
                ],
            )
        }
    };

    Ok(described)
}

fn display_hours(value: Decimal) -> String {
    value.round_dp(1).normalize().to_string()
}
