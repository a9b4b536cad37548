use rust_decimal::Decimal;

use crate::domain::service::DbhPackage;
use crate::domain::workload::{ProjectWorkload, Stump, WorkloadInput};
use crate::errors::PricingError;
use crate::pricing::settings::EngineSettings;
use crate::pricing::stump::StumpScorer;
use crate::pricing::{add, divide, multiply, require_non_negative, require_positive};

const MINUTES_PER_HOUR: i64 = 60;

pub fn inch_acres(acreage: Decimal, dbh_package: DbhPackage) -> Result<Decimal, PricingError> {
    require_non_negative(acreage, "acreage")?;
    multiply(acreage, dbh_package.inches(), "acreage")
}

pub fn mulching_work_hours(
    acreage: Decimal,
    dbh_package: DbhPackage,
    production_rate: Decimal,
) -> Result<Decimal, PricingError> {
    require_positive(production_rate, "production_rate")?;
    divide(inch_acres(acreage, dbh_package)?, production_rate, "production_rate")
}

pub fn total_stump_score(
    stumps: &[Stump],
    scorer: &dyn StumpScorer,
) -> Result<Decimal, PricingError> {
    stumps.iter().try_fold(Decimal::ZERO, |total, stump| -> Result<Decimal, PricingError> {
        let score = scorer.score(stump)?;
        require_non_negative(score, "stump_score")?;
        add(total, score, "stump_score")
    })
}

/// Grinding hours for a whole job, never below `min_job_hours` so that a
/// single small stump still covers mobilization.
pub fn stump_grinding_work_hours(
    stumps: &[Stump],
    production_rate: Decimal,
    min_job_hours: Decimal,
    scorer: &dyn StumpScorer,
) -> Result<Decimal, PricingError> {
    require_positive(production_rate, "production_rate")?;
    require_non_negative(min_job_hours, "min_stump_job_hours")?;
    if stumps.is_empty() {
        return Err(PricingError::empty_selection("stump grinding job has no stumps"));
    }

    let hours = divide(total_stump_score(stumps, scorer)?, production_rate, "production_rate")?;
    Ok(hours.max(min_job_hours))
}

pub fn land_clearing_work_hours(
    estimated_days: Decimal,
    hours_per_day: Decimal,
) -> Result<Decimal, PricingError> {
    require_non_negative(estimated_days, "estimated_days")?;
    require_positive(hours_per_day, "hours_per_day")?;
    multiply(estimated_days, hours_per_day, "estimated_days")
}

/// On-site hours for whichever service the workload describes.
pub fn work_hours(
    workload: &WorkloadInput,
    settings: &EngineSettings,
    scorer: &dyn StumpScorer,
) -> Result<Decimal, PricingError> {
    match workload {
        WorkloadInput::ForestryMulching { acreage, dbh_package, production_rate } => {
            mulching_work_hours(*acreage, *dbh_package, *production_rate)
        }
        WorkloadInput::StumpGrinding { stumps, production_rate } => {
            let min_job_hours = settings.min_stump_job_hours;
            stump_grinding_work_hours(stumps, *production_rate, min_job_hours, scorer)
        }
        WorkloadInput::LandClearing { estimated_days } => {
            land_clearing_work_hours(*estimated_days, settings.hours_per_day)
        }
    }
}

/// Billed travel: the round trip at `transport_rate` of on-site time.
pub fn transport_hours(
    drive_time_minutes: Decimal,
    transport_rate: Decimal,
) -> Result<Decimal, PricingError> {
    require_non_negative(drive_time_minutes, "drive_time_minutes")?;
    require_non_negative(transport_rate, "transport_rate")?;
    let minutes_per_hour = Decimal::from(MINUTES_PER_HOUR);
    let one_way = divide(drive_time_minutes, minutes_per_hour, "drive_time_minutes")?;
    let round_trip = multiply(one_way, Decimal::TWO, "drive_time_minutes")?;
    multiply(round_trip, transport_rate, "transport_rate")
}

pub fn project_workload(
    work_hours: Decimal,
    transport_hours: Decimal,
    buffer_rate: Decimal,
) -> Result<ProjectWorkload, PricingError> {
    require_non_negative(work_hours, "work_hours")?;
    require_non_negative(transport_hours, "transport_hours")?;
    require_non_negative(buffer_rate, "buffer_rate")?;

    let on_site_and_travel = add(work_hours, transport_hours, "total_hours")?;
    let buffer_hours = multiply(on_site_and_travel, buffer_rate, "buffer_rate")?;
    Ok(ProjectWorkload {
        work_hours,
        transport_hours,
        buffer_hours,
        total_hours: add(on_site_and_travel, buffer_hours, "total_hours")?,
    })
}
