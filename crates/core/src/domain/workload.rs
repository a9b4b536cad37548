use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::service::{DbhPackage, ServiceType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stump {
    pub diameter_inches: Decimal,
    pub height_above_feet: Decimal,
    pub depth_below_feet: Decimal,
}

/// Physical project inputs for one service, before transport and buffer time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum WorkloadInput {
    ForestryMulching {
        acreage: Decimal,
        dbh_package: DbhPackage,
        /// Inch-acres per hour for the machine on the job.
        production_rate: Decimal,
    },
    StumpGrinding {
        stumps: Vec<Stump>,
        /// Stump-score points per hour.
        production_rate: Decimal,
    },
    LandClearing {
        estimated_days: Decimal,
    },
}

impl WorkloadInput {
    pub fn service_type(&self) -> ServiceType {
        match self {
            Self::ForestryMulching { .. } => ServiceType::ForestryMulching,
            Self::StumpGrinding { .. } => ServiceType::StumpGrinding,
            Self::LandClearing { .. } => ServiceType::LandClearing,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWorkload {
    pub work_hours: Decimal,
    pub transport_hours: Decimal,
    pub buffer_hours: Decimal,
    pub total_hours: Decimal,
}
