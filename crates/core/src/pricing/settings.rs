use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceType;
use crate::errors::PricingError;

/// Tunable defaults for one pricing caller. Passed explicitly into every
/// top-level calculation so callers with different settings never interfere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub default_burden_multiplier: Decimal,
    pub default_margin: Decimal,
    pub buffer_rate: Decimal,
    pub hours_per_day: Decimal,
    pub min_stump_job_hours: Decimal,
    pub transport: TransportRates,
    pub production: ProductionRates,
    pub bands: PriceBands,
    pub stump_score: StumpScoreWeights,
}

/// Share of round-trip drive time billed, per service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRates {
    pub forestry_mulching: Decimal,
    pub stump_grinding: Decimal,
    pub land_clearing: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MulcherClass {
    Mulcher,
    HighThroughputMulcher,
}

impl MulcherClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mulcher => "mulcher",
            Self::HighThroughputMulcher => "high_throughput_mulcher",
        }
    }
}

impl fmt::Display for MulcherClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MulcherClass {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "mulcher" => Ok(Self::Mulcher),
            "high_throughput_mulcher" | "high_throughput" => Ok(Self::HighThroughputMulcher),
            other => Err(PricingError::invalid_input(
                "mulcher",
                format!(
                    "unsupported mulcher class `{other}` \
                     (expected mulcher|high_throughput_mulcher)"
                ),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRates {
    /// Inch-acres per hour.
    pub mulcher: Decimal,
    /// Inch-acres per hour.
    pub high_throughput_mulcher: Decimal,
    /// Stump-score points per hour.
    pub stump_grinder: Decimal,
    pub default_mulcher: MulcherClass,
}

impl ProductionRates {
    pub fn mulching_rate(&self, class: MulcherClass) -> Decimal {
        match class {
            MulcherClass::Mulcher => self.mulcher,
            MulcherClass::HighThroughputMulcher => self.high_throughput_mulcher,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub low_per_hour: Decimal,
    pub high_per_hour: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBands {
    pub forestry_mulching: PriceBand,
    pub stump_grinding: PriceBand,
    pub land_clearing: PriceBand,
}

/// Weights of the default stump scorer:
/// `diameter^2 * (height_weight * height + depth_weight * depth)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StumpScoreWeights {
    pub height_weight: Decimal,
    pub depth_weight: Decimal,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_burden_multiplier: Decimal::new(17, 1),
            default_margin: Decimal::new(50, 2),
            buffer_rate: Decimal::new(10, 2),
            hours_per_day: Decimal::from(8),
            min_stump_job_hours: Decimal::new(5, 1),
            transport: TransportRates {
                forestry_mulching: Decimal::new(5, 1),
                stump_grinding: Decimal::new(3, 1),
                land_clearing: Decimal::new(5, 1),
            },
            production: ProductionRates {
                mulcher: Decimal::new(13, 1),
                high_throughput_mulcher: Decimal::from(5),
                stump_grinder: Decimal::from(400),
                default_mulcher: MulcherClass::Mulcher,
            },
            bands: PriceBands {
                forestry_mulching: PriceBand {
                    low_per_hour: Decimal::from(300),
                    high_per_hour: Decimal::from(400),
                },
                stump_grinding: PriceBand {
                    low_per_hour: Decimal::from(200),
                    high_per_hour: Decimal::from(300),
                },
                land_clearing: PriceBand {
                    low_per_hour: Decimal::from(250),
                    high_per_hour: Decimal::from(350),
                },
            },
            stump_score: StumpScoreWeights {
                height_weight: Decimal::ONE,
                depth_weight: Decimal::ONE,
            },
        }
    }
}

impl EngineSettings {
    pub fn transport_rate(&self, service: ServiceType) -> Decimal {
        match service {
            ServiceType::ForestryMulching => self.transport.forestry_mulching,
            ServiceType::StumpGrinding => self.transport.stump_grinding,
            ServiceType::LandClearing => self.transport.land_clearing,
        }
    }

    pub fn band(&self, service: ServiceType) -> &PriceBand {
        match service {
            ServiceType::ForestryMulching => &self.bands.forestry_mulching,
            ServiceType::StumpGrinding => &self.bands.stump_grinding,
            ServiceType::LandClearing => &self.bands.land_clearing,
        }
    }
}
