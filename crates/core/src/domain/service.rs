use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    ForestryMulching,
    StumpGrinding,
    LandClearing,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] =
        [ServiceType::ForestryMulching, ServiceType::StumpGrinding, ServiceType::LandClearing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForestryMulching => "forestry_mulching",
            Self::StumpGrinding => "stump_grinding",
            Self::LandClearing => "land_clearing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ForestryMulching => "Forestry Mulching",
            Self::StumpGrinding => "Stump Grinding",
            Self::LandClearing => "Land Clearing",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "forestry_mulching" | "mulching" => Ok(Self::ForestryMulching),
            "stump_grinding" | "grinding" => Ok(Self::StumpGrinding),
            "land_clearing" | "clearing" => Ok(Self::LandClearing),
            _ => Err(PricingError::UnknownServiceType(value.trim().to_string())),
        }
    }
}

/// Coarse diameter-at-breast-height class a mulching job is sold at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DbhPackage {
    Four,
    Six,
    Eight,
}

impl DbhPackage {
    pub fn inches(&self) -> Decimal {
        Decimal::from(u8::from(*self))
    }
}

impl From<DbhPackage> for u8 {
    fn from(value: DbhPackage) -> Self {
        match value {
            DbhPackage::Four => 4,
            DbhPackage::Six => 6,
            DbhPackage::Eight => 8,
        }
    }
}

impl TryFrom<u8> for DbhPackage {
    type Error = PricingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            6 => Ok(Self::Six),
            8 => Ok(Self::Eight),
            other => Err(PricingError::invalid_input(
                "dbh_package",
                format!("{other} is not a DBH package (expected 4|6|8)"),
            )),
        }
    }
}

impl fmt::Display for DbhPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::{DbhPackage, ServiceType};
    use crate::errors::PricingError;

    #[test]
    fn service_type_parsing_is_case_and_separator_insensitive() {
        assert_eq!("Forestry-Mulching".parse::<ServiceType>(), Ok(ServiceType::ForestryMulching));
        assert_eq!(" stump grinding ".parse::<ServiceType>(), Ok(ServiceType::StumpGrinding));
        assert_eq!("LAND_CLEARING".parse::<ServiceType>(), Ok(ServiceType::LandClearing));
    }

    #[test]
    fn unrecognized_service_type_is_rejected() {
        let error = "tree_removal".parse::<ServiceType>().expect_err("not a priced service");
        assert_eq!(error, PricingError::UnknownServiceType("tree_removal".to_string()));
    }

    #[test]
    fn dbh_package_only_accepts_known_classes() {
        assert_eq!(DbhPackage::try_from(6), Ok(DbhPackage::Six));
        assert!(matches!(DbhPackage::try_from(5), Err(PricingError::InvalidInput { .. })));
        assert_eq!(DbhPackage::Eight.inches(), rust_decimal::Decimal::from(8));
    }

    #[test]
    fn dbh_package_serializes_as_inches() {
        let json = serde_json::to_string(&DbhPackage::Four).expect("serialize");
        assert_eq!(json, "4");
        let parsed: DbhPackage = serde_json::from_str("8").expect("deserialize");
        assert_eq!(parsed, DbhPackage::Eight);
        assert!(serde_json::from_str::<DbhPackage>("7").is_err());
    }
}
