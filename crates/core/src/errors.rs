use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::ConfigError;
use crate::intake::IntakeError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },
    #[error("invalid margin {margin}: expected a fraction in [0, 1)")]
    InvalidMargin { margin: Decimal },
    #[error("invalid burden multiplier {multiplier}: must be at least 1")]
    InvalidBurden { multiplier: Decimal },
    #[error(
        "unknown service type `{0}` (expected forestry_mulching|stump_grinding|land_clearing)"
    )]
    UnknownServiceType(String),
    #[error("empty selection: {what}")]
    EmptySelection { what: String },
}

impl PricingError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field: field.into(), reason: reason.into() }
    }

    pub fn empty_selection(what: impl Into<String>) -> Self {
        Self::EmptySelection { what: what.into() }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::InvalidMargin { .. } => "invalid_margin",
            Self::InvalidBurden { .. } => "invalid_burden",
            Self::UnknownServiceType(_) => "unknown_service_type",
            Self::EmptySelection { .. } => "empty_selection",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Pricing(error) | Self::Intake(IntakeError::Pricing(error)) => error.error_class(),
            Self::Intake(_) => "intake_validation",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Intake(_) => 3,
            Self::Pricing(_) => 4,
        }
    }

    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The pricing request could not be processed. Check inputs and try again."
            }
            Self::Internal { .. } => "Pricing is misconfigured. Review canopy.toml and try again.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Pricing(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Intake(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
