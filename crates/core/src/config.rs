use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::service::ServiceType;
use crate::pricing::settings::{EngineSettings, MulcherClass, PriceBand};

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub engine: EngineSettings,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub default_margin: Option<Decimal>,
    pub default_burden_multiplier: Option<Decimal>,
    pub buffer_rate: Option<Decimal>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("canopy.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        self.engine.clone()
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        let engine = &mut self.engine;

        if let Some(pricing) = patch.pricing {
            if let Some(value) = pricing.default_burden_multiplier {
                engine.default_burden_multiplier = value;
            }
            if let Some(value) = pricing.default_margin {
                engine.default_margin = value;
            }
            if let Some(value) = pricing.buffer_rate {
                engine.buffer_rate = value;
            }
            if let Some(value) = pricing.hours_per_day {
                engine.hours_per_day = value;
            }
            if let Some(value) = pricing.min_stump_job_hours {
                engine.min_stump_job_hours = value;
            }
        }

        if let Some(transport) = patch.transport {
            if let Some(value) = transport.forestry_mulching {
                engine.transport.forestry_mulching = value;
            }
            if let Some(value) = transport.stump_grinding {
                engine.transport.stump_grinding = value;
            }
            if let Some(value) = transport.land_clearing {
                engine.transport.land_clearing = value;
            }
        }

        if let Some(production) = patch.production {
            if let Some(value) = production.mulcher {
                engine.production.mulcher = value;
            }
            if let Some(value) = production.high_throughput_mulcher {
                engine.production.high_throughput_mulcher = value;
            }
            if let Some(value) = production.stump_grinder {
                engine.production.stump_grinder = value;
            }
            if let Some(value) = production.default_mulcher {
                engine.production.default_mulcher = value;
            }
        }

        if let Some(bands) = patch.bands {
            apply_band(&mut engine.bands.forestry_mulching, bands.forestry_mulching);
            apply_band(&mut engine.bands.stump_grinding, bands.stump_grinding);
            apply_band(&mut engine.bands.land_clearing, bands.land_clearing);
        }

        if let Some(stump_score) = patch.stump_score {
            if let Some(value) = stump_score.height_weight {
                engine.stump_score.height_weight = value;
            }
            if let Some(value) = stump_score.depth_weight {
                engine.stump_score.depth_weight = value;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let engine = &mut self.engine;

        if let Some(value) = read_env_decimal("CANOPY_PRICING_DEFAULT_BURDEN_MULTIPLIER")? {
            engine.default_burden_multiplier = value;
        }
        if let Some(value) = read_env_decimal("CANOPY_PRICING_DEFAULT_MARGIN")? {
            engine.default_margin = value;
        }
        if let Some(value) = read_env_decimal("CANOPY_PRICING_BUFFER_RATE")? {
            engine.buffer_rate = value;
        }
        if let Some(value) = read_env_decimal("CANOPY_PRICING_HOURS_PER_DAY")? {
            engine.hours_per_day = value;
        }
        if let Some(value) = read_env_decimal("CANOPY_PRICING_MIN_STUMP_JOB_HOURS")? {
            engine.min_stump_job_hours = value;
        }

        if let Some(value) = read_env_decimal("CANOPY_TRANSPORT_FORESTRY_MULCHING")? {
            engine.transport.forestry_mulching = value;
        }
        if let Some(value) = read_env_decimal("CANOPY_TRANSPORT_STUMP_GRINDING")? {
            engine.transport.stump_grinding = value;
        }
        if let Some(value) = read_env_decimal("CANOPY_TRANSPORT_LAND_CLEARING")? {
            engine.transport.land_clearing = value;
        }

        if let Some(value) = read_env_decimal("CANOPY_PRODUCTION_MULCHER")? {
            engine.production.mulcher = value;
        }
        if let Some(value) = read_env_decimal("CANOPY_PRODUCTION_HIGH_THROUGHPUT_MULCHER")? {
            engine.production.high_throughput_mulcher = value;
        }
        if let Some(value) = read_env_decimal("CANOPY_PRODUCTION_STUMP_GRINDER")? {
            engine.production.stump_grinder = value;
        }
        if let Some(value) = read_env("CANOPY_PRODUCTION_DEFAULT_MULCHER") {
            engine.production.default_mulcher = value.parse::<MulcherClass>().map_err(|_| {
                ConfigError::InvalidEnvOverride {
                    key: "CANOPY_PRODUCTION_DEFAULT_MULCHER".to_string(),
                    value,
                }
            })?;
        }

        let log_level = read_env("CANOPY_LOGGING_LEVEL").or_else(|| read_env("CANOPY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CANOPY_LOGGING_FORMAT").or_else(|| read_env("CANOPY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(default_margin) = overrides.default_margin {
            self.engine.default_margin = default_margin;
        }
        if let Some(default_burden_multiplier) = overrides.default_burden_multiplier {
            self.engine.default_burden_multiplier = default_burden_multiplier;
        }
        if let Some(buffer_rate) = overrides.buffer_rate {
            self.engine.buffer_rate = buffer_rate;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_pricing(&self.engine)?;
        validate_transport(&self.engine)?;
        validate_production(&self.engine)?;
        validate_bands(&self.engine)?;
        validate_stump_score(&self.engine)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("canopy.toml"), PathBuf::from("config/canopy.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn apply_band(band: &mut PriceBand, patch: Option<BandPatch>) {
    let Some(patch) = patch else {
        return;
    };
    if let Some(low) = patch.low {
        band.low_per_hour = low;
    }
    if let Some(high) = patch.high {
        band.high_per_hour = high;
    }
}

fn validate_pricing(engine: &EngineSettings) -> Result<(), ConfigError> {
    if engine.default_burden_multiplier < Decimal::ONE {
        return Err(ConfigError::Validation(
            "pricing.default_burden_multiplier must be at least 1".to_string(),
        ));
    }

    if engine.default_margin < Decimal::ZERO || engine.default_margin >= Decimal::ONE {
        return Err(ConfigError::Validation(
            "pricing.default_margin must be a fraction in [0, 1)".to_string(),
        ));
    }

    if engine.buffer_rate < Decimal::ZERO || engine.buffer_rate > Decimal::ONE {
        return Err(ConfigError::Validation(
            "pricing.buffer_rate must be in range 0..=1".to_string(),
        ));
    }

    if engine.hours_per_day <= Decimal::ZERO || engine.hours_per_day > Decimal::from(24) {
        return Err(ConfigError::Validation(
            "pricing.hours_per_day must be in range (0, 24]".to_string(),
        ));
    }

    if engine.min_stump_job_hours < Decimal::ZERO {
        return Err(ConfigError::Validation(
            "pricing.min_stump_job_hours must not be negative".to_string(),
        ));
    }

    Ok(())
}

fn validate_transport(engine: &EngineSettings) -> Result<(), ConfigError> {
    for service in ServiceType::ALL {
        if engine.transport_rate(service) < Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "transport.{service} must not be negative"
            )));
        }
    }
    Ok(())
}

fn validate_production(engine: &EngineSettings) -> Result<(), ConfigError> {
    let rates = [
        ("production.mulcher", engine.production.mulcher),
        ("production.high_throughput_mulcher", engine.production.high_throughput_mulcher),
        ("production.stump_grinder", engine.production.stump_grinder),
    ];
    for (key, rate) in rates {
        if rate <= Decimal::ZERO {
            return Err(ConfigError::Validation(format!("{key} must be greater than zero")));
        }
    }
    Ok(())
}

fn validate_bands(engine: &EngineSettings) -> Result<(), ConfigError> {
    for service in ServiceType::ALL {
        let band = engine.band(service);
        if band.low_per_hour < Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "bands.{service}.low must not be negative"
            )));
        }
        if band.high_per_hour < band.low_per_hour {
            return Err(ConfigError::Validation(format!(
                "bands.{service}.high must not be below bands.{service}.low"
            )));
        }
    }
    Ok(())
}

fn validate_stump_score(engine: &EngineSettings) -> Result<(), ConfigError> {
    if engine.stump_score.height_weight < Decimal::ZERO
        || engine.stump_score.depth_weight < Decimal::ZERO
    {
        return Err(ConfigError::Validation("stump_score weights must not be negative".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn read_env_decimal(key: &str) -> Result<Option<Decimal>, ConfigError> {
    read_env(key)
        .map(|value| {
            Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidEnvOverride {
                key: key.to_string(),
                value,
            })
        })
        .transpose()
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    pricing: Option<PricingPatch>,
    transport: Option<TransportPatch>,
    production: Option<ProductionPatch>,
    bands: Option<BandsPatch>,
    stump_score: Option<StumpScorePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    default_burden_multiplier: Option<Decimal>,
    default_margin: Option<Decimal>,
    buffer_rate: Option<Decimal>,
    hours_per_day: Option<Decimal>,
    min_stump_job_hours: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct TransportPatch {
    forestry_mulching: Option<Decimal>,
    stump_grinding: Option<Decimal>,
    land_clearing: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct ProductionPatch {
    mulcher: Option<Decimal>,
    high_throughput_mulcher: Option<Decimal>,
    stump_grinder: Option<Decimal>,
    default_mulcher: Option<MulcherClass>,
}

#[derive(Debug, Default, Deserialize)]
struct BandsPatch {
    forestry_mulching: Option<BandPatch>,
    stump_grinding: Option<BandPatch>,
    land_clearing: Option<BandPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct BandPatch {
    low: Option<Decimal>,
    high: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct StumpScorePatch {
    height_weight: Option<Decimal>,
    depth_weight: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
