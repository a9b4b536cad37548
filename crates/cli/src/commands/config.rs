use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use canopy_core::config::{resolve_config_path, AppConfig, LoadOptions, LogFormat};
use canopy_core::domain::service::ServiceType;
use canopy_core::errors::ApplicationError;
use serde::Serialize;
use toml::Value;

use super::CommandResult;

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: String,
    value: String,
    source: String,
}

struct Sources {
    file_path: Option<PathBuf>,
    file_doc: Option<Value>,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, ApplicationError::from(error)),
    };

    let file_path = resolve_config_path(options.config_path.as_deref());
    let file_doc = load_config_file_doc(file_path.as_deref());
    let sources = Sources { file_path, file_doc };
    let entries = collect_entries(&config, options, &sources);

    let mut lines = vec![
        "effective config (source precedence: cli > env > file > default):".to_string(),
    ];
    lines.extend(entries.iter().map(render_line));

    CommandResult::success_with_data(COMMAND, lines.join("\n"), &entries)
}

fn collect_entries(
    config: &AppConfig,
    options: &LoadOptions,
    sources: &Sources,
) -> Vec<ConfigEntry> {
    let engine = &config.engine;
    let overrides = &options.overrides;
    let mut entries = Vec::new();

    let mut push = |key: &str, value: String, env_keys: &[&str], overridden: bool| {
        entries.push(ConfigEntry {
            key: key.to_string(),
            value,
            source: field_source(key, env_keys, overridden, sources),
        });
    };

    push(
        "pricing.default_burden_multiplier",
        engine.default_burden_multiplier.to_string(),
        &["CANOPY_PRICING_DEFAULT_BURDEN_MULTIPLIER"],
        overrides.default_burden_multiplier.is_some(),
    );
    push(
        "pricing.default_margin",
        engine.default_margin.to_string(),
        &["CANOPY_PRICING_DEFAULT_MARGIN"],
        overrides.default_margin.is_some(),
    );
    push(
        "pricing.buffer_rate",
        engine.buffer_rate.to_string(),
        &["CANOPY_PRICING_BUFFER_RATE"],
        overrides.buffer_rate.is_some(),
    );
    push(
        "pricing.hours_per_day",
        engine.hours_per_day.to_string(),
        &["CANOPY_PRICING_HOURS_PER_DAY"],
        false,
    );
    push(
        "pricing.min_stump_job_hours",
        engine.min_stump_job_hours.to_string(),
        &["CANOPY_PRICING_MIN_STUMP_JOB_HOURS"],
        false,
    );

    for service in ServiceType::ALL {
        let key = format!("transport.{service}");
        let env_key = format!("CANOPY_TRANSPORT_{}", service.as_str().to_ascii_uppercase());
        push(&key, engine.transport_rate(service).to_string(), &[env_key.as_str()], false);
    }

    push(
        "production.mulcher",
        engine.production.mulcher.to_string(),
        &["CANOPY_PRODUCTION_MULCHER"],
        false,
    );
    push(
        "production.high_throughput_mulcher",
        engine.production.high_throughput_mulcher.to_string(),
        &["CANOPY_PRODUCTION_HIGH_THROUGHPUT_MULCHER"],
        false,
    );
    push(
        "production.stump_grinder",
        engine.production.stump_grinder.to_string(),
        &["CANOPY_PRODUCTION_STUMP_GRINDER"],
        false,
    );
    push(
        "production.default_mulcher",
        engine.production.default_mulcher.to_string(),
        &["CANOPY_PRODUCTION_DEFAULT_MULCHER"],
        false,
    );

    for service in ServiceType::ALL {
        let band = engine.band(service);
        push(&format!("bands.{service}.low"), band.low_per_hour.to_string(), &[], false);
        push(&format!("bands.{service}.high"), band.high_per_hour.to_string(), &[], false);
    }

    push("stump_score.height_weight", engine.stump_score.height_weight.to_string(), &[], false);
    push("stump_score.depth_weight", engine.stump_score.depth_weight.to_string(), &[], false);

    push(
        "logging.level",
        config.logging.level.clone(),
        &["CANOPY_LOGGING_LEVEL", "CANOPY_LOG_LEVEL"],
        overrides.log_level.is_some(),
    );
    push(
        "logging.format",
        log_format_name(config.logging.format).to_string(),
        &["CANOPY_LOGGING_FORMAT", "CANOPY_LOG_FORMAT"],
        overrides.log_format.is_some(),
    );

    entries
}

fn log_format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(key_path: &str, env_keys: &[&str], overridden: bool, sources: &Sources) -> String {
    if overridden {
        return "cli".to_string();
    }

    for env_key in env_keys {
        if env::var(env_key).is_ok_and(|value| !value.trim().is_empty()) {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = sources.file_doc.as_ref() {
        if contains_path(doc, key_path) {
            let file_path = sources
                .file_path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(entry: &ConfigEntry) -> String {
    format!("- {} = {} (source: {})", entry.key, entry.value, entry.source)
}
