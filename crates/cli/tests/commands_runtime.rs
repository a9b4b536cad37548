use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use canopy_cli::commands::billing_rate::{self, BillingRateArgs};
use canopy_cli::commands::employee::{self, EmployeeArgs};
use canopy_cli::commands::equipment::{self, EquipmentArgs};
use canopy_cli::commands::loadout::{self, LoadoutArgs};
use canopy_cli::commands::quote::{self, QuoteArgs};
use canopy_cli::commands::config;
use canopy_core::config::LoadOptions;
use serde_json::Value;
use tempfile::TempDir;

fn sets(pairs: &[&str]) -> Vec<String> {
    pairs.iter().map(|pair| pair.to_string()).collect()
}

#[test]
fn equipment_reports_hourly_cost_breakdown() {
    with_env(&[], || {
        let result = equipment::run(&EquipmentArgs {
            fields: sets(&[
                "purchase_price=65000",
                "useful_life_years=5",
                "annual_finance_cost=3250",
                "annual_insurance=3000",
                "annual_registration=600",
                "annual_hours=2000",
                "fuel_gallons_per_hour=6",
                "fuel_price_per_gallon=3.75",
                "annual_maintenance=8500",
                "annual_repairs=3500",
            ]),
        });
        assert_eq!(result.exit_code, 0, "expected successful equipment costing");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "equipment");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["total_cost_per_hour"], "38.425");
        assert_eq!(payload["data"]["operating_cost_per_hour"], "28.50");
    });
}

#[test]
fn equipment_with_zero_life_is_an_input_failure() {
    with_env(&[], || {
        let result = equipment::run(&EquipmentArgs {
            fields: sets(&[
                "purchase_price=65000",
                "useful_life_years=0",
                "annual_hours=2000",
                "fuel_gallons_per_hour=6",
                "fuel_price_per_gallon=3.75",
            ]),
        });
        assert_eq!(result.exit_code, 3, "expected intake validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "intake_validation");
        assert!(payload["data"].is_null());
    });
}

#[test]
fn employee_uses_configured_default_burden() {
    with_env(&[("CANOPY_PRICING_DEFAULT_BURDEN_MULTIPLIER", "1.8")], || {
        let result = employee::run(
            &EmployeeArgs { fields: sets(&["base_hourly_rate=35"]) },
            &LoadOptions::default(),
        );
        assert_eq!(result.exit_code, 0, "expected successful employee costing");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["true_cost_per_hour"], "63.0");
        assert_eq!(payload["data"]["burden_multiplier"], "1.8");
    });
}

#[test]
fn employee_returns_config_failure_for_invalid_env() {
    with_env(&[("CANOPY_PRICING_DEFAULT_MARGIN", "1.5")], || {
        let result = employee::run(
            &EmployeeArgs { fields: sets(&["base_hourly_rate=35"]) },
            &LoadOptions::default(),
        );
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "employee");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn loadout_sums_member_rates() {
    with_env(&[], || {
        let result = loadout::run(&LoadoutArgs {
            equipment: sets(&["38.425", "12.10"]),
            labor: sets(&["59.50"]),
        });
        assert_eq!(result.exit_code, 0, "expected successful loadout aggregation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["total_equipment_cost_per_hour"], "50.525");
        assert_eq!(payload["data"]["total_loadout_cost_per_hour"], "110.025");
    });
}

#[test]
fn loadout_rejects_rates_beyond_decimal_range() {
    with_env(&[], || {
        let result = loadout::run(&LoadoutArgs {
            equipment: sets(&["79228162514264337593543950335", "1"]),
            labor: Vec::new(),
        });
        assert_eq!(result.exit_code, 4, "expected pricing failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_input");
        assert!(payload["data"].is_null());
    });
}

#[test]
fn billing_rate_doubles_cost_at_half_margin() {
    with_env(&[], || {
        let result = billing_rate::run(
            &BillingRateArgs { cost: "246.43".to_string(), margin: Some("0.5".to_string()) },
            &LoadOptions::default(),
        );
        assert_eq!(result.exit_code, 0, "expected successful billing rate");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "billing-rate");
        assert_eq!(payload["data"]["billing_rate_per_hour"], "492.86");
    });
}

#[test]
fn billing_rate_rejects_full_margin() {
    with_env(&[], || {
        let result = billing_rate::run(
            &BillingRateArgs { cost: "100".to_string(), margin: Some("1".to_string()) },
            &LoadOptions::default(),
        );
        assert_eq!(result.exit_code, 3, "expected intake validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert!(payload["message"].as_str().unwrap_or_default().contains("margin"));
    });
}

#[test]
fn band_quote_reports_price_range() {
    with_env(&[], || {
        let result = quote::run(
            &QuoteArgs {
                service: "forestry_mulching".to_string(),
                fields: sets(&[
                    "acreage=8",
                    "dbh_package=6",
                    "strategy=band",
                    "drive_time_minutes=45",
                    "loadout_cost_per_hour=150",
                ]),
                record: false,
            },
            &LoadOptions::default(),
        );
        assert_eq!(result.exit_code, 0, "expected successful quote");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["service_type"], "forestry_mulching");
        assert!(payload["data"]["billing_rate_per_hour"].is_null());
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.starts_with("Forestry Mulching quote:"), "message: {message}");
        assert!(message.contains("(margin over loadout cost 50% to 62.5%)"), "message: {message}");
    });
}

#[test]
fn recorded_quote_carries_checksum() {
    with_env(&[], || {
        let result = quote::run(
            &QuoteArgs {
                service: "land_clearing".to_string(),
                fields: sets(&["estimated_days=2", "loadout_cost_per_hour=200"]),
                record: true,
            },
            &LoadOptions::default(),
        );
        assert_eq!(result.exit_code, 0, "expected successful recorded quote");

        let payload = parse_payload(&result.output);
        let checksum = payload["data"]["input_checksum"].as_str().unwrap_or_default();
        assert!(checksum.starts_with("sha256:"));
        let settings = payload["data"]["settings_checksum"].as_str().unwrap_or_default();
        assert!(settings.starts_with("sha256:") && settings != checksum);
        assert_eq!(payload["data"]["quote"]["billing_rate_per_hour"], "400");
    });
}

#[test]
fn unknown_service_is_an_engine_class_failure() {
    with_env(&[], || {
        let result = quote::run(
            &QuoteArgs {
                service: "tree_removal".to_string(),
                fields: Vec::new(),
                record: false,
            },
            &LoadOptions::default(),
        );
        assert_eq!(result.exit_code, 3, "intake forwards engine errors with the input exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "unknown_service_type");
    });
}

#[test]
fn config_reports_sources_across_layers() {
    with_env(&[("CANOPY_PRICING_BUFFER_RATE", "0.2")], || {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("canopy.toml");
        fs::write(&path, "[pricing]\ndefault_margin = 0.4\n").expect("write config");

        let result = config::run(&LoadOptions {
            config_path: Some(path.clone()),
            require_file: true,
            ..LoadOptions::default()
        });
        assert_eq!(result.exit_code, 0, "expected successful config inspection");

        let payload = parse_payload(&result.output);
        let entries = payload["data"].as_array().cloned().unwrap_or_default();
        let source_of = |key: &str| {
            entries
                .iter()
                .find(|entry| entry["key"] == key)
                .and_then(|entry| entry["source"].as_str().map(str::to_string))
                .unwrap_or_default()
        };

        assert_eq!(source_of("pricing.default_margin"), format!("file ({})", path.display()));
        assert_eq!(source_of("pricing.buffer_rate"), "env (CANOPY_PRICING_BUFFER_RATE)");
        assert_eq!(source_of("pricing.hours_per_day"), "default");
    });
}

#[test]
fn config_requires_explicit_file_to_exist() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let result = config::run(&LoadOptions {
            config_path: Some(dir.path().join("missing.toml")),
            require_file: true,
            ..LoadOptions::default()
        });
        assert_eq!(result.exit_code, 2, "expected config failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.starts_with("configuration failure:"), "message: {message}");
        assert!(message.contains("missing.toml"), "message: {message}");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CANOPY_PRICING_DEFAULT_BURDEN_MULTIPLIER",
        "CANOPY_PRICING_DEFAULT_MARGIN",
        "CANOPY_PRICING_BUFFER_RATE",
        "CANOPY_PRICING_HOURS_PER_DAY",
        "CANOPY_PRICING_MIN_STUMP_JOB_HOURS",
        "CANOPY_TRANSPORT_FORESTRY_MULCHING",
        "CANOPY_TRANSPORT_STUMP_GRINDING",
        "CANOPY_TRANSPORT_LAND_CLEARING",
        "CANOPY_PRODUCTION_MULCHER",
        "CANOPY_PRODUCTION_HIGH_THROUGHPUT_MULCHER",
        "CANOPY_PRODUCTION_STUMP_GRINDER",
        "CANOPY_PRODUCTION_DEFAULT_MULCHER",
        "CANOPY_LOGGING_LEVEL",
        "CANOPY_LOGGING_FORMAT",
        "CANOPY_LOG_LEVEL",
        "CANOPY_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}
