pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use canopy_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};
use clap::{Parser, Subcommand};
use tracing::Level;

type LoggingInitError = Box<dyn std::error::Error + Send + Sync + 'static>;

use crate::commands::billing_rate::BillingRateArgs;
use crate::commands::employee::EmployeeArgs;
use crate::commands::equipment::EquipmentArgs;
use crate::commands::loadout::LoadoutArgs;
use crate::commands::quote::QuoteArgs;

#[derive(Debug, Parser)]
#[command(
    name = "canopy",
    about = "Canopy land-management pricing CLI",
    long_about = "Cost equipment and crews, convert loadout cost to billing rates, and compose \
                  project quotes for forestry mulching, stump grinding and land clearing.",
    after_help = "Examples:\n  \
                  canopy employee --set base_hourly_rate=35 --set position=experienced\n  \
                  canopy billing-rate --cost 246.43 --margin 0.5\n  \
                  canopy quote --service forestry_mulching --set acreage=8 --set dbh_package=6 \
                  --set strategy=band\n  \
                  canopy config"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Explicit canopy.toml to load")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "LEVEL", help = "Override logging.level")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Hourly ownership and operating cost of one machine")]
    Equipment(EquipmentArgs),
    #[command(about = "Burdened hourly cost of one crew member")]
    Employee(EmployeeArgs),
    #[command(about = "Combined hourly cost of a crew loadout")]
    Loadout(LoadoutArgs),
    #[command(about = "Convert an hourly cost into a billing rate at a target margin")]
    BillingRate(BillingRateArgs),
    #[command(about = "Compose a project quote, optionally as an auditable record")]
    Quote(QuoteArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                log_level: self.log_level.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    let logging = AppConfig::load(options.clone())
        .map(|config| config.logging)
        .unwrap_or_default();
    if let Err(error) = init_logging(&logging) {
        eprintln!("canopy: diagnostics logging disabled: {error}");
    }

    let result = match &cli.command {
        Command::Equipment(args) => commands::equipment::run(args),
        Command::Employee(args) => commands::employee::run(args, &options),
        Command::Loadout(args) => commands::loadout::run(args),
        Command::BillingRate(args) => commands::billing_rate::run(args, &options),
        Command::Quote(args) => commands::quote::run(args, &options),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Diagnostics go to stderr so stdout stays a single JSON payload.
fn init_logging(logging: &LoggingConfig) -> Result<(), LoggingInitError> {
    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
