use std::path::PathBuf;

use clap::Parser;
use serde_json::{Map, Value};

use dh_logger::config::load_config;
use dh_logger::observability::logging::init_logging;
use dh_logger::{facade, LoggerConfig};

#[derive(Parser)]
#[command(name = "dh-log")]
#[command(about = "Send one record through the configured log sink", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Facility the record belongs to
    #[arg(short, long, default_value = "cli")]
    facility: String,

    /// Severity (debug, info, notice, warning, error, critical, alert, emergency)
    #[arg(short, long, default_value = "info")]
    level: String,

    /// Group tag attached to the record
    #[arg(short, long, default_value = "cli")]
    group: String,

    /// Context entries as key=value (repeatable)
    #[arg(short = 'x', long = "context", value_parser = parse_entry)]
    context: Vec<(String, Value)>,

    /// The message
    message: String,
}

fn parse_entry(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    // Numbers and booleans keep their type, everything else is a string.
    let value = serde_json::from_str::<Value>(value)
        .ok()
        .filter(|v| v.is_number() || v.is_boolean())
        .unwrap_or_else(|| Value::from(value));
    Ok((key.to_string(), value))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LoggerConfig::default(),
    };
    // A one-shot command has no use for process hooks.
    config.install_error_handler = false;
    config.install_exception_handler = false;
    config.install_fatal_handler = false;
    init_logging(&config.observability.log_level);

    facade::initialize(&cli.facility, config)?;

    let context: Map<String, Value> = cli.context.into_iter().collect();
    facade::trace(&cli.level, &cli.message, &cli.group, context)?;

    Ok(())
}
