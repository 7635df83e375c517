//! Shared components for CLI commands
//!
//! Logging setup, configuration loading and output helpers used by every
//! subcommand.

use crate::app::models::EnrichedLead;
use crate::cli::args::GlobalArgs;
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Set up structured logging at the configured level
pub fn setup_logging(global: &GlobalArgs, config: &Config) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = config.logging.level.as_str();

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lead_enricher={}", log_level)));

    if global.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(global: &GlobalArgs) -> Result<Config> {
    global.validate()?;

    let default_config_path = if global.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &global.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_ref()
            .filter(|path| path.exists())
            .map(|path| path.as_path()),
    };

    let mut config = Config::load_layered(config_file)?;
    global.apply_overrides(&mut config);
    config.validate()?;

    Ok(config)
}

/// Load configuration and start logging; returns the final configuration
pub fn initialize(global: &GlobalArgs) -> Result<Config> {
    let config = load_configuration(global)?;
    setup_logging(global, &config)?;

    match &global.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("Using default configuration sources"),
    }
    debug!("Loaded configuration: {:?}", config);

    Ok(config)
}

/// Print any serializable value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::serialization("Failed to serialize results", e))?;
    println!("{}", json);
    Ok(())
}

/// Spinner shown while a long step runs
pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Print leads as an aligned table
pub fn print_leads(leads: &[EnrichedLead]) {
    if leads.is_empty() {
        println!("  {}", "No leads matched the filters".bright_black());
        return;
    }

    println!(
        "  {:<20} {:<30} {:<24} {:>7}  {:<32} {}",
        "Name".bright_cyan().bold(),
        "Company".bright_cyan().bold(),
        "Location".bright_cyan().bold(),
        "Reviews".bright_cyan().bold(),
        "Email".bright_cyan().bold(),
        "Phone".bright_cyan().bold()
    );

    for lead in leads {
        let email = if lead.has_email() {
            lead.email.bright_white()
        } else {
            "-".bright_black()
        };
        println!(
            "  {:<20} {:<30} {:<24} {:>7}  {:<32} {}",
            truncate(&lead.forename, 20),
            truncate(&lead.company_name, 30),
            truncate(&lead.company_location, 24),
            lead.google_reviews,
            email,
            lead.phone_number
        );
    }
}

/// Format byte size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Cut `text` to at most `max` characters, marking the cut with '…'
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
