//! Command-line argument definitions for the lead enricher
//!
//! This module defines the CLI interface using the clap derive API. The
//! binary is a thin front end over [`LeadProcessor`](crate::LeadProcessor).

use crate::app::models::LeadFilters;
use crate::config::Config;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the lead enricher
///
/// Lists scraped lead CSVs, runs the contact enrichment script over one of
/// them, and filters or re-exports the enriched leads.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lead-enricher",
    version,
    about = "Enrich scraped business leads with contact details and filter the results",
    long_about = "Lists the lead CSV files in a data folder, runs the external contact \
                  enrichment script over a chosen file, and filters the enriched leads by \
                  email presence, Google review count and location. Filtered leads can be \
                  exported back to CSV."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List lead CSV files in the data folder
    List(ListArgs),
    /// Enrich a lead CSV and filter the results
    Process(ProcessArgs),
    /// Filter an existing enriched CSV without running enrichment
    Filter(FilterArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct GlobalArgs {
    /// Data folder containing lead CSVs
    #[arg(
        long = "data-folder",
        value_name = "PATH",
        global = true,
        help = "Data folder containing lead CSVs (default: webdata)"
    )]
    pub data_folder: Option<PathBuf>,

    /// Enrichment script path
    #[arg(
        long = "script",
        value_name = "PATH",
        global = true,
        help = "Path to the enrichment script"
    )]
    pub script: Option<PathBuf>,

    /// Interpreter used to run the script
    #[arg(
        long = "runtime",
        value_name = "PROGRAM",
        global = true,
        help = "Interpreter for the enrichment script (default: python3)"
    )]
    pub runtime: Option<String>,

    /// Kill the enrichment script after this many seconds
    #[arg(
        long = "timeout-secs",
        value_name = "SECONDS",
        global = true,
        help = "Kill the enrichment script after this many seconds (0 = no limit)"
    )]
    pub timeout_secs: Option<u64>,

    /// Configuration file path
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Configuration file path"
    )]
    pub config_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the list command
#[derive(Debug, Clone, Parser)]
pub struct ListArgs {
    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Lead CSV to enrich
    #[arg(value_name = "INPUT_CSV")]
    pub input: PathBuf,

    /// Use browser automation for JavaScript-heavy sites
    #[arg(
        long = "playwright",
        help = "Use browser automation (slower but more thorough)"
    )]
    pub playwright: bool,

    #[command(flatten)]
    pub filters: FilterOptions,

    /// Export filtered leads to this CSV file
    #[arg(
        short = 'e',
        long = "export",
        value_name = "FILE",
        help = "Export filtered leads to a CSV file"
    )]
    pub export: Option<PathBuf>,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the filter command
#[derive(Debug, Clone, Parser)]
pub struct FilterArgs {
    /// Enriched CSV produced by a previous run
    #[arg(value_name = "ENRICHED_CSV")]
    pub enriched: PathBuf,

    #[command(flatten)]
    pub filters: FilterOptions,

    /// Export filtered leads to this CSV file
    #[arg(
        short = 'e',
        long = "export",
        value_name = "FILE",
        help = "Export filtered leads to a CSV file"
    )]
    pub export: Option<PathBuf>,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Lead filter flags
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct FilterOptions {
    /// Drop leads without an email address
    #[arg(long = "exclude-no-email", help = "Drop leads without an email address")]
    pub exclude_no_email: bool,

    /// Minimum number of Google reviews
    #[arg(
        long = "min-reviews",
        value_name = "N",
        default_value_t = 0,
        help = "Minimum number of Google reviews (0 = no minimum)"
    )]
    pub min_reviews: u32,

    /// Location text the company location must contain
    #[arg(
        long = "location",
        value_name = "TEXT",
        help = "Keep leads whose location contains this text (case-insensitive)"
    )]
    pub location: Option<String>,
}

impl FilterOptions {
    pub fn to_filters(&self) -> LeadFilters {
        LeadFilters {
            exclude_no_email: self.exclude_no_email,
            min_reviews: i64::from(self.min_reviews),
            location: self.location.clone().unwrap_or_default(),
        }
    }
}

/// Output format options for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl GlobalArgs {
    /// Log level implied by -q / -v, `None` to use the configured level
    pub fn get_log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Validate global arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }

    /// Apply CLI overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(folder) = &self.data_folder {
            config.data_folder = folder.clone();
        }
        if let Some(script) = &self.script {
            config.enrichment.script_path = script.clone();
        }
        if let Some(runtime) = &self.runtime {
            config.enrichment.runtime = runtime.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.enrichment.timeout_secs = timeout;
        }
        if let Some(level) = self.get_log_level() {
            config.logging.level = level.to_string();
        }
    }
}
