//! Application constants for the lead enricher
//!
//! File names, CSV layout, subprocess flags and configuration defaults
//! shared across the library and the CLI.

// =============================================================================
// Data Folder Layout
// =============================================================================

/// Job database kept alongside the lead CSVs; never listed
pub const RESERVED_DB_FILENAME: &str = "jobs.db";

/// Scratch subdirectory (under the data folder) for enrichment output
pub const SCRATCH_DIR_NAME: &str = "temp";

/// Prefix of enrichment output files in the scratch directory
pub const ENRICHED_FILE_PREFIX: &str = "enriched";

/// Extension matched (case-insensitively) when listing lead files
pub const CSV_EXTENSION: &str = ".csv";

// =============================================================================
// Enriched Lead CSV Layout
// =============================================================================

/// Column header of the enrichment output and of exported files, in order
pub const LEAD_CSV_HEADER: [&str; 6] = [
    "forename",
    "company_name",
    "company_location",
    "google_reviews",
    "email",
    "phone_number",
];

/// Rows with fewer columns than this are skipped when parsing
pub const LEAD_COLUMN_COUNT: usize = LEAD_CSV_HEADER.len();

// =============================================================================
// Enrichment Script Contract
// =============================================================================

/// Flag preceding the output path
pub const OUTPUT_FLAG: &str = "-o";

/// Flag selecting browser-automation enrichment
pub const PLAYWRIGHT_FLAG: &str = "--playwright";

/// Interpreter used to run the script
pub const DEFAULT_RUNTIME: &str = "python3";

/// Script file name, resolved against the working directory then the executable's directory
pub const DEFAULT_SCRIPT_NAME: &str = "extract_contact_emails.py";

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Data folder used when none is configured
pub const DEFAULT_DATA_FOLDER: &str = "webdata";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application directory name under the user config dir
pub const APP_CONFIG_DIR: &str = "lead-enricher";

/// Config file name inside [`APP_CONFIG_DIR`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment overrides
pub mod env_vars {
    pub const DATA_FOLDER: &str = "LEAD_ENRICHER_DATA_FOLDER";
    pub const SCRIPT: &str = "LEAD_ENRICHER_SCRIPT";
    pub const RUNTIME: &str = "LEAD_ENRICHER_RUNTIME";
    pub const TIMEOUT_SECS: &str = "LEAD_ENRICHER_TIMEOUT_SECS";
}
