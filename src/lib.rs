//! Lead Enricher Library
//!
//! A Rust library for working with CSV files of scraped business leads and
//! the external contact-enrichment script that runs over them.
//!
//! This library provides tools for:
//! - Listing lead CSV files in a data folder
//! - Running the enrichment script as a cancellable subprocess
//! - Parsing the enriched output with lenient, positional column mapping
//! - Filtering enriched leads by email presence, review count and location
//! - Re-exporting filtered leads to CSV
//!
//! Expected failures of a single request (missing input, script failure,
//! unreadable output) are reported through
//! [`ProcessOutcome`](app::models::ProcessOutcome). Environment faults
//! (unreadable data folder, unwritable export) are reported through [`Error`].

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod enrichment;
        pub mod file_listing;
        pub mod lead_csv;
        pub mod lead_filter;
        pub mod lead_processor;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    CsvFileInfo, EnrichedLead, LeadFilters, ProcessOutcome, ProcessReport, ProcessRequest,
};
pub use app::services::enrichment::{Enricher, EnrichmentError, ScriptEnricher};
pub use app::services::lead_processor::LeadProcessor;
pub use config::Config;

/// Result type alias for the lead enricher
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures: conditions the caller cannot route around per request
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: csv::Error,
    },

    /// CSV writing error
    #[error("CSV writing error in file '{file}': {message}")]
    CsvWriting {
        file: String,
        message: String,
        #[source]
        source: csv::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },

    /// Result serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: csv::Error,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a CSV writing error with context
    pub fn csv_writing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: csv::Error,
    ) -> Self {
        Self::CsvWriting {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: error,
        }
    }
}
