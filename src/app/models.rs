//! Data models for lead enrichment
//!
//! This module contains the request, record and result types exchanged
//! between the processor and its callers. Field names follow the JSON wire
//! names used by the web front end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// Lead Files
// =============================================================================

/// Snapshot of a lead CSV file found in the data folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvFileInfo {
    /// File name without directory
    pub filename: String,

    /// Full path to the file
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modification time
    pub modified: DateTime<Utc>,
}

// =============================================================================
// Enriched Leads
// =============================================================================

/// One row of enrichment output
///
/// Every field is kept as text. `google_reviews` is only interpreted as a
/// number when filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedLead {
    pub forename: String,
    pub company_name: String,
    pub company_location: String,
    pub google_reviews: String,
    pub email: String,
    pub phone_number: String,
}

impl EnrichedLead {
    /// Fields in CSV column order
    pub fn as_record(&self) -> [&str; 6] {
        [
            self.forename.as_str(),
            self.company_name.as_str(),
            self.company_location.as_str(),
            self.google_reviews.as_str(),
            self.email.as_str(),
            self.phone_number.as_str(),
        ]
    }

    /// Whether the lead carries a non-blank email address
    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Post-enrichment filters; zero values disable a predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilters {
    /// Drop leads whose email is empty or whitespace
    #[serde(default)]
    pub exclude_no_email: bool,

    /// Minimum review count; 0 or below disables
    #[serde(default)]
    pub min_reviews: i64,

    /// Case-insensitive substring required in the company location; empty disables
    #[serde(default)]
    pub location: String,
}

impl LeadFilters {
    /// True when no predicate is active
    pub fn is_empty(&self) -> bool {
        !self.exclude_no_email && self.min_reviews <= 0 && self.location.is_empty()
    }
}

/// How the enrichment script looks up contact details
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStrategy {
    /// Plain HTTP fetches
    #[default]
    Http,
    /// Browser automation for JavaScript-heavy sites
    Browser,
}

impl EnrichmentStrategy {
    pub fn from_playwright_flag(use_playwright: bool) -> Self {
        if use_playwright { Self::Browser } else { Self::Http }
    }
}

/// A single enrich-and-filter request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Lead CSV to enrich
    pub input_file: PathBuf,

    /// Select browser-automation enrichment
    #[serde(default)]
    pub use_playwright: bool,

    /// Filters applied to the enriched leads
    #[serde(default)]
    pub filters: LeadFilters,
}

impl ProcessRequest {
    /// Create a request with no filters and the HTTP strategy
    pub fn new(input_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            use_playwright: false,
            filters: LeadFilters::default(),
        }
    }

    pub fn with_playwright(mut self, use_playwright: bool) -> Self {
        self.use_playwright = use_playwright;
        self
    }

    pub fn with_filters(mut self, filters: LeadFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn strategy(&self) -> EnrichmentStrategy {
        EnrichmentStrategy::from_playwright_flag(self.use_playwright)
    }
}

// =============================================================================
// Results
// =============================================================================

/// Successful enrichment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessReport {
    /// Leads that passed the filters, in output order
    pub results: Vec<EnrichedLead>,

    /// Leads parsed from the enrichment output before filtering
    pub total_count: usize,

    /// Leads remaining after filtering
    pub filtered_count: usize,

    /// Enrichment output file in the scratch directory
    pub output_file: PathBuf,
}

impl ProcessReport {
    pub fn new(total_count: usize, results: Vec<EnrichedLead>, output_file: PathBuf) -> Self {
        Self {
            filtered_count: results.len(),
            results,
            total_count,
            output_file,
        }
    }
}

/// Outcome of [`LeadProcessor::process`](crate::LeadProcessor::process)
///
/// `Failed` covers expected, per-request failures the caller should show to
/// the user. Environment faults are returned as [`crate::Error`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessOutcome {
    Completed(ProcessReport),
    Failed { error: String },
}

impl ProcessOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Completed(_) => None,
        }
    }

    pub fn report(&self) -> Option<&ProcessReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<ProcessReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed { .. } => None,
        }
    }

    /// Filtered leads; empty on failure
    pub fn results(&self) -> &[EnrichedLead] {
        self.report().map(|r| r.results.as_slice()).unwrap_or(&[])
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.report().map(|r| r.output_file.as_path())
    }
}
