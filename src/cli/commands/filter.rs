//! Filter command: filter an existing enriched CSV without re-running enrichment

use super::CommandStatus;
use super::shared::{initialize, print_json, print_leads};
use crate::{Error, Result};
use crate::app::models::EnrichedLead;
use crate::app::services::lead_csv::read_enriched_csv;
use crate::app::services::lead_processor::LeadProcessor;
use crate::cli::args::{FilterArgs, GlobalArgs, OutputFormat};
use colored::*;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// JSON shape of a filter run
#[derive(Debug, Serialize)]
struct FilterSummary<'a> {
    source: &'a Path,
    total_count: usize,
    filtered_count: usize,
    results: &'a [EnrichedLead],
}

pub async fn run_filter(global: &GlobalArgs, args: FilterArgs) -> Result<CommandStatus> {
    let config = initialize(global)?;
    let processor = LeadProcessor::from_config(&config);

    let path = args.enriched.clone();
    let leads = tokio::task::spawn_blocking(move || read_enriched_csv(&path))
        .await
        .map_err(|e| Error::processing_interrupted(format!("CSV reader task failed: {}", e)))??;

    let filtered = processor.filter(&leads, &args.filters.to_filters());
    info!(
        "Filtered {}: {} -> {} leads",
        args.enriched.display(),
        leads.len(),
        filtered.len()
    );

    if let Some(export) = &args.export {
        processor.export(&filtered, export)?;
    }

    match args.output_format {
        OutputFormat::Json => print_json(&FilterSummary {
            source: &args.enriched,
            total_count: leads.len(),
            filtered_count: filtered.len(),
            results: &filtered,
        })?,
        OutputFormat::Human => {
            println!(
                "{} {} of {} leads from {}",
                "Kept".bright_green().bold(),
                filtered.len().to_string().bright_white().bold(),
                leads.len(),
                args.enriched.display()
            );
            if let Some(export) = &args.export {
                println!("  {} {}", "Exported to:".bright_cyan(), export.display());
            }
            println!();
            print_leads(&filtered);
        }
    }

    Ok(CommandStatus::Completed)
}
