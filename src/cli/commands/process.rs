//! Process command: enrich a lead CSV, filter, and optionally export
//!
//! A soft failure from the processor (missing input, script failure,
//! unreadable output) is printed and turns into a failed command status;
//! it is not returned as an error.

use super::CommandStatus;
use super::shared::{create_spinner, initialize, print_json, print_leads};
use crate::Result;
use crate::app::models::{ProcessOutcome, ProcessRequest};
use crate::app::services::lead_processor::LeadProcessor;
use crate::cli::args::{GlobalArgs, OutputFormat, ProcessArgs};
use colored::*;
use indicatif::HumanDuration;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub async fn run_process(
    global: &GlobalArgs,
    args: ProcessArgs,
    cancel: CancellationToken,
) -> Result<CommandStatus> {
    let start_time = Instant::now();
    let config = initialize(global)?;
    debug!("Command line arguments: {:?}", args);

    let processor = LeadProcessor::from_config(&config);
    let request = ProcessRequest::new(args.input.clone())
        .with_playwright(args.playwright)
        .with_filters(args.filters.to_filters());

    let spinner = (global.show_progress() && args.output_format == OutputFormat::Human).then(|| {
        create_spinner(format!(
            "Enriching {}...",
            args.input.file_name().unwrap_or_default().to_string_lossy()
        ))
    });

    let outcome = processor.process(request, &cancel).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let outcome = outcome?;

    if let (Some(path), Some(report)) = (&args.export, outcome.report()) {
        processor.export(&report.results, path)?;
    }

    match args.output_format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Human => print_outcome(&outcome, &args, start_time),
    }

    if outcome.is_success() {
        info!("Process command complete");
        Ok(CommandStatus::Completed)
    } else {
        Ok(CommandStatus::Failed)
    }
}

fn print_outcome(outcome: &ProcessOutcome, args: &ProcessArgs, start_time: Instant) {
    match outcome {
        ProcessOutcome::Failed { error } => {
            eprintln!("{} {}", "Enrichment failed:".bright_red().bold(), error);
        }
        ProcessOutcome::Completed(report) => {
            println!("{}", "Enrichment complete".bright_green().bold());
            println!(
                "  {} {}",
                "Input:".bright_cyan(),
                args.input.display()
            );
            println!(
                "  {} {}",
                "Enriched output:".bright_cyan(),
                report.output_file.display()
            );
            println!(
                "  {} {} of {}",
                "Leads kept:".bright_cyan(),
                report.filtered_count.to_string().bright_white().bold(),
                report.total_count.to_string().bright_white()
            );
            if let Some(path) = &args.export {
                println!("  {} {}", "Exported to:".bright_cyan(), path.display());
            }
            println!(
                "  {} {}",
                "Time elapsed:".bright_cyan(),
                HumanDuration(start_time.elapsed())
            );
            println!();
            print_leads(&report.results);
        }
    }
}
