//! List command: show lead CSV files in the data folder

use super::shared::{format_size, initialize, print_json};
use super::CommandStatus;
use crate::Result;
use crate::app::services::lead_processor::LeadProcessor;
use crate::cli::args::{GlobalArgs, ListArgs, OutputFormat};
use colored::*;
use tracing::info;

pub async fn run_list(global: &GlobalArgs, args: ListArgs) -> Result<CommandStatus> {
    let config = initialize(global)?;
    let processor = LeadProcessor::from_config(&config);

    info!("Listing lead files in {}", processor.data_folder().display());
    let files = processor.list_csv_files().await?;

    match args.output_format {
        OutputFormat::Json => print_json(&files)?,
        OutputFormat::Human => {
            println!(
                "{} {}",
                "Lead files in".bright_green().bold(),
                processor.data_folder().display()
            );
            if files.is_empty() {
                println!("  {}", "No CSV files found".bright_black());
            }
            for file in &files {
                println!(
                    "  {:<40} {:>10}  {}",
                    file.filename.bright_cyan(),
                    format_size(file.size),
                    file.modified
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
            }
        }
    }

    Ok(CommandStatus::Completed)
}
