use clap::Parser;
use lead_enricher::cli::{
    args::Args,
    commands::{self, CommandStatus},
};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancelling the token kills a running enrichment script
        let cancellation_token = CancellationToken::new();

        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nReceived CTRL+C, stopping enrichment...");
                signal_token.cancel();
            }
        });

        commands::run(args, cancellation_token).await
    });

    match result {
        Ok(CommandStatus::Completed) => process::exit(0),
        // Soft failures have already been reported by the command
        Ok(CommandStatus::Failed) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Lead Enricher - Contact Enrichment for Scraped Business Leads");
    println!("=============================================================");
    println!();
    println!("Run the contact enrichment script over a lead CSV and filter the");
    println!("enriched leads by email, review count and location.");
    println!();
    println!("USAGE:");
    println!("    lead-enricher <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    list        List lead CSV files in the data folder");
    println!("    process     Enrich a lead CSV and filter the results");
    println!("    filter      Filter an existing enriched CSV");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # See which lead files are available:");
    println!("    lead-enricher list --data-folder webdata");
    println!();
    println!("    # Enrich, keep leads with an email and 10+ reviews in Leeds, export:");
    println!("    lead-enricher process webdata/plumbers.csv --exclude-no-email \\");
    println!("                          --min-reviews 10 --location leeds --export leeds.csv");
    println!();
    println!("    # Re-filter an earlier enrichment run:");
    println!("    lead-enricher filter webdata/temp/enriched_....csv --location london");
    println!();
    println!("For detailed help on any command, use:");
    println!("    lead-enricher <COMMAND> --help");
}
