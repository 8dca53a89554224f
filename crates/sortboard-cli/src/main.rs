mod commands;
mod logging;
mod progress;

use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use sortboard_core::notion::NotionClient;
use sortboard_core::{AppConfig, SessionStatus, StatusTally, SyncEngine};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match sortboard_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let outcome = match args.command {
        Some(Commands::Sync) => run_sync(&config),
        Some(Commands::Scan) => run_scan(&config),
        Some(Commands::Schema) => run_schema(&config),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = outcome {
        error!("Error: {}", err);
        process::exit(1);
    }

    Ok(())
}

fn run_sync(config: &AppConfig) -> anyhow::Result<()> {
    let engine = SyncEngine::new(config.clone());
    let reporter = CliReporter::new();
    let result = engine.run(&reporter)?;

    println!();
    info!(
        "Scan: {}, Fetch: {}, Sync: {}",
        format!("{:.2}s", result.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.fetch_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.sync_duration.as_secs_f64()).green(),
    );
    info!(
        "{} sessions found, {} remote entries, {} created, {} updated",
        format!("{}", result.sessions_found).cyan(),
        format!("{}", result.remote_entries).cyan(),
        format!("{}", result.entries_created).green(),
        format!("{}", result.entries_updated).yellow(),
    );
    print_tally(&result.tally);

    Ok(())
}

fn run_scan(config: &AppConfig) -> anyhow::Result<()> {
    let engine = SyncEngine::new(config.clone());
    let records = engine.scan_records()?;

    for record in &records {
        println!(
            "{:<12} {:<28} {} {}",
            record.animal_id,
            record.session_name,
            status_cell(record.status),
            record.comment,
        );
    }

    println!();
    info!("{} sessions found", format!("{}", records.len()).cyan());
    print_tally(&StatusTally::count(&records));

    Ok(())
}

fn run_schema(config: &AppConfig) -> anyhow::Result<()> {
    let client = NotionClient::new(&config.notion_api_key, &config.database_id)?;
    let schema = client.retrieve_schema()?;

    for (name, property) in &schema.properties {
        println!("Property Name: {}", name);
        println!("Type: {}", property.kind);
        println!("{}", "-".repeat(30));
    }

    Ok(())
}

fn print_tally(tally: &StatusTally) {
    info!(
        "{} to preprocess, {} to spike sort, {} to post-process, {} ready",
        format!("{}", tally.to_preprocess).yellow(),
        format!("{}", tally.to_spike_sort).cyan(),
        format!("{}", tally.to_post_process).magenta(),
        format!("{}", tally.ready).green(),
    );
}

fn status_cell(status: SessionStatus) -> ColoredString {
    // Pad before coloring so the ANSI codes don't break column alignment.
    let label = format!("{:<28}", status.as_str());
    match status {
        SessionStatus::ToPreprocess => label.yellow(),
        SessionStatus::ToSpikeSort => label.cyan(),
        SessionStatus::ToPostProcess => label.magenta(),
        SessionStatus::Ready => label.green(),
    }
}
