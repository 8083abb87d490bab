//! Process command implementation
//!
//! Parses the export, builds the tables and writes them next to each other
//! in the output directory.

use super::shared::{
    RunStats, SpinnerObserver, create_spinner, resolve_source, run_blocking, setup_logging,
};
use crate::app::services::history_processor::HistoryProcessor;
use crate::app::services::reporter::format_count;
use crate::app::services::table_writer::PolarsTableWriter;
use crate::cli::args::ProcessArgs;
use crate::Result;
use colored::*;
use indicatif::HumanDuration;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Process command runner
///
/// 1. Set up logging and resolve the source (prompting if needed)
/// 2. Build the configuration from the arguments
/// 3. Run the engine on the blocking pool with spinner progress
/// 4. Print the final report
pub async fn run_process(args: ProcessArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args.source)?;
    info!("Starting watch history processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let source = resolve_source(&args.source)?;
    let output_dir = args.resolved_output_dir();
    let config = args.to_config();
    debug!("Run configuration: {:?}", config);

    let writer = PolarsTableWriter::new(config.output_format);
    let spinner = create_spinner(args.source.show_progress());
    let processor = HistoryProcessor::new(config)?
        .with_observer(Arc::new(SpinnerObserver::new(spinner.clone())));

    println!(
        "{} {}",
        "Processing".bright_green().bold(),
        source.display()
    );

    let outcome = {
        let source = source.clone();
        let output_dir = output_dir.clone();
        run_blocking(move || processor.run(&source, &output_dir, &writer)).await
    };
    spinner.finish_and_clear();
    let outcome = outcome?;

    let stats = match outcome {
        Some(outcome) => RunStats::from_tables(
            Some(&outcome.tables),
            outcome.written,
            start_time.elapsed(),
        ),
        None => RunStats::from_tables(None, Vec::new(), start_time.elapsed()),
    };

    print_final_report(&stats, args.dry_run);
    Ok(stats)
}

/// Print the colored summary of a run
pub fn print_final_report(stats: &RunStats, dry_run: bool) {
    if !stats.produced {
        println!(
            "\n{}",
            "No views found, nothing was written".bright_yellow().bold()
        );
        return;
    }

    println!("\n{}", "Watch history processed".bright_green().bold());
    println!("{}", "━".repeat(41).bright_black());
    for (count, label) in [
        (stats.views, "views"),
        (stats.videos, "videos"),
        (stats.repeat_views, "repeat views"),
        (stats.channels, "channels"),
        (stats.months, "months"),
    ] {
        println!("{}", format_count(count, label).bright_white());
    }
    println!(
        "  {} {}",
        "Processing time:".bright_cyan(),
        HumanDuration(stats.processing_time)
    );

    if dry_run {
        println!("\n{}", "Dry run: no files written".bright_yellow());
    } else if !stats.written.is_empty() {
        println!("\n{}", "Output files:".bright_cyan());
        for path in &stats.written {
            println!("  • {}", path.display());
        }
    }
    println!();
}
