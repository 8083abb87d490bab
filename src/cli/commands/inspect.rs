//! Inspect command implementation
//!
//! Runs the engine without writing anything and prints the top channels,
//! the most watched videos and the monthly activity series.

use super::shared::{
    RunStats, SpinnerObserver, create_spinner, resolve_source, run_blocking, setup_logging,
};
use crate::app::models::HistoryTables;
use crate::app::services::history_processor::HistoryProcessor;
use crate::cli::args::InspectArgs;
use crate::Result;
use colored::*;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Widest bar in the monthly chart
const BAR_WIDTH: usize = 40;

/// Inspect command runner
pub async fn run_inspect(args: InspectArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args.source)?;
    info!("Inspecting watch history");
    debug!("Command line arguments: {:?}", args);

    let source = resolve_source(&args.source)?;
    let spinner = create_spinner(args.source.show_progress());
    let processor = HistoryProcessor::new(args.to_config())?
        .with_observer(Arc::new(SpinnerObserver::new(spinner.clone())));

    let tables = run_blocking(move || processor.process(&source)).await;
    spinner.finish_and_clear();
    let tables = tables?;

    match &tables {
        Some(tables) => print!("{}", render_summary(tables, args.top)),
        None => println!("{}", "No views found".bright_yellow().bold()),
    }

    Ok(RunStats::from_tables(
        tables.as_ref(),
        Vec::new(),
        start_time.elapsed(),
    ))
}

/// Text summary of a run's tables
pub fn render_summary(tables: &HistoryTables, top: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n{} ({} views, {} videos, {} channels)",
        "Watch history".bright_green().bold(),
        tables.views.len(),
        tables.videos.len(),
        tables.channels.len()
    );

    let _ = writeln!(out, "\n{}", "Top channels".bright_cyan().bold());
    for row in tables.channels.iter().take(top) {
        let _ = writeln!(
            out,
            "{:>7}  {}",
            row.videos,
            row.channel.channel_title.bright_white()
        );
    }

    let _ = writeln!(out, "\n{}", "Most watched videos".bright_cyan().bold());
    for row in tables.videos.iter().take(top) {
        let _ = writeln!(
            out,
            "{:>7}  {} {}",
            row.views,
            row.video.video_title.bright_white(),
            format!("({})", row.video.channel_title).bright_black()
        );
    }

    let _ = writeln!(out, "\n{}", "Monthly activity".bright_cyan().bold());
    let peak = tables.monthly.iter().map(|b| b.count).max().unwrap_or(0);
    for bucket in &tables.monthly {
        let width = if peak == 0 {
            0
        } else {
            (bucket.count * BAR_WIDTH).div_ceil(peak)
        };
        let _ = writeln!(
            out,
            "{}  {:>7}  {}",
            bucket.month.format("%Y-%m"),
            bucket.count,
            "█".repeat(width).green()
        );
    }

    out
}
