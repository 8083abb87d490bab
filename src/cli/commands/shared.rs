//! Shared components for CLI commands
//!
//! Logging setup, spinner progress, source resolution and the blocking
//! worker bridge used by every command.

use crate::app::services::reporter::ProgressObserver;
use crate::cli::args::SourceArgs;
use crate::cli::input::{default_source_path, prompt_source_path};
use crate::{Error, HistoryTables, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, debug, info};

/// Run statistics reported by every command
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// False when the source was unusable or held no views
    pub produced: bool,
    pub views: usize,
    pub videos: usize,
    pub repeat_views: usize,
    pub channels: usize,
    pub months: usize,
    /// Files written, empty for dry runs and inspection
    pub written: Vec<PathBuf>,
    pub processing_time: Duration,
}

impl RunStats {
    /// Collect statistics from the tables of a run, if it produced any
    pub fn from_tables(
        tables: Option<&HistoryTables>,
        written: Vec<PathBuf>,
        processing_time: Duration,
    ) -> Self {
        match tables {
            Some(tables) => Self {
                produced: true,
                views: tables.views.len(),
                videos: tables.videos.len(),
                repeat_views: tables.repeat_views(),
                channels: tables.channels.len(),
                months: tables.monthly.len(),
                written,
                processing_time,
            },
            None => Self {
                processing_time,
                ..Default::default()
            },
        }
    }
}

/// Set up structured logging for a command
///
/// `RUST_LOG` overrides the level chosen by `-v` / `-q`.
pub fn setup_logging(args: &SourceArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("watch_history={}", log_level)));

    let initialized = if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    match initialized {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(_) => debug!("Logging already initialized"),
    }
    Ok(())
}

/// Spinner showing the latest progress message
pub fn create_spinner(show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Progress observer driving a spinner
///
/// Informational messages replace the spinner text; warnings and errors are
/// printed above it so they stay visible.
#[derive(Clone)]
pub struct SpinnerObserver {
    spinner: ProgressBar,
}

impl SpinnerObserver {
    pub fn new(spinner: ProgressBar) -> Self {
        Self { spinner }
    }
}

impl ProgressObserver for SpinnerObserver {
    fn notify(&self, level: Level, message: &str) {
        if level == Level::WARN || level == Level::ERROR {
            self.spinner.println(format!("{}: {}", level, message));
        } else {
            self.spinner.set_message(message.trim().to_string());
        }
    }
}

/// Source from the arguments, or asked for interactively
pub fn resolve_source(args: &SourceArgs) -> Result<PathBuf> {
    if let Some(source) = &args.source {
        return Ok(source.clone());
    }

    info!("No source given, prompting for one");
    prompt_source_path(default_source_path())
        .map_err(|e| Error::configuration(format!("{:#}", e)))
}

/// Run engine work on the blocking pool so signal handling stays responsive
pub async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::processing_interrupted(format!("worker stopped: {}", e)))?
}
