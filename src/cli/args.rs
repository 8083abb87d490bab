//! Command-line argument definitions for the watch history processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{HistoryConfig, MalformedPolicy, TableFormat};
use crate::constants::DEFAULT_INSPECT_TOP;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// CLI arguments for the watch history processor
///
/// Turns a Google Takeout YouTube watch history export (zip, HTML or JSON)
/// into views, videos, channels and monthly activity tables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watch_history",
    version,
    about = "Convert a YouTube Takeout watch history into analytical tables",
    long_about = "Reads a Google Takeout archive, or the watch-history.html / watch-history.json \
                  file inside it, and produces four tables: every view, per-video view counts, \
                  per-channel video counts and a gap-free monthly activity series. Tables are \
                  written as Parquet or CSV."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process an export and write the tables (main command)
    Process(ProcessArgs),
    /// Process an export and print a summary without writing anything
    Inspect(InspectArgs),
}

/// Output file format accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Parquet,
    Csv,
}

impl From<FormatArg> for TableFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Parquet => TableFormat::Parquet,
            FormatArg::Csv => TableFormat::Csv,
        }
    }
}

/// Options shared by every command that parses an export
#[derive(Debug, Clone, ClapArgs)]
pub struct SourceArgs {
    /// Takeout archive (.zip) or watch history file (.html / .json)
    ///
    /// Prompted for interactively when omitted.
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// IANA timezone for HTML timestamps before the first recognised abbreviation
    ///
    /// Defaults to the timezone of this machine.
    #[arg(long = "timezone", value_name = "TZ")]
    pub timezone: Option<String>,

    /// Stop at the first malformed entry instead of skipping it
    #[arg(long = "strict")]
    pub strict: bool,

    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl SourceArgs {
    /// Get the log level based on verbose and quiet flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show the spinner (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Apply the parsing options to a configuration
    pub fn apply_to(&self, config: HistoryConfig) -> HistoryConfig {
        let mut config = match &self.timezone {
            Some(timezone) => config.with_default_timezone(timezone.clone()),
            None => config,
        };
        if self.strict {
            config = config.with_malformed_policy(MalformedPolicy::Abort);
        }
        config
    }
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory the tables are written into
    ///
    /// Defaults to the user's download directory, or the current directory
    /// when there is none.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Table file format
    #[arg(long = "format", value_enum, default_value = "parquet")]
    pub format: FormatArg,

    /// Parse and aggregate but do not write any files
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl ProcessArgs {
    /// Validate argument combinations before any work starts
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(Error::invalid_destination(dir, "not a directory"));
            }
        }
        Ok(())
    }

    /// Output directory, falling back to the download directory
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| Path::new(".").to_path_buf())
    }

    /// Build the run configuration from the defaults and these arguments
    pub fn to_config(&self) -> HistoryConfig {
        let config = HistoryConfig::default().with_output_format(self.format.into());
        let config = if self.dry_run {
            config.with_dry_run()
        } else {
            config
        };
        self.source.apply_to(config)
    }
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Rows shown for the top channels and top videos
    #[arg(long = "top", value_name = "N", default_value_t = DEFAULT_INSPECT_TOP)]
    pub top: usize,
}

impl InspectArgs {
    pub fn to_config(&self) -> HistoryConfig {
        self.source.apply_to(HistoryConfig::default().with_dry_run())
    }
}
