//! Configuration management and validation.
//!
//! Provides the settings a single processing run is parameterised by:
//! timezone fallback for the HTML export, malformed entry handling,
//! monthly bucketing options and the output table format.

use crate::{Error, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How parsers react to an entry missing an expected element or field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MalformedPolicy {
    /// Skip the entry, count it, and keep going
    #[default]
    Skip,
    /// Stop the run at the first malformed entry
    Abort,
}

/// Options for the monthly bucketizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOptions {
    /// Warn once when views carry more than one UTC offset, since month
    /// truncation drops offsets
    pub warn_on_offset_loss: bool,
}

impl Default for MonthlyOptions {
    fn default() -> Self {
        Self {
            warn_on_offset_loss: true,
        }
    }
}

/// Table file format written by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableFormat {
    /// Snappy-compressed Parquet
    #[default]
    Parquet,
    /// CSV with a header row
    Csv,
}

impl TableFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Parquet => "parquet",
            TableFormat::Csv => "csv",
        }
    }
}

/// Global configuration for watch history processing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// IANA timezone seeding HTML timestamp inference (`None` = system local)
    pub default_timezone: Option<String>,

    /// Handling of malformed entries in either export format
    pub malformed_policy: MalformedPolicy,

    /// Monthly bucketizer options
    pub monthly: MonthlyOptions,

    /// Output table format
    pub output_format: TableFormat,

    /// Build tables but do not write them
    pub dry_run: bool,
}

impl HistoryConfig {
    /// Seed HTML timestamp inference with a specific IANA timezone
    pub fn with_default_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.default_timezone = Some(timezone.into());
        self
    }

    /// Set the malformed entry policy
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    /// Configure the monthly bucketizer
    pub fn with_monthly_options(mut self, options: MonthlyOptions) -> Self {
        self.monthly = options;
        self
    }

    /// Set the output table format
    pub fn with_output_format(mut self, format: TableFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enable dry run mode
    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Resolve the configured default timezone
    ///
    /// Returns `None` when the system local timezone should be used.
    pub fn resolved_timezone(&self) -> Result<Option<Tz>> {
        match &self.default_timezone {
            None => Ok(None),
            Some(name) => name.parse::<Tz>().map(Some).map_err(|e| {
                Error::configuration(format!("Unknown timezone '{}': {}", name, e))
            }),
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        let timezone = self.resolved_timezone()?;
        debug!(
            "Configuration valid: timezone={:?}, malformed={:?}, format={:?}",
            timezone, self.malformed_policy, self.output_format
        );
        Ok(())
    }
}
