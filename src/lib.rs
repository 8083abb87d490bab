//! Watch History Library
//!
//! A Rust library for turning a Google Takeout YouTube watch history export
//! into a small set of analytical tables.
//!
//! This library provides tools for:
//! - Locating the watch history document inside a Takeout archive or plain file
//! - Parsing both the JSON (structured) and HTML (narrative) export formats
//!   into one canonical view record, including timezone inference for HTML
//! - Rolling views up into per-video and per-channel counts
//! - Building a gap-free month-by-month activity series
//! - Writing the resulting tables as Parquet or CSV

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregation;
        pub mod history_processor;
        pub mod narrative_parser;
        pub mod parse_result;
        pub mod reporter;
        pub mod source_extractor;
        pub mod structured_parser;
        pub mod table_writer;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

// Re-export commonly used types
pub use app::models::{CanonicalView, ChannelRow, HistoryTables, MonthlyBucket, VideoRow};
pub use app::services::history_processor::HistoryProcessor;
pub use config::HistoryConfig;

use std::path::PathBuf;

/// Result type alias for watch history processing
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for watch history processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Source path is missing or not a regular file
    #[error("Invalid source '{}': {reason}", path.display())]
    InvalidSource { path: PathBuf, reason: String },

    /// Destination folder does not exist
    #[error("Invalid destination '{}': {reason}", path.display())]
    InvalidDestination { path: PathBuf, reason: String },

    /// Extension not recognised, or archive holds no watch history member
    #[error("Unsupported format for '{}': {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Archive or plain source could not be read
    #[error("Extraction error for '{}': {message}", path.display())]
    Extraction { path: PathBuf, message: String },

    /// Structured export is not a list of records
    #[error("Parse error in '{document}': {message}")]
    Parse { document: String, message: String },

    /// Narrative entry is missing an expected nested element
    #[error("Malformed markup in entry {entry}: {reason}")]
    MalformedMarkup { entry: usize, reason: String },

    /// Document parsed but produced no views
    #[error("No views found in '{document}'")]
    EmptyResult { document: String },

    /// Table output failed
    #[error("Output error: {message}")]
    Output {
        message: String,
        #[source]
        source: Option<polars::error::PolarsError>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid source error
    pub fn invalid_source(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid destination error
    pub fn invalid_destination(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidDestination {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an extraction error
    pub fn extraction(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Create a malformed markup error for the given 1-based entry index
    pub fn malformed_markup(entry: usize, reason: impl Into<String>) -> Self {
        Self::MalformedMarkup {
            entry,
            reason: reason.into(),
        }
    }

    /// Create an empty result error
    pub fn empty_result(document: impl Into<String>) -> Self {
        Self::EmptyResult {
            document: document.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>, source: Option<polars::error::PolarsError>) -> Self {
        Self::Output {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Errors the orchestrator turns into "nothing to process" instead of failing the run
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidSource { .. }
                | Self::UnsupportedFormat { .. }
                | Self::Extraction { .. }
                | Self::Parse { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<polars::error::PolarsError> for Error {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::Output {
            message: "Table conversion failed".to_string(),
            source: Some(error),
        }
    }
}
