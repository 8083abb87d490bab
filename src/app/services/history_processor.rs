//! Run orchestration
//!
//! Drives one processing run end to end:
//!
//! 1. Validate the source path (and destination, when writing)
//! 2. Extract the watch history document and parse it with the matching parser
//! 3. Roll views up into videos and channels
//! 4. Build the monthly series
//! 5. Hand the tables to a [`TableSink`]
//!
//! Invalid or unreadable sources are logged and turn into "nothing produced"
//! rather than failing the run. A document without views stops the run
//! before aggregation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::models::{CanonicalView, HistoryTables};
use crate::app::services::aggregation::{build_channels, build_videos, bucket_by_month};
use crate::app::services::narrative_parser::{NarrativeParser, ViewZone};
use crate::app::services::parse_result::ParsedViews;
use crate::app::services::reporter::{ProgressObserver, Reporter};
use crate::app::services::source_extractor::{DocumentKind, extract_document};
use crate::app::services::structured_parser::StructuredParser;
use crate::app::services::table_writer::TableSink;
use crate::config::HistoryConfig;
use crate::{Error, Result};

/// Tables built by a run and the files they were written to
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub tables: HistoryTables,
    /// Empty on a dry run
    pub written: Vec<PathBuf>,
}

/// Main processor for watch history runs
#[derive(Clone)]
pub struct HistoryProcessor {
    config: HistoryConfig,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl std::fmt::Debug for HistoryProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryProcessor")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl HistoryProcessor {
    /// Create a processor, validating the configuration
    pub fn new(config: HistoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: None,
        })
    }

    /// Attach an observer receiving every progress message
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn reporter(&self) -> Reporter<'_> {
        Reporter::new(self.observer.as_deref())
    }

    /// Parse a source and build all tables without writing anything
    ///
    /// Returns `Ok(None)` when the source could not be used or held no views.
    pub fn process(&self, source: &Path) -> Result<Option<HistoryTables>> {
        let reporter = self.reporter();
        let Some(views) = self.load_views(source, &reporter)? else {
            return Ok(None);
        };
        Ok(Some(self.build_tables(views, &reporter)))
    }

    /// Process a source and write its tables into `destination_dir`
    ///
    /// Files are named after the source file stem. Nothing is written on a
    /// dry run.
    pub fn run(
        &self,
        source: &Path,
        destination_dir: &Path,
        sink: &dyn TableSink,
    ) -> Result<Option<RunOutcome>> {
        let reporter = self.reporter();
        let destination = output_base(source, destination_dir);

        // An unusable source is reported, not fatal, whatever the destination
        if let Err(e) = validate_source(source) {
            reporter.error(e.to_string());
            if let Err(e) = validate_destination(&destination) {
                reporter.error(e.to_string());
            }
            return Ok(None);
        }
        validate_destination(&destination)?;

        let Some(tables) = self.process(source)? else {
            return Ok(None);
        };

        let written = if self.config.dry_run {
            reporter.info("Dry run: no tables written");
            Vec::new()
        } else {
            reporter.info(format!(
                "Writing tables to {}",
                destination_dir.display()
            ));
            sink.write_tables(&tables, &destination)?
        };

        Ok(Some(RunOutcome { tables, written }))
    }

    /// Parse the source into views, recovering unusable sources as `None`
    fn load_views(
        &self,
        source: &Path,
        reporter: &Reporter<'_>,
    ) -> Result<Option<Vec<CanonicalView>>> {
        let parsed = match self.parse_source(source, reporter) {
            Ok(parsed) => parsed,
            Err(e) if e.is_recoverable() => {
                reporter.error(e.to_string());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match parsed.into_non_empty() {
            Ok(parsed) => Ok(Some(parsed.views)),
            Err(Error::EmptyResult { document }) => {
                reporter.info(format!("No views found in {}, nothing to do", document));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn parse_source(&self, source: &Path, reporter: &Reporter<'_>) -> Result<ParsedViews> {
        validate_source(source)?;
        let document = extract_document(source)?;
        reporter.info(format!(
            "Reading {} export {}",
            document.kind, document.name
        ));

        let policy = self.config.malformed_policy;
        match document.kind {
            DocumentKind::Structured => {
                StructuredParser::new(policy).parse(&document.name, &document.content, reporter)
            }
            DocumentKind::Narrative => {
                let default_zone = self
                    .config
                    .resolved_timezone()?
                    .map_or(ViewZone::SystemLocal, ViewZone::Named);
                NarrativeParser::new(policy, default_zone).parse(
                    &document.name,
                    &document.content,
                    reporter,
                )
            }
        }
    }

    fn build_tables(&self, views: Vec<CanonicalView>, reporter: &Reporter<'_>) -> HistoryTables {
        reporter.info("Creating video records");
        let videos = build_videos(&views);
        reporter.count(videos.len(), "total videos");
        reporter.count(
            views.len().saturating_sub(videos.len()),
            "views of already watched videos",
        );

        reporter.info("Creating channel records");
        let channels = build_channels(&videos);
        reporter.count(channels.len(), "channels");

        let monthly = bucket_by_month(&views, &self.config.monthly, reporter);

        HistoryTables {
            views,
            videos,
            channels,
            monthly,
        }
    }
}

/// Source must exist and be a regular file
pub fn validate_source(source: &Path) -> Result<()> {
    if !source.exists() {
        return Err(Error::invalid_source(source, "file does not exist"));
    }
    if !source.is_file() {
        return Err(Error::invalid_source(source, "not a regular file"));
    }
    Ok(())
}

/// The directory a base path points into must exist
pub fn validate_destination(destination: &Path) -> Result<()> {
    let parent = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !parent.is_dir() {
        return Err(Error::invalid_destination(
            parent,
            "directory does not exist",
        ));
    }
    Ok(())
}

/// Base path for output files: the source stem inside `destination_dir`
pub fn output_base(source: &Path, destination_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "watch-history".to_string());
    destination_dir.join(stem)
}
