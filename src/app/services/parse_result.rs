//! Parsing statistics and result structures shared by both export parsers

use crate::app::models::CanonicalView;
use crate::app::services::reporter::{Reporter, format_count};
use crate::app::services::source_extractor::DocumentKind;
use crate::{Error, Result};

/// Counters describing one parse
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Candidate records (JSON) or entry blocks (HTML) seen
    pub total: usize,
    /// Views produced
    pub views: usize,
    /// Candidates without a channel link, a subset of ignored ads
    pub surveys: usize,
    /// Entries skipped because an expected element or field was missing
    pub malformed: usize,
}

impl ParseStats {
    pub fn new() -> Self {
        Self {
            total: 0,
            views: 0,
            surveys: 0,
            malformed: 0,
        }
    }

    /// Candidates that did not become views
    pub fn ads_ignored(&self) -> usize {
        self.total.saturating_sub(self.views)
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Views produced by a parser, in document order, with their statistics
#[derive(Debug, Clone)]
pub struct ParsedViews {
    pub kind: DocumentKind,
    pub document: String,
    pub views: Vec<CanonicalView>,
    pub stats: ParseStats,
}

impl ParsedViews {
    /// Turn a parse that produced nothing into [`Error::EmptyResult`]
    pub fn into_non_empty(self) -> Result<Self> {
        if self.views.is_empty() {
            Err(Error::empty_result(self.document))
        } else {
            Ok(self)
        }
    }

    /// Emit the standard parse summary
    pub fn report(&self, reporter: &Reporter<'_>) {
        let stats = &self.stats;
        reporter.count(stats.total, "total records processed");
        match self.kind {
            DocumentKind::Structured => reporter.info(format!(
                "{}, {} were surveys",
                format_count(stats.ads_ignored(), "ads ignored"),
                stats.surveys
            )),
            DocumentKind::Narrative => reporter.count(stats.ads_ignored(), "ads ignored"),
        }
        if stats.malformed > 0 {
            reporter.count(stats.malformed, "malformed entries skipped");
        }
        reporter.count(stats.views, "views");
    }
}
