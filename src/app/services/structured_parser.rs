//! Parser for the JSON (structured) watch history export
//!
//! The export is a list of activity records. Only records carrying a
//! `subtitles` field are candidates; a candidate becomes a view when its
//! first subtitle links to a channel. Candidates without that link are
//! survey ads.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::app::models::CanonicalView;
use crate::app::services::parse_result::{ParseStats, ParsedViews};
use crate::app::services::reporter::Reporter;
use crate::app::services::source_extractor::DocumentKind;
use crate::config::MalformedPolicy;
use crate::constants::WATCHED_PREFIX;
use crate::{Error, Result};

/// One activity record as exported
#[derive(Debug, Deserialize)]
struct ActivityRecord {
    title: Option<String>,
    #[serde(rename = "titleUrl")]
    title_url: Option<String>,
    time: Option<String>,
    subtitles: Option<Vec<Subtitle>>,
}

#[derive(Debug, Deserialize)]
struct Subtitle {
    name: Option<String>,
    url: Option<String>,
}

/// Outcome of inspecting one candidate record
enum Candidate {
    View(CanonicalView),
    Survey,
}

/// Parser for JSON watch history documents
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredParser {
    policy: MalformedPolicy,
}

impl StructuredParser {
    /// Create a parser with the given malformed record policy
    pub fn new(policy: MalformedPolicy) -> Self {
        Self { policy }
    }

    /// Parse a JSON document into views, preserving record order
    pub fn parse(
        &self,
        document: &str,
        content: &[u8],
        reporter: &Reporter<'_>,
    ) -> Result<ParsedViews> {
        let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
        let records: Vec<Value> = serde_json::from_slice(content)
            .map_err(|e| Error::parse(document, format!("not a list of records: {}", e)))?;
        debug!("Decoded {} activity records from {}", records.len(), document);

        let mut stats = ParseStats::new();
        let mut views = Vec::new();

        for (index, value) in records.into_iter().enumerate() {
            if value.get("subtitles").is_none_or(Value::is_null) {
                continue;
            }
            stats.total += 1;

            let outcome = serde_json::from_value::<ActivityRecord>(value)
                .map_err(|e| format!("unexpected field type: {}", e))
                .and_then(|record| candidate_from_record(&record));

            match outcome {
                Ok(Candidate::View(view)) => views.push(view),
                Ok(Candidate::Survey) => stats.surveys += 1,
                Err(reason) => self.handle_malformed(document, &mut stats, index + 1, reason)?,
            }
        }

        stats.views = views.len();
        let parsed = ParsedViews {
            kind: DocumentKind::Structured,
            document: document.to_string(),
            views,
            stats,
        };
        parsed.report(reporter);
        Ok(parsed)
    }

    fn handle_malformed(
        &self,
        document: &str,
        stats: &mut ParseStats,
        record: usize,
        reason: String,
    ) -> Result<()> {
        match self.policy {
            MalformedPolicy::Abort => Err(Error::parse(
                document,
                format!("record {}: {}", record, reason),
            )),
            MalformedPolicy::Skip => {
                warn!("Skipping record {}: {}", record, reason);
                stats.malformed += 1;
                Ok(())
            }
        }
    }
}

fn candidate_from_record(record: &ActivityRecord) -> std::result::Result<Candidate, String> {
    let subtitles = record.subtitles.as_deref().unwrap_or_default();
    let Some(channel) = subtitles.first() else {
        return Ok(Candidate::Survey);
    };
    let Some(channel_url) = &channel.url else {
        return Ok(Candidate::Survey);
    };

    let video_url = record
        .title_url
        .as_deref()
        .ok_or_else(|| "missing 'titleUrl'".to_string())?;
    let title = record
        .title
        .as_deref()
        .ok_or_else(|| "missing 'title'".to_string())?;
    let time = record
        .time
        .as_deref()
        .ok_or_else(|| "missing 'time'".to_string())?;
    let viewed_at = DateTime::parse_from_rfc3339(time)
        .map_err(|e| format!("invalid time '{}': {}", time, e))?;

    Ok(Candidate::View(CanonicalView::new(
        channel.name.clone().unwrap_or_default(),
        channel_url.clone(),
        strip_watched_prefix(title),
        video_url,
        viewed_at,
    )))
}

/// Remove the leading "Watched " marker from an export title
pub fn strip_watched_prefix(title: &str) -> &str {
    title.strip_prefix(WATCHED_PREFIX).unwrap_or(title)
}
