//! Core HTML export parser
//!
//! Entry layout in the export:
//!
//! ```text
//! div.outer-cell
//!   div.mdl-grid
//!     div.header-cell      "YouTube"
//!     div.content-cell     0 links = survey, 1 link = ad, 2 links = video
//!                          a(video) br a(channel) br "<date time> [TZ]" br
//!     div.content-cell     (empty, right aligned)
//!     div.content-cell     "Products", optional "Details", "Why is this here?"
//! ```

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::timestamp::{RawTimestamp, ViewZone, ZoneTracker, split_timestamp};
use crate::app::models::CanonicalView;
use crate::app::services::parse_result::{ParseStats, ParsedViews};
use crate::app::services::reporter::Reporter;
use crate::app::services::source_extractor::DocumentKind;
use crate::config::MalformedPolicy;
use crate::constants::ENTRY_CLASS_PREFIX;
use crate::{Error, Result};

/// Parser for HTML watch history documents
#[derive(Debug, Clone, Copy)]
pub struct NarrativeParser {
    policy: MalformedPolicy,
    default_zone: ViewZone,
}

impl Default for NarrativeParser {
    fn default() -> Self {
        Self::new(MalformedPolicy::default(), ViewZone::SystemLocal)
    }
}

/// Fields read from a qualifying entry, before timezone resolution
#[derive(Debug)]
struct EntryFields {
    video_title: String,
    video_url: String,
    channel_title: String,
    channel_url: String,
    timestamp: RawTimestamp,
}

/// Accumulator threaded through the entries in document order
#[derive(Debug)]
struct ParseState {
    zone: ZoneTracker,
    views: Vec<CanonicalView>,
    stats: ParseStats,
}

impl NarrativeParser {
    /// Create a parser
    ///
    /// `default_zone` applies to entries before the first recognised
    /// timezone abbreviation.
    pub fn new(policy: MalformedPolicy, default_zone: ViewZone) -> Self {
        Self {
            policy,
            default_zone,
        }
    }

    /// Parse an HTML document into views, preserving entry order
    pub fn parse(
        &self,
        document: &str,
        content: &[u8],
        reporter: &Reporter<'_>,
    ) -> Result<ParsedViews> {
        let html = String::from_utf8_lossy(content);
        let dom = Html::parse_document(&html);

        let entry_selector = build_selector(
            document,
            &format!("div[class^=\"{}\"]", ENTRY_CLASS_PREFIX),
        )?;
        let link_selector = build_selector(document, "a")?;

        let initial = ParseState {
            zone: ZoneTracker::new(self.default_zone),
            views: Vec::new(),
            stats: ParseStats::new(),
        };

        let state = dom
            .select(&entry_selector)
            .try_fold(initial, |mut state, entry| {
                state.stats.total += 1;
                let index = state.stats.total;

                match read_entry(entry, &link_selector) {
                    Ok(None) => {}
                    Ok(Some(fields)) => match state.zone.resolve(&fields.timestamp) {
                        Some(viewed_at) => state.views.push(CanonicalView::new(
                            fields.channel_title,
                            fields.channel_url,
                            fields.video_title,
                            fields.video_url,
                            viewed_at,
                        )),
                        None => self.handle_malformed(
                            &mut state.stats,
                            index,
                            format!("time {} cannot be localised", fields.timestamp.naive),
                        )?,
                    },
                    Err(reason) => self.handle_malformed(&mut state.stats, index, reason)?,
                }
                Ok::<_, Error>(state)
            })?;

        debug!(
            "Finished {} with current zone {:?}",
            document,
            state.zone.current()
        );

        let ParseState {
            views, mut stats, ..
        } = state;
        stats.views = views.len();

        let parsed = ParsedViews {
            kind: DocumentKind::Narrative,
            document: document.to_string(),
            views,
            stats,
        };
        parsed.report(reporter);
        Ok(parsed)
    }

    fn handle_malformed(&self, stats: &mut ParseStats, entry: usize, reason: String) -> Result<()> {
        match self.policy {
            MalformedPolicy::Abort => Err(Error::malformed_markup(entry, reason)),
            MalformedPolicy::Skip => {
                warn!("Skipping entry {}: {}", entry, reason);
                stats.malformed += 1;
                Ok(())
            }
        }
    }
}

fn build_selector(document: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::parse(document, format!("invalid selector '{}': {:?}", selector, e)))
}

/// Read one entry block
///
/// `Ok(None)` means the entry is an ad or survey. `Err` means the entry is
/// missing part of its expected structure.
fn read_entry(
    entry: ElementRef<'_>,
    link_selector: &Selector,
) -> std::result::Result<Option<EntryFields>, String> {
    let content = content_region(entry).ok_or_else(|| "missing content region".to_string())?;

    let links: Vec<ElementRef<'_>> = content.select(link_selector).take(2).collect();
    let [video, channel] = links.as_slice() else {
        return Ok(None);
    };

    let video_url = href(video, "video")?;
    let channel_url = href(channel, "channel")?;
    let date_text = text_after_second_break(content)
        .ok_or_else(|| "no date text after the second line break".to_string())?;
    let timestamp = split_timestamp(&date_text)
        .ok_or_else(|| format!("unrecognised date '{}'", date_text.trim()))?;

    Ok(Some(EntryFields {
        video_title: video.text().collect(),
        video_url,
        channel_title: channel.text().collect(),
        channel_url,
        timestamp,
    }))
}

/// Second class-bearing child `div` of the entry's first child `div`
fn content_region(entry: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let grid = child_elements(entry).find(|el| el.value().name() == "div")?;
    child_elements(grid)
        .filter(|el| el.value().name() == "div" && el.value().attr("class").is_some())
        .nth(1)
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

fn href(link: &ElementRef<'_>, role: &str) -> std::result::Result<String, String> {
    link.value()
        .attr("href")
        .map(str::to_string)
        .ok_or_else(|| format!("{} link has no href", role))
}

/// Text directly following the second `<br>` child of the content region
fn text_after_second_break(content: ElementRef<'_>) -> Option<String> {
    let second_break = content
        .children()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| el.name() == "br")
        })
        .nth(1)?;

    let text = second_break.next_sibling()?.value().as_text()?;
    Some(text.to_string())
}
