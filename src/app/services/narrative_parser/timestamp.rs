//! Timestamp extraction and timezone inference for the HTML export
//!
//! HTML timestamps are local wall-clock strings such as
//! `"Jan 5, 2023, 10:00:00 AM EST"`. The trailing abbreviation is optional
//! and only a handful are recognised, so the zone is tracked across entries:
//! a recognised abbreviation sets the current zone and every entry is
//! localised in whatever zone is current when it is reached.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use regex::Regex;

use crate::constants::{
    NARRATIVE_TIME_FORMATS, NARRATIVE_TIME_FORMATS_24H, SPACE_VARIANTS, ZONE_ABBREVIATIONS,
};

static RE_CLOCK_PORTION: OnceLock<Regex> = OnceLock::new();

fn clock_portion_regex() -> &'static Regex {
    RE_CLOCK_PORTION
        .get_or_init(|| Regex::new(r"(?i)^\s*(.*?\d\s*[ap]m)\b").expect("valid clock regex"))
}

/// Timestamp text split into its naive date-time and candidate zone token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTimestamp {
    pub naive: NaiveDateTime,
    /// Last whitespace-delimited token of the text, recognised or not
    pub zone_token: Option<String>,
}

/// Replace the export's narrow and non-breaking spaces with ordinary spaces
pub fn normalize_spaces(text: &str) -> String {
    text.replace(SPACE_VARIANTS, " ")
}

/// Split a timestamp text into a naive date-time and a candidate zone token
///
/// Returns `None` when no supported date-time layout matches.
pub fn split_timestamp(text: &str) -> Option<RawTimestamp> {
    let text = normalize_spaces(text);
    let text = text.trim();
    let zone_token = text.split_whitespace().last().map(str::to_string);

    let naive = match clock_portion_regex().captures(text) {
        Some(captures) => {
            let stamp = captures.get(1)?.as_str().trim();
            parse_with(stamp, NARRATIVE_TIME_FORMATS)?
        }
        None => parse_with(strip_zone_token(text), NARRATIVE_TIME_FORMATS_24H)?,
    };

    Some(RawTimestamp { naive, zone_token })
}

fn parse_with(stamp: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(stamp, format).ok())
}

/// Drop a trailing alphabetic token, e.g. `"5 Jan 2023, 10:00:00 CET"`
fn strip_zone_token(text: &str) -> &str {
    match text.rsplit_once(char::is_whitespace) {
        Some((head, tail)) if tail.chars().all(|c| c.is_ascii_alphabetic()) => head.trim_end(),
        _ => text,
    }
}

/// IANA zone for a recognised abbreviation
pub fn zone_for_abbreviation(token: &str) -> Option<Tz> {
    ZONE_ABBREVIATIONS
        .iter()
        .find(|(abbreviation, _)| *abbreviation == token)
        .map(|(_, zone)| *zone)
}

/// Zone a naive timestamp is interpreted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewZone {
    /// Timezone of the machine running the parse
    SystemLocal,
    Named(Tz),
}

impl ViewZone {
    /// Attach this zone to a naive local time
    ///
    /// Ambiguous times (clocks falling back) take the earlier instant. Times
    /// skipped by a forward transition are moved one hour later.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            ViewZone::SystemLocal => localize_in(&Local, naive),
            ViewZone::Named(zone) => localize_in(zone, naive),
        }
    }
}

fn localize_in<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            let shifted = naive.checked_add_signed(TimeDelta::hours(1))?;
            zone.from_local_datetime(&shifted).earliest()
        })
        .map(|dt| dt.fixed_offset())
}

/// Current zone carried from entry to entry in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneTracker {
    current: ViewZone,
}

impl ZoneTracker {
    /// Start from the given default zone
    pub fn new(initial: ViewZone) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> ViewZone {
        self.current
    }

    /// Update the current zone if the token is a recognised abbreviation
    pub fn observe(&mut self, token: Option<&str>) {
        if let Some(zone) = token.and_then(zone_for_abbreviation) {
            self.current = ViewZone::Named(zone);
        }
    }

    /// Observe the timestamp's token, then localise it in the current zone
    pub fn resolve(&mut self, raw: &RawTimestamp) -> Option<DateTime<FixedOffset>> {
        self.observe(raw.zone_token.as_deref());
        self.current.localize(raw.naive)
    }
}
