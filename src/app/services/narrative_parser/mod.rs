//! Parser for the HTML (narrative) watch history export
//!
//! The HTML export is a flat sequence of entry blocks. Video views carry two
//! links (video and channel) followed by a local date-time string; ads and
//! surveys carry at most one link and are only counted.
//!
//! ## Architecture
//!
//! - [`parser`] - Entry traversal and field extraction
//! - [`timestamp`] - Date-time splitting and timezone inference
//!
//! Timezone inference is stateful: the zone named by the most recent
//! recognised abbreviation applies to every later entry until another one is
//! seen, so entries are always processed sequentially in document order.

pub mod parser;
pub mod timestamp;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::NarrativeParser;
pub use timestamp::{RawTimestamp, ViewZone, ZoneTracker, split_timestamp, zone_for_abbreviation};
