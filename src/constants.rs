//! Application constants for the watch history processor
//!
//! This module contains the markers, file suffixes, timezone mappings and
//! default values used throughout the application.

// =============================================================================
// Source Detection
// =============================================================================

/// Archive member suffix selecting the HTML (narrative) export
pub const NARRATIVE_MEMBER_SUFFIX: &str = "watch-history.html";

/// Archive member suffix selecting the JSON (structured) export
pub const STRUCTURED_MEMBER_SUFFIX: &str = "watch-history.json";

/// Upper bound on the buffer reserved up front for an archive member
///
/// Member sizes come from the archive directory and are not trusted; larger
/// members still read in full, the buffer just grows as it goes.
pub const MAX_MEMBER_PREALLOCATION: u64 = 64 * 1024 * 1024;

/// Recognised source file extensions (compared case-insensitively)
pub mod extensions {
    pub const ARCHIVE: &str = "zip";
    pub const NARRATIVE: &str = "html";
    pub const STRUCTURED: &str = "json";
}

// =============================================================================
// Export Markers
// =============================================================================

/// Class prefix marking one activity entry in the HTML export
pub const ENTRY_CLASS_PREFIX: &str = "outer-cell";

/// Leading marker on structured export titles
pub const WATCHED_PREFIX: &str = "Watched ";

/// Marker preceding the channel id in a channel URL
pub const CHANNEL_ID_MARKER: &str = "/channel/";

/// Marker preceding the video id in a video URL
pub const VIDEO_ID_MARKER: &str = "?v=";

/// Characters the HTML export uses in place of an ordinary space
pub const SPACE_VARIANTS: &[char] = &['\u{202f}', '\u{00a0}'];

// =============================================================================
// Timezones
// =============================================================================

/// Timezone abbreviations recognised in HTML export timestamps
pub const ZONE_ABBREVIATIONS: &[(&str, chrono_tz::Tz)] = &[
    ("EST", chrono_tz::America::New_York),
    ("CST", chrono_tz::America::Chicago),
    ("MST", chrono_tz::America::Denver),
    ("PST", chrono_tz::America::Los_Angeles),
];

/// Date-time layouts tried, in order, for the 12-hour portion of an HTML timestamp
///
/// Numeric dates with an AM/PM marker are read month first.
pub const NARRATIVE_TIME_FORMATS: &[&str] = &[
    "%b %d, %Y, %I:%M:%S %p",
    "%b %d, %Y, %I:%M %p",
    "%B %d, %Y, %I:%M:%S %p",
    "%b %d, %Y %I:%M:%S %p",
    "%d %b %Y, %I:%M:%S %p",
    "%d %B %Y, %I:%M:%S %p",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Fallback 24-hour layouts for exports without an AM/PM marker
///
/// Numeric dates without an AM/PM marker are read day first.
pub const NARRATIVE_TIME_FORMATS_24H: &[&str] = &[
    "%b %d, %Y, %H:%M:%S",
    "%d %b %Y, %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%d %B %Y, %H:%M:%S",
    "%d %B %Y at %H:%M:%S",
    "%d.%m.%Y, %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d/%m/%Y, %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

// =============================================================================
// Output
// =============================================================================

/// Table names, used as output file suffixes
pub mod tables {
    pub const VIEWS: &str = "views";
    pub const VIDEOS: &str = "videos";
    pub const CHANNELS: &str = "channels";
    pub const MONTHLY: &str = "monthly";
}

/// Default number of rows shown per table by the inspect command
pub const DEFAULT_INSPECT_TOP: usize = 10;

/// Width used when right-aligning counts in progress messages
pub const COUNT_WIDTH: usize = 7;
