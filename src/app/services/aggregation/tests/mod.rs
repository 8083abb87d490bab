//! Tests for the aggregation module

mod rollup_tests;

use chrono::DateTime;

use crate::app::models::CanonicalView;

/// A view of `video` on `channel` at an RFC 3339 instant
pub fn view_at(channel: &str, video: &str, at: &str) -> CanonicalView {
    CanonicalView::new(
        format!("{} title", channel),
        format!("https://www.youtube.com/channel/{}", channel),
        format!("{} title", video),
        format!("https://www.youtube.com/watch?v={}", video),
        DateTime::parse_from_rfc3339(at).unwrap(),
    )
}

/// A view at a fixed instant
pub fn view(channel: &str, video: &str) -> CanonicalView {
    view_at(channel, video, "2023-01-05T10:00:00Z")
}
