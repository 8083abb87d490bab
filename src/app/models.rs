//! Core data structures for watch history processing
//!
//! Defines the canonical view record both export formats are normalised into,
//! the rollup rows built from views, and the monthly activity buckets.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{CHANNEL_ID_MARKER, VIDEO_ID_MARKER};

/// One normalised watch event, regardless of source format
///
/// Views are only constructed by the parsers through [`CanonicalView::new`],
/// which derives `channel_id` and `video_id` from the URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalView {
    pub channel_title: String,
    pub channel_url: String,
    pub channel_id: String,
    pub video_title: String,
    pub video_url: String,
    pub video_id: String,
    pub viewed_at: DateTime<FixedOffset>,
}

impl CanonicalView {
    /// Create a view, deriving both ids from their URLs
    pub fn new(
        channel_title: impl Into<String>,
        channel_url: impl Into<String>,
        video_title: impl Into<String>,
        video_url: impl Into<String>,
        viewed_at: DateTime<FixedOffset>,
    ) -> Self {
        let channel_url = channel_url.into();
        let video_url = video_url.into();
        Self {
            channel_id: derive_channel_id(&channel_url).to_string(),
            video_id: derive_video_id(&video_url).to_string(),
            channel_title: channel_title.into(),
            channel_url,
            video_title: video_title.into(),
            video_url,
            viewed_at,
        }
    }
}

/// Text after the first `/channel/` in a channel URL, or the URL itself
pub fn derive_channel_id(channel_url: &str) -> &str {
    channel_url
        .split_once(CHANNEL_ID_MARKER)
        .map_or(channel_url, |(_, id)| id)
}

/// Text after the first `?v=` in a video URL, or the URL itself
pub fn derive_video_id(video_url: &str) -> &str {
    video_url
        .split_once(VIDEO_ID_MARKER)
        .map_or(video_url, |(_, id)| id)
}

/// Columns retained when rolling views up into videos
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoIdentity {
    pub channel_id: String,
    pub channel_title: String,
    pub channel_url: String,
    pub video_id: String,
    pub video_title: String,
    pub video_url: String,
}

impl From<&CanonicalView> for VideoIdentity {
    fn from(view: &CanonicalView) -> Self {
        Self {
            channel_id: view.channel_id.clone(),
            channel_title: view.channel_title.clone(),
            channel_url: view.channel_url.clone(),
            video_id: view.video_id.clone(),
            video_title: view.video_title.clone(),
            video_url: view.video_url.clone(),
        }
    }
}

/// One distinct video with the number of views of its URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRow {
    #[serde(flatten)]
    pub video: VideoIdentity,
    pub views: usize,
}

/// Columns retained when rolling videos up into channels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelIdentity {
    pub channel_id: String,
    pub channel_title: String,
    pub channel_url: String,
}

impl From<&VideoRow> for ChannelIdentity {
    fn from(row: &VideoRow) -> Self {
        Self {
            channel_id: row.video.channel_id.clone(),
            channel_title: row.video.channel_title.clone(),
            channel_url: row.video.channel_url.clone(),
        }
    }
}

/// One distinct channel with the number of distinct videos watched on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRow {
    #[serde(flatten)]
    pub channel: ChannelIdentity,
    pub videos: usize,
}

/// Number of views within one calendar month
///
/// `month` is the first day of the month at midnight, with no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: NaiveDateTime,
    pub count: usize,
}

/// The four tables produced by one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryTables {
    pub views: Vec<CanonicalView>,
    pub videos: Vec<VideoRow>,
    pub channels: Vec<ChannelRow>,
    pub monthly: Vec<MonthlyBucket>,
}

impl HistoryTables {
    /// Views of videos that had already been watched earlier
    pub fn repeat_views(&self) -> usize {
        self.views.len().saturating_sub(self.videos.len())
    }
}
