//! Distinct-row rollups with occurrence counts

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tracing::debug;

use crate::app::models::{
    CanonicalView, ChannelIdentity, ChannelRow, VideoIdentity, VideoRow,
};

/// Distinct retained rows of `source`, each with the occurrence count of its key
///
/// One row is produced per distinct retained value, in first-occurrence
/// order. Its count is the number of source items sharing its key, so two
/// rows with the same key but different retained columns both carry the full
/// key count. Rows are sorted by count, highest first; equal counts keep
/// first-occurrence order.
pub fn rollup<'a, S, R, K>(
    source: &'a [S],
    retain: impl Fn(&'a S) -> R,
    key: impl Fn(&'a S) -> K,
) -> Vec<(R, usize)>
where
    R: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
{
    let mut key_counts: HashMap<K, usize> = HashMap::new();
    let mut seen: HashSet<R> = HashSet::new();
    let mut distinct: Vec<(R, K)> = Vec::new();

    for item in source {
        let item_key = key(item);
        *key_counts.entry(item_key.clone()).or_default() += 1;

        let row = retain(item);
        if seen.insert(row.clone()) {
            distinct.push((row, item_key));
        }
    }

    let mut rows: Vec<(R, usize)> = distinct
        .into_iter()
        .map(|(row, row_key)| {
            let count = key_counts.get(&row_key).copied().unwrap_or_default();
            (row, count)
        })
        .collect();

    // sort_by is stable, so ties stay in first-seen order
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}

/// Video rows keyed on `video_url`, counting views
pub fn build_videos(views: &[CanonicalView]) -> Vec<VideoRow> {
    let videos: Vec<VideoRow> = rollup(views, VideoIdentity::from, |view| {
        view.video_url.as_str()
    })
    .into_iter()
    .map(|(video, views)| VideoRow { video, views })
    .collect();

    debug!("Rolled {} views into {} videos", views.len(), videos.len());
    videos
}

/// Channel rows keyed on `channel_url`, counting video rows
pub fn build_channels(videos: &[VideoRow]) -> Vec<ChannelRow> {
    rollup(videos, ChannelIdentity::from, |row| {
        row.video.channel_url.as_str()
    })
    .into_iter()
    .map(|(channel, videos)| ChannelRow { channel, videos })
    .collect()
}
