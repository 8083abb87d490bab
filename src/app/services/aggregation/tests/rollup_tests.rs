use std::collections::HashSet;

use super::view;
use crate::app::services::aggregation::{build_channels, build_videos, rollup};

#[test]
fn test_rollup_counts_and_orders_by_count() {
    let source = ["a", "b", "b", "c", "b", "c"];
    let rows = rollup(&source, |s| s.to_uppercase(), |s| *s);
    assert_eq!(
        rows,
        vec![
            ("B".to_string(), 3),
            ("C".to_string(), 2),
            ("A".to_string(), 1)
        ]
    );
}

#[test]
fn test_rollup_ties_keep_first_seen_order() {
    let source = ["z", "y", "x", "y", "z", "x"];
    let rows = rollup(&source, |s| *s, |s| *s);
    assert_eq!(rows, vec![("z", 2), ("y", 2), ("x", 2)]);
}

#[test]
fn test_rollup_rows_sharing_a_key_carry_full_count() {
    let source = [("k", 1), ("k", 2), ("j", 3), ("k", 1)];
    let rows = rollup(&source, |(_, v)| *v, |(k, _)| *k);
    assert_eq!(rows, vec![(1, 3), (2, 3), (3, 1)]);
}

#[test]
fn test_rollup_empty_source() {
    let source: [&str; 0] = [];
    assert!(rollup(&source, |s| *s, |s| *s).is_empty());
}

#[test]
fn test_video_counts_sum_to_views() {
    let views = vec![
        view("CH1", "a"),
        view("CH1", "b"),
        view("CH2", "c"),
        view("CH1", "a"),
        view("CH2", "c"),
        view("CH1", "a"),
    ];

    let videos = build_videos(&views);
    assert_eq!(videos.len(), 3);
    assert_eq!(videos.iter().map(|v| v.views).sum::<usize>(), views.len());

    assert_eq!(videos[0].video.video_id, "a");
    assert_eq!(videos[0].views, 3);
    assert_eq!(videos[1].video.video_id, "c");
    assert_eq!(videos[2].video.video_id, "b");
}

#[test]
fn test_renamed_video_keeps_both_rows() {
    let mut renamed = view("CH1", "a");
    renamed.video_title = "Renamed later".to_string();
    let views = vec![view("CH1", "a"), renamed, view("CH1", "b")];

    let videos = build_videos(&views);
    let rows: Vec<(&str, usize)> = videos
        .iter()
        .map(|v| (v.video.video_title.as_str(), v.views))
        .collect();
    assert_eq!(
        rows,
        vec![("a title", 2), ("Renamed later", 2), ("b title", 1)]
    );
}

#[test]
fn test_channels_count_distinct_videos() {
    let views = vec![
        view("CH1", "a"),
        view("CH1", "a"),
        view("CH1", "a"),
        view("CH2", "c"),
        view("CH2", "d"),
        view("CH3", "e"),
    ];

    let videos = build_videos(&views);
    let channels = build_channels(&videos);

    let distinct: HashSet<&str> = videos
        .iter()
        .map(|v| v.video.channel_url.as_str())
        .collect();
    assert_eq!(channels.len(), distinct.len());

    assert_eq!(channels[0].channel.channel_id, "CH2");
    assert_eq!(channels[0].videos, 2);
    assert_eq!(channels[1].channel.channel_id, "CH1");
    assert_eq!(channels[1].videos, 1);
    assert_eq!(channels[2].channel.channel_id, "CH3");
    assert_eq!(channels.iter().map(|c| c.videos).sum::<usize>(), videos.len());
}
