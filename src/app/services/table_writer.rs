//! Table output
//!
//! The engine hands its four tables to a [`TableSink`]. The default sink
//! converts them to polars DataFrames and writes one file per table next to
//! each other, named `<base>_<table>.<ext>`.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info};

use crate::app::models::{CanonicalView, ChannelRow, HistoryTables, MonthlyBucket, VideoRow};
use crate::config::TableFormat;
use crate::constants::tables;
use crate::{Error, Result};

/// Destination for the tables produced by a run
pub trait TableSink {
    /// Write all tables using `destination` as the base path
    ///
    /// Returns the paths written, in table order.
    fn write_tables(&self, tables: &HistoryTables, destination: &Path) -> Result<Vec<PathBuf>>;
}

/// Writes tables as Parquet or CSV files through polars
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarsTableWriter {
    format: TableFormat,
}

impl PolarsTableWriter {
    pub fn new(format: TableFormat) -> Self {
        Self { format }
    }

    /// Path of one table file for the given base path
    pub fn table_path(&self, destination: &Path, table: &str) -> PathBuf {
        let base = destination
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        destination.with_file_name(format!(
            "{}_{}.{}",
            base,
            table,
            self.format.extension()
        ))
    }

    fn write_frame(&self, mut frame: DataFrame, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;

        let written = match self.format {
            TableFormat::Parquet => ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut frame)
                .map(|_| ()),
            TableFormat::Csv => CsvWriter::new(file)
                .include_header(true)
                .finish(&mut frame),
        };

        written.map_err(|e| {
            Error::output(format!("Failed to write {}", path.display()), Some(e))
        })?;
        debug!("Wrote {} rows to {}", frame.height(), path.display());
        Ok(())
    }
}

impl TableSink for PolarsTableWriter {
    fn write_tables(&self, tables: &HistoryTables, destination: &Path) -> Result<Vec<PathBuf>> {
        let frames = [
            (tables::VIEWS, views_frame(&tables.views)?),
            (tables::VIDEOS, videos_frame(&tables.videos)?),
            (tables::CHANNELS, channels_frame(&tables.channels)?),
            (tables::MONTHLY, monthly_frame(&tables.monthly)?),
        ];

        let mut written = Vec::with_capacity(frames.len());
        for (table, frame) in frames {
            let path = self.table_path(destination, table);
            self.write_frame(frame, &path)?;
            written.push(path);
        }

        info!(
            "Wrote {} tables as {:?} next to {}",
            written.len(),
            self.format,
            destination.display()
        );
        Ok(written)
    }
}

fn text_column<T>(rows: &[T], get: impl Fn(&T) -> &str) -> Vec<&str> {
    rows.iter().map(get).collect()
}

/// Views table: `video_title`, `video_url`, `viewed_at` (RFC 3339 text)
pub fn views_frame(views: &[CanonicalView]) -> Result<DataFrame> {
    let video_title: Vec<&str> = views.iter().map(|v| v.video_title.as_str()).collect();
    let video_url: Vec<&str> = views.iter().map(|v| v.video_url.as_str()).collect();
    let viewed_at: Vec<String> = views.iter().map(|v| v.viewed_at.to_rfc3339()).collect();

    Ok(df!(
        "video_title" => video_title,
        "video_url" => video_url,
        "viewed_at" => viewed_at
    )?)
}

pub fn videos_frame(videos: &[VideoRow]) -> Result<DataFrame> {
    let views: Vec<u64> = videos.iter().map(|row| row.views as u64).collect();

    Ok(df!(
        "channel_id" => text_column(videos, |row| row.video.channel_id.as_str()),
        "channel_title" => text_column(videos, |row| row.video.channel_title.as_str()),
        "channel_url" => text_column(videos, |row| row.video.channel_url.as_str()),
        "video_id" => text_column(videos, |row| row.video.video_id.as_str()),
        "video_title" => text_column(videos, |row| row.video.video_title.as_str()),
        "video_url" => text_column(videos, |row| row.video.video_url.as_str()),
        "views" => views
    )?)
}

pub fn channels_frame(channels: &[ChannelRow]) -> Result<DataFrame> {
    let videos: Vec<u64> = channels.iter().map(|row| row.videos as u64).collect();

    Ok(df!(
        "channel_id" => text_column(channels, |row| row.channel.channel_id.as_str()),
        "channel_title" => text_column(channels, |row| row.channel.channel_title.as_str()),
        "channel_url" => text_column(channels, |row| row.channel.channel_url.as_str()),
        "videos" => videos
    )?)
}

/// Monthly table: `month` as a naive datetime column, `count`
pub fn monthly_frame(monthly: &[MonthlyBucket]) -> Result<DataFrame> {
    let month: Vec<chrono::NaiveDateTime> = monthly.iter().map(|b| b.month).collect();
    let count: Vec<u64> = monthly.iter().map(|b| b.count as u64).collect();

    Ok(df!(
        "month" => month,
        "count" => count
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::aggregation::{build_channels, build_videos};
    use chrono::DateTime;
    use tempfile::TempDir;

    fn sample_tables() -> HistoryTables {
        let at = |s: &str| DateTime::parse_from_rfc3339(s).unwrap();
        let views = vec![
            CanonicalView::new(
                "Ch",
                "https://www.youtube.com/channel/CH1",
                "X",
                "https://www.youtube.com/watch?v=abc",
                at("2023-01-05T10:00:00-05:00"),
            ),
            CanonicalView::new(
                "Ch",
                "https://www.youtube.com/channel/CH1",
                "X",
                "https://www.youtube.com/watch?v=abc",
                at("2023-03-05T10:00:00-05:00"),
            ),
        ];
        let videos = build_videos(&views);
        let channels = build_channels(&videos);
        let monthly = vec![
            MonthlyBucket {
                month: at("2023-01-01T00:00:00Z").naive_utc(),
                count: 1,
            },
            MonthlyBucket {
                month: at("2023-02-01T00:00:00Z").naive_utc(),
                count: 0,
            },
            MonthlyBucket {
                month: at("2023-03-01T00:00:00Z").naive_utc(),
                count: 1,
            },
        ];
        HistoryTables {
            views,
            videos,
            channels,
            monthly,
        }
    }

    #[test]
    fn test_frames_follow_output_contract() {
        let tables = sample_tables();

        let views = views_frame(&tables.views).unwrap();
        assert_eq!(
            views.get_column_names_str(),
            vec!["video_title", "video_url", "viewed_at"]
        );
        assert_eq!(views.height(), 2);

        let videos = videos_frame(&tables.videos).unwrap();
        assert_eq!(
            videos.get_column_names_str(),
            vec![
                "channel_id",
                "channel_title",
                "channel_url",
                "video_id",
                "video_title",
                "video_url",
                "views"
            ]
        );
        assert_eq!(videos.height(), 1);

        let channels = channels_frame(&tables.channels).unwrap();
        assert_eq!(
            channels.get_column_names_str(),
            vec!["channel_id", "channel_title", "channel_url", "videos"]
        );

        let monthly = monthly_frame(&tables.monthly).unwrap();
        assert_eq!(monthly.get_column_names_str(), vec!["month", "count"]);
        assert_eq!(monthly.height(), 3);
    }

    #[test]
    fn test_table_path_naming() {
        let writer = PolarsTableWriter::new(TableFormat::Csv);
        let path = writer.table_path(Path::new("/out/takeout-2024"), tables::MONTHLY);
        assert_eq!(path, PathBuf::from("/out/takeout-2024_monthly.csv"));
    }

    #[test]
    fn test_write_parquet_tables() {
        let dir = TempDir::new().unwrap();
        let writer = PolarsTableWriter::default();

        let written = writer
            .write_tables(&sample_tables(), &dir.path().join("history"))
            .unwrap();

        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
            assert_eq!(path.extension().unwrap(), "parquet");
        }
        assert!(dir.path().join("history_views.parquet").exists());
    }

    #[test]
    fn test_write_csv_tables() {
        let dir = TempDir::new().unwrap();
        let writer = PolarsTableWriter::new(TableFormat::Csv);

        writer
            .write_tables(&sample_tables(), &dir.path().join("history"))
            .unwrap();

        let videos = std::fs::read_to_string(dir.path().join("history_videos.csv")).unwrap();
        let mut lines = videos.lines();
        assert_eq!(
            lines.next().unwrap(),
            "channel_id,channel_title,channel_url,video_id,video_title,video_url,views"
        );
        assert_eq!(
            lines.next().unwrap(),
            "CH1,Ch,https://www.youtube.com/channel/CH1,abc,X,https://www.youtube.com/watch?v=abc,2"
        );

        let views = std::fs::read_to_string(dir.path().join("history_views.csv")).unwrap();
        assert!(views.contains("2023-01-05T10:00:00-05:00"));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let writer = PolarsTableWriter::default();

        let err = writer
            .write_tables(&sample_tables(), &dir.path().join("absent").join("history"))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
