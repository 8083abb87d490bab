//! Aggregation of canonical views into summary tables
//!
//! # Architecture
//!
//! - [`rollup`] - Distinct-row counting used for the video and channel tables
//! - [`monthly`] - Gap-free month-by-month activity series
//!
//! # Pipeline
//!
//! 1. **Videos**: views rolled up on `video_url`, counted as `views`
//! 2. **Channels**: videos rolled up on `channel_url`, counted as `videos`
//! 3. **Monthly**: views truncated to their month and counted, with empty
//!    months between the first and last filled with zero
//!
//! Keys are always URLs, never the ids derived from them.

pub mod monthly;
pub mod rollup;

#[cfg(test)]
pub mod tests;

pub use monthly::bucket_by_month;
pub use rollup::{build_channels, build_videos, rollup};
