pub mod cobalt;
pub mod config;
pub mod core;
mod download;
pub mod error;
pub mod quality;
#[cfg(feature = "youtube")]
pub mod youtube;

pub use crate::cobalt::{CobaltClient, CobaltResponse, PickerItem};
pub use crate::config::ClientConfig;
pub use crate::core::{
    AudioFormat, DownloadConfig, FilenamePattern, FormatInfo, RequestPayload, VideoCodec,
    VideoQuality, VideoSource, allowed_values,
};
pub use crate::error::{CobaltError, Result};
pub use crate::quality::{available_qualities, normalize_quality_label};
#[cfg(feature = "youtube")]
pub use crate::youtube::YoutubeSource;

/// Preferred quality order of `--best`: 2160, then 1080, then whatever comes first
pub fn pick_best_quality(qualities: &[String]) -> Option<VideoQuality> {
    ["2160", "1080"]
        .iter()
        .find(|q| qualities.iter().any(|i| i == *q))
        .map(|q| q.to_string())
        .or_else(|| qualities.first().cloned())
        .and_then(|q| q.parse().ok())
}
