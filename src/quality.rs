use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::DownloadConfig;
use crate::core::VideoSource;
use crate::error::{CobaltError, Result};

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)p").unwrap());

/// Reduce a raw quality label to its resolution, e.g. `1080p60` -> `1080`
///
/// Unlike a plain removal of `p60` and `p`, any frame rate or suffix after the
/// resolution is dropped too: `1080p50` gives `1080`, not `108050`. Labels not
/// starting with `<digits>p` only get the plain removal.
pub fn normalize_quality_label(label: &str) -> String {
    if let Some(caps) = LABEL_RE.captures(label) {
        return caps[1].to_string();
    }
    label.replacen("p60", "", 1).replacen('p', "", 1)
}

/// Distinct normalized labels, in the order they first appear
pub fn dedup_quality_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut qualities: Vec<String> = Vec::new();
    for label in labels {
        let quality = normalize_quality_label(label);
        if !qualities.contains(&quality) {
            qualities.push(quality);
        }
    }
    qualities
}

/// List the video qualities `source` reports for `url`
pub async fn available_qualities(source: &dyn VideoSource, url: &str) -> Result<Vec<String>> {
    if !source.is_valid_source(url) {
        return Err(CobaltError::InvalidSource(url.to_string()));
    }

    let formats = source
        .list_formats(url)
        .await
        .map_err(CobaltError::metadata)?;

    let qualities = dedup_quality_labels(
        formats
            .iter()
            .filter(|f| f.has_video())
            .filter_map(|f| f.quality_label.as_deref()),
    );
    debug!(url, ?qualities, "available qualities");
    Ok(qualities)
}

impl DownloadConfig {
    /// Qualities the target URL is available in, according to `source`
    pub async fn available_qualities_with(&self, source: &dyn VideoSource) -> Result<Vec<String>> {
        available_qualities(source, self.url()).await
    }

    /// Qualities the target URL is available in on YouTube
    #[cfg(feature = "youtube")]
    pub async fn available_qualities(&self) -> Result<Vec<String>> {
        let source = crate::youtube::YoutubeSource::new()?;
        self.available_qualities_with(&source).await
    }
}
