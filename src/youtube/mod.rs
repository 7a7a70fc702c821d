use async_trait::async_trait;
use tracing::debug;

use crate::config::{ClientConfig, DEFAULT_YOUTUBE_URL};
use crate::core::{FormatInfo, VideoSource};
use crate::download::build_http_client;
use crate::error::Result;

pub mod core;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use self::core::{extract_formats, fetch_watch_page, parse_player_response_from_html};
pub use types::{Format, PlayabilityStatus, PlayerResponse, StreamingData, VideoDetails};
pub use utils::{is_valid_video_url, parse_id};

/// YouTube metadata source implementing the VideoSource trait
#[derive(Debug, Clone)]
pub struct YoutubeSource {
    client: reqwest::Client,
    config: ClientConfig,
}

impl YoutubeSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_YOUTUBE_URL)
    }

    /// Source reading watch pages from another host (for testing with wiremock)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl VideoSource for YoutubeSource {
    fn is_valid_source(&self, url: &str) -> bool {
        is_valid_video_url(url)
    }

    async fn list_formats(&self, url: &str) -> Result<Vec<FormatInfo>> {
        let video_id = parse_id(url)?;
        let page_url = self.config.endpoint(&utils::build_watch_path(&video_id));
        debug!(video_id = %video_id, "fetching watch page");

        let html = fetch_watch_page(&self.client, &page_url).await?;
        let player_response = parse_player_response_from_html(&html)?;
        if let Some(details) = &player_response.video_details {
            debug!(video_id = %details.video_id, title = %details.title, "player response parsed");
        }
        extract_formats(&player_response)
    }
}
