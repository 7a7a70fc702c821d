use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::core::FormatInfo;
use crate::download::download_text;
use crate::error::{CobaltError, Result};
use crate::youtube::types::PlayerResponse;

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";

/// Fetch video page HTML
pub async fn fetch_watch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static("CONSENT=YES+cb; SOCS=CAI"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    download_text(client, url, headers).await
}

/// Extract player response from HTML
pub fn parse_player_response_from_html(html: &str) -> Result<PlayerResponse> {
    let st_index = html.find(PLAYER_RESPONSE_MARKER).ok_or_else(|| {
        CobaltError::ParseError("ytInitialPlayerResponse not found".to_string())
    })? + PLAYER_RESPONSE_MARKER.len();

    // The object is followed by more script, read exactly one JSON value
    let mut stream =
        serde_json::Deserializer::from_str(&html[st_index..]).into_iter::<PlayerResponse>();
    match stream.next() {
        Some(Ok(player_response)) => Ok(player_response),
        Some(Err(e)) => Err(CobaltError::ParseError(format!(
            "Failed to parse player response JSON: {}",
            e
        ))),
        None => Err(CobaltError::ParseError(
            "ytInitialPlayerResponse is empty".to_string(),
        )),
    }
}

/// Muxed formats first, then adaptive ones; fails if the video is not playable
pub fn extract_formats(player_response: &PlayerResponse) -> Result<Vec<FormatInfo>> {
    if let Some(status) = &player_response.playability_status
        && status.status != "OK"
    {
        let reason = status.reason.as_deref().unwrap_or("Unknown error");
        warn!(status = %status.status, reason, "video not playable");
        return Err(CobaltError::VideoUnavailable(reason.to_string()));
    }

    let formats: Vec<FormatInfo> = player_response
        .streaming_data
        .iter()
        .flat_map(|s| s.formats.iter().chain(s.adaptive_formats.iter()))
        .map(FormatInfo::from)
        .collect();
    debug!(count = formats.len(), "formats extracted");
    Ok(formats)
}
