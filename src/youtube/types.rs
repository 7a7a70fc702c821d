use serde::{Deserialize, Serialize};

use crate::core::FormatInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResponse {
    #[serde(rename = "playabilityStatus")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playability_status: Option<PlayabilityStatus>,
    #[serde(rename = "streamingData")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming_data: Option<StreamingData>,
    #[serde(rename = "videoDetails")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_details: Option<VideoDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayabilityStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamingData {
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(rename = "adaptiveFormats")]
    #[serde(default)]
    pub adaptive_formats: Vec<Format>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Format {
    pub itag: u64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(rename = "qualityLabel")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
}

impl From<&Format> for FormatInfo {
    fn from(format: &Format) -> Self {
        FormatInfo {
            itag: format.itag,
            mime_type: format.mime_type.clone(),
            quality_label: format.quality_label.clone(),
            width: format.width,
            height: format.height,
            fps: format.fps,
            bitrate: format.bitrate,
        }
    }
}
