use std::str::FromStr;

use serde::{Deserialize, Serialize};
pub use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, IntoStaticStr};

use crate::error::{CobaltError, Result};

/// Find the allow-list entry whose wire string equals `value`.
fn parse_option<T>(option: &'static str, value: &str) -> Result<T>
where
    T: IntoEnumIterator + AsRef<str> + Into<&'static str>,
{
    T::iter()
        .find(|i| i.as_ref() == value)
        .ok_or_else(|| CobaltError::InvalidOption {
            option,
            value: value.to_string(),
            allowed: allowed_values::<T>().join(", "),
        })
}

/// Wire strings of every value an option accepts, in declaration order
pub fn allowed_values<T>() -> Vec<&'static str>
where
    T: IntoEnumIterator + Into<&'static str>,
{
    T::iter().map(|i| -> &'static str { i.into() }).collect()
}

/// Video codec requested from cobalt
#[derive(
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    Display,
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    #[default]
    H264,
    Av1,
    Vp9,
}

/// Video quality, either `max` or a vertical resolution
#[derive(
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    Display,
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
pub enum VideoQuality {
    #[strum(serialize = "max")]
    #[serde(rename = "max")]
    Max,
    #[strum(serialize = "2160")]
    #[serde(rename = "2160")]
    P2160,
    #[strum(serialize = "1440")]
    #[serde(rename = "1440")]
    P1440,
    #[strum(serialize = "1080")]
    #[serde(rename = "1080")]
    P1080,
    #[default]
    #[strum(serialize = "720")]
    #[serde(rename = "720")]
    P720,
    #[strum(serialize = "480")]
    #[serde(rename = "480")]
    P480,
    #[strum(serialize = "360")]
    #[serde(rename = "360")]
    P360,
    #[strum(serialize = "240")]
    #[serde(rename = "240")]
    P240,
    #[strum(serialize = "144")]
    #[serde(rename = "144")]
    P144,
}

/// Audio format used for audio-only downloads
#[derive(
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    Display,
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Best,
    #[default]
    Mp3,
    Ogg,
    Wav,
    Opus,
}

/// Naming scheme cobalt applies to the produced file
///
/// - classic: standard naming
/// - basic: simplistic naming
/// - pretty: more descriptive naming
/// - nerdy: detailed naming including extra metadata
#[derive(
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    Display,
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FilenamePattern {
    #[default]
    Classic,
    Basic,
    Pretty,
    Nerdy,
}

impl FromStr for VideoCodec {
    type Err = CobaltError;

    fn from_str(s: &str) -> Result<Self> {
        parse_option("video codec", s)
    }
}

impl FromStr for VideoQuality {
    type Err = CobaltError;

    fn from_str(s: &str) -> Result<Self> {
        parse_option("video quality", s)
    }
}

impl FromStr for AudioFormat {
    type Err = CobaltError;

    fn from_str(s: &str) -> Result<Self> {
        parse_option("audio format", s)
    }
}

impl FromStr for FilenamePattern {
    type Err = CobaltError;

    fn from_str(s: &str) -> Result<Self> {
        parse_option("filename pattern", s)
    }
}

/// Download configuration for a single target URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    url: String,
    video_codec: VideoCodec,
    video_quality: VideoQuality,
    audio_format: AudioFormat,
    filename_pattern: FilenamePattern,
    audio_only: bool,
    tiktok_full_audio: bool,
    audio_muted: bool,
    dub_lang: bool,
    disable_metadata: bool,
    twitter_gif: bool,
    tiktok_h265: bool,
    accept_language: Option<String>,
}

impl DownloadConfig {
    /// Create a configuration with default options.
    ///
    /// The URL is stored as given; it is only checked when qualities are
    /// looked up.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(CobaltError::InvalidUrl("URL must not be empty".to_string()));
        }
        Ok(Self {
            url,
            video_codec: VideoCodec::default(),
            video_quality: VideoQuality::default(),
            audio_format: AudioFormat::default(),
            filename_pattern: FilenamePattern::default(),
            audio_only: false,
            tiktok_full_audio: false,
            audio_muted: false,
            dub_lang: false,
            disable_metadata: false,
            twitter_gif: false,
            tiktok_h265: false,
            accept_language: None,
        })
    }

    /// Set video quality
    pub fn with_quality(mut self, quality: VideoQuality) -> Self {
        self.video_quality = quality;
        self
    }

    /// Set video codec
    pub fn with_video_codec(mut self, codec: VideoCodec) -> Self {
        self.video_codec = codec;
        self
    }

    /// Set audio format
    pub fn with_audio_format(mut self, format: AudioFormat) -> Self {
        self.audio_format = format;
        self
    }

    /// Set filename pattern
    pub fn with_filename_pattern(mut self, pattern: FilenamePattern) -> Self {
        self.filename_pattern = pattern;
        self
    }

    /// Send `Accept-Language` with this value on the cobalt request
    pub fn with_accept_language(mut self, language: impl Into<String>) -> Self {
        self.accept_language = Some(language.into());
        self
    }

    /// Download only the audio track
    pub fn audio_only(mut self) -> Self {
        self.audio_only = true;
        self
    }

    /// Download the original sound of a TikTok video
    pub fn tiktok_full_audio(mut self) -> Self {
        self.tiktok_full_audio = true;
        self
    }

    /// Strip the audio track from video downloads
    pub fn mute_audio(mut self) -> Self {
        self.audio_muted = true;
        self
    }

    /// Pick the YouTube dub track matching `Accept-Language`
    pub fn dub_lang(mut self) -> Self {
        self.dub_lang = true;
        self
    }

    /// Ask cobalt not to write file metadata
    pub fn disable_metadata(mut self) -> Self {
        self.disable_metadata = true;
        self
    }

    /// Convert Twitter gifs to .gif
    pub fn twitter_gif(mut self) -> Self {
        self.twitter_gif = true;
        self
    }

    /// Prefer 1080p h265 videos on TikTok
    pub fn tiktok_h265(mut self) -> Self {
        self.tiktok_h265 = true;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn video_codec(&self) -> VideoCodec {
        self.video_codec
    }

    pub fn video_quality(&self) -> VideoQuality {
        self.video_quality
    }

    pub fn audio_format(&self) -> AudioFormat {
        self.audio_format
    }

    pub fn filename_pattern(&self) -> FilenamePattern {
        self.filename_pattern
    }

    pub fn is_audio_only(&self) -> bool {
        self.audio_only
    }

    pub fn is_tiktok_full_audio(&self) -> bool {
        self.tiktok_full_audio
    }

    pub fn is_audio_muted(&self) -> bool {
        self.audio_muted
    }

    pub fn is_dub_lang(&self) -> bool {
        self.dub_lang
    }

    pub fn is_metadata_disabled(&self) -> bool {
        self.disable_metadata
    }

    pub fn is_twitter_gif(&self) -> bool {
        self.twitter_gif
    }

    pub fn is_tiktok_h265(&self) -> bool {
        self.tiktok_h265
    }

    pub fn accept_language(&self) -> Option<&str> {
        self.accept_language.as_deref()
    }

    /// Request body for `POST /api/json`
    pub fn payload(&self) -> RequestPayload<'_> {
        RequestPayload {
            url: &self.url,
            v_quality: self.video_quality,
            filename_pattern: self.filename_pattern,
            is_audio_only: self.audio_only,
            is_tt_full_audio: self.tiktok_full_audio,
            is_audio_muted: self.audio_muted,
            dub_lang: self.dub_lang,
            disable_metadata: self.disable_metadata,
            twitter_gif: self.twitter_gif,
            tiktok_h265: self.tiktok_h265,
            v_codec: self.video_codec,
            a_format: self.audio_format,
        }
    }
}

/// JSON body understood by cobalt's `/api/json` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RequestPayload<'a> {
    pub url: &'a str,
    #[serde(rename = "vQuality")]
    pub v_quality: VideoQuality,
    #[serde(rename = "filenamePattern")]
    pub filename_pattern: FilenamePattern,
    #[serde(rename = "isAudioOnly")]
    pub is_audio_only: bool,
    #[serde(rename = "isTTFullAudio")]
    pub is_tt_full_audio: bool,
    #[serde(rename = "isAudioMuted")]
    pub is_audio_muted: bool,
    #[serde(rename = "dubLang")]
    pub dub_lang: bool,
    #[serde(rename = "disableMetadata")]
    pub disable_metadata: bool,
    #[serde(rename = "twitterGif")]
    pub twitter_gif: bool,
    #[serde(rename = "tiktokH265")]
    pub tiktok_h265: bool,
    #[serde(rename = "vCodec")]
    pub v_codec: VideoCodec,
    #[serde(rename = "aFormat")]
    pub a_format: AudioFormat,
}

/// A single stream format reported by a video source
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormatInfo {
    pub itag: u64,
    pub mime_type: String,
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

impl FormatInfo {
    /// Whether the format carries a video track
    pub fn has_video(&self) -> bool {
        self.mime_type.starts_with("video/") || self.quality_label.is_some()
    }
}

/// Metadata service that knows which formats a video offers
#[async_trait::async_trait]
pub trait VideoSource: Send + Sync {
    /// Check if the URL points at a video this source can describe
    fn is_valid_source(&self, url: &str) -> bool;

    /// List every format the video is available in
    async fn list_formats(&self, url: &str) -> Result<Vec<FormatInfo>>;
}
