use thiserror::Error;

#[derive(Error, Debug)]
pub enum CobaltError {
    #[error("Invalid {option}: '{value}' (expected one of: {allowed})")]
    InvalidOption {
        option: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Invalid video source: {0}")]
    InvalidSource(String),

    #[error("Failed to fetch video qualities")]
    MetadataFetchFailed {
        #[source]
        source: Box<CobaltError>,
    },

    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timeout for URL: {0}")]
    RequestTimeout(String),

    #[error("HTTP error {status} for URL: {url}")]
    HttpError { status: u16, url: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Video not found or unavailable: {0}")]
    VideoUnavailable(String),

    #[error("Invalid header value: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),
}

impl CobaltError {
    pub(crate) fn metadata(source: CobaltError) -> Self {
        CobaltError::MetadataFetchFailed {
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, CobaltError>;
