//! Client for cobalt's `POST /api/json` endpoint.
//!
//! Every outcome of a request, including transport failures, is folded into
//! [`CobaltResponse`], so callers branch on the result instead of handling
//! errors.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::DownloadConfig;
use crate::config::ClientConfig;
use crate::download::{build_http_client, json_headers, post_json_raw};
use crate::error::{CobaltError, Result};

const API_PATH: &str = "api/json";
const FALLBACK_MESSAGE: &str = "An error occurred";

/// Outcome of a cobalt request
#[derive(Debug, Clone, PartialEq)]
pub enum CobaltResponse {
    /// HTTP 200 with a body whose `status` is not `error`
    Success { data: Value },
    Failure { message: String },
}

impl CobaltResponse {
    fn failure(message: impl Into<String>) -> Self {
        CobaltResponse::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CobaltResponse::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            CobaltResponse::Success { data } => Some(data),
            CobaltResponse::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            CobaltResponse::Success { .. } => None,
            CobaltResponse::Failure { message } => Some(message),
        }
    }

    /// Status reported by cobalt in the body (`stream`, `redirect`, `picker`, ...)
    pub fn status(&self) -> Option<&str> {
        self.data()?.get("status")?.as_str()
    }

    /// Direct link of a `stream` or `redirect` reply
    pub fn download_url(&self) -> Option<&str> {
        self.data()?.get("url")?.as_str()
    }

    /// Items of a `picker` reply, empty for any other reply
    pub fn picker(&self) -> Vec<PickerItem> {
        self.data()
            .and_then(|d| d.get("picker"))
            .and_then(|p| serde_json::from_value(p.clone()).ok())
            .unwrap_or_default()
    }
}

/// One choice of a multi-item reply, e.g. the images of a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickerItem {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// Interpret a raw cobalt reply
fn interpret(status: StatusCode, body: &str) -> CobaltResponse {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let text = parsed
        .as_ref()
        .and_then(|v| v.get("text"))
        .and_then(|t| t.as_str())
        .map(str::to_string);

    if status == StatusCode::OK {
        match parsed {
            Some(data) if data.get("status").and_then(|s| s.as_str()) != Some("error") => {
                CobaltResponse::Success { data }
            }
            Some(_) => CobaltResponse::failure(text.unwrap_or_else(|| FALLBACK_MESSAGE.to_string())),
            None => CobaltResponse::failure(format!("Invalid response body: {}", body.trim())),
        }
    } else {
        let message = text.unwrap_or_else(|| {
            format!("Request failed with status code {}", status.as_u16())
        });
        CobaltResponse::failure(message)
    }
}

/// Sends download requests to a cobalt instance
#[derive(Debug, Clone)]
pub struct CobaltClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl CobaltClient {
    /// Client for the public cobalt API
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Client for another instance, e.g. a self-hosted one
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send the configured request; never fails, see [`CobaltResponse`]
    pub async fn send(&self, config: &DownloadConfig) -> CobaltResponse {
        let mut headers = json_headers();
        if let Some(language) = config.accept_language() {
            match HeaderValue::from_str(language) {
                Ok(value) => {
                    headers.insert(ACCEPT_LANGUAGE, value);
                }
                Err(e) => return CobaltResponse::failure(CobaltError::from(e).to_string()),
            }
        }

        let endpoint = self.config.endpoint(API_PATH);
        debug!(
            url = config.url(),
            quality = %config.video_quality(),
            codec = %config.video_codec(),
            "sending cobalt request"
        );

        let response = match post_json_raw(&self.client, &endpoint, &config.payload(), headers).await
        {
            Ok((status, body)) => interpret(status, &body),
            Err(e) => CobaltResponse::failure(e.to_string()),
        };

        if let CobaltResponse::Failure { message } = &response {
            warn!(url = config.url(), %message, "cobalt request failed");
        }
        response
    }
}

impl DownloadConfig {
    /// Send this configuration to the public cobalt API
    pub async fn send_request(&self) -> CobaltResponse {
        match CobaltClient::new() {
            Ok(client) => client.send(self).await,
            Err(e) => CobaltResponse::failure(e.to_string()),
        }
    }
}
