use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{CobaltError, Result};

/// Initialize HTTP client from the shared configuration
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Headers of every JSON request
pub(crate) fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn map_send_error(url: &str, e: reqwest::Error) -> CobaltError {
    if e.is_timeout() {
        CobaltError::RequestTimeout(url.to_string())
    } else {
        CobaltError::NetworkError(e)
    }
}

/// Download text content from URL, failing on non-success status
#[cfg(feature = "youtube")]
pub(crate) async fn download_text(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
) -> Result<String> {
    debug!(url, "GET");
    let response = client
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| map_send_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CobaltError::HttpError {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    response.text().await.map_err(CobaltError::from)
}

/// POST a JSON body and hand back status and raw body, whatever the status
pub(crate) async fn post_json_raw<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    headers: HeaderMap,
) -> Result<(StatusCode, String)> {
    debug!(url, "POST");
    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| map_send_error(url, e))?;

    let status = response.status();
    let text = response.text().await.map_err(CobaltError::from)?;
    debug!(url, status = status.as_u16(), "response received");
    Ok((status, text))
}
