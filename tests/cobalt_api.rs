//! Integration tests for requests sent to a cobalt instance.

use cobalt_api::{
    AudioFormat, CobaltClient, CobaltResponse, DownloadConfig, VideoCodec, VideoQuality,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=OAr6AIvH9VY";

fn config() -> DownloadConfig {
    DownloadConfig::new(VIDEO_URL).unwrap()
}

#[tokio::test]
async fn test_success_returns_body() {
    let server = MockServer::start().await;
    let body = json!({"status": "redirect", "url": "https://cdn.example/video.mp4"});

    Mock::given(method("POST"))
        .and(path("/api/json"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "url": VIDEO_URL,
            "vQuality": "1080",
            "filenamePattern": "classic",
            "isAudioOnly": false,
            "isTTFullAudio": false,
            "isAudioMuted": true,
            "dubLang": false,
            "disableMetadata": false,
            "twitterGif": false,
            "tiktokH265": false,
            "vCodec": "av1",
            "aFormat": "opus",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = CobaltClient::with_base_url(server.uri()).unwrap();
    let config = config()
        .with_quality(VideoQuality::P1080)
        .with_video_codec(VideoCodec::Av1)
        .with_audio_format(AudioFormat::Opus)
        .mute_audio();

    let response = client.send(&config).await;
    assert_eq!(response, CobaltResponse::Success { data: body });
    assert_eq!(response.download_url(), Some("https://cdn.example/video.mp4"));
}

#[tokio::test]
async fn test_error_status_in_200_body_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "text": "this service is not supported yet"
        })))
        .mount(&server)
        .await;

    let client = CobaltClient::with_base_url(server.uri()).unwrap();
    let response = client.send(&config()).await;
    assert_eq!(
        response,
        CobaltResponse::Failure {
            message: "this service is not supported yet".to_string()
        }
    );
}

#[tokio::test]
async fn test_non_200_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "text": "couldn't get this video"
        })))
        .mount(&server)
        .await;

    let client = CobaltClient::with_base_url(server.uri()).unwrap();
    let response = client.send(&config()).await;
    assert_eq!(response.message(), Some("couldn't get this video"));
}

#[tokio::test]
async fn test_non_200_without_text_uses_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = CobaltClient::with_base_url(server.uri()).unwrap();
    let response = client.send(&config()).await;
    assert_eq!(
        response.message(),
        Some("Request failed with status code 503")
    );
}

#[tokio::test]
async fn test_network_failure_is_failure() {
    // Reserve a port, then close it so the connection is refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CobaltClient::with_base_url(format!("http://{addr}")).unwrap();
    let response = client.send(&config()).await;
    match response {
        CobaltResponse::Failure { message } => {
            assert!(message.starts_with("Network request failed"), "{message}")
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_accept_language_header_sent_when_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json"))
        .and(header("accept-language", "de-DE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "stream", "url": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = CobaltClient::with_base_url(server.uri()).unwrap();
    let response = client
        .send(&config().dub_lang().with_accept_language("de-DE"))
        .await;
    assert!(response.is_success());
}

#[tokio::test]
async fn test_accept_language_header_omitted_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "stream", "url": "x"})))
        .mount(&server)
        .await;

    let client = CobaltClient::with_base_url(server.uri()).unwrap();
    assert!(client.send(&config()).await.is_success());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("accept-language"));
}

#[tokio::test]
async fn test_invalid_accept_language_is_failure() {
    let server = MockServer::start().await;
    let client = CobaltClient::with_base_url(server.uri()).unwrap();

    let response = client
        .send(&config().with_accept_language("en\nX-Injected: 1"))
        .await;
    assert!(!response.is_success());
    assert!(server.received_requests().await.unwrap().is_empty());
}
