use url::Url;

use crate::error::{CobaltError, Result};

/// Path prefixes that carry the video id as the next segment
const ID_PATHS: &[&str] = &["shorts", "embed", "v", "live"];

/// Validate if a string is a valid YouTube video ID (11 characters, alphanumeric + - and _)
pub fn is_valid_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_youtube_domain(domain: &str) -> bool {
    domain == "youtube.com"
        || domain.ends_with(".youtube.com")
        || domain == "youtu.be"
        || domain.ends_with(".youtu.be")
        || domain == "youtube-nocookie.com"
        || domain.ends_with(".youtube-nocookie.com")
}

/// Parse a URL, assuming https when the scheme is missing
fn parse_url(url: &str) -> Option<Url> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Url::parse(url).ok()
    } else {
        Url::parse(&format!("https://{}", url)).ok()
    }
}

/// Parse video ID from a YouTube URL
pub fn parse_id(url: &str) -> Result<String> {
    let parsed = parse_url(url)
        .filter(|u| u.domain().is_some_and(is_youtube_domain))
        .ok_or_else(|| CobaltError::InvalidUrl(format!("Not a valid YouTube URL: {}", url)))?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|i| !i.is_empty()).collect())
        .unwrap_or_default();

    let candidate = if parsed.domain().is_some_and(|d| d.ends_with("youtu.be")) {
        // youtu.be/VIDEO_ID
        segments.first().map(|s| s.to_string())
    } else if let Some((_, v)) = parsed.query_pairs().find(|(k, _)| k == "v") {
        // youtube.com/watch?v=VIDEO_ID
        Some(v.into_owned())
    } else {
        // youtube.com/shorts/VIDEO_ID and friends
        segments
            .windows(2)
            .find(|w| ID_PATHS.iter().any(|p| *p == w[0]))
            .map(|w| w[1].to_string())
    };

    match candidate {
        Some(id) if is_valid_video_id(&id) => Ok(id),
        _ => Err(CobaltError::InvalidUrl(format!(
            "Cannot extract video ID from: {}",
            url
        ))),
    }
}

/// YouTube URL whose video ID can be extracted
pub fn is_valid_video_url(url: &str) -> bool {
    parse_id(url).is_ok()
}

/// Construct YouTube watch path from video ID
pub fn build_watch_path(video_id: &str) -> String {
    format!("watch?v={}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_variants() {
        let id = "OAr6AIvH9VY";
        for url in [
            "https://www.youtube.com/watch?v=OAr6AIvH9VY",
            "https://www.youtube.com/watch?feature=share&v=OAr6AIvH9VY&t=42",
            "www.youtube.com/watch?v=OAr6AIvH9VY",
            "https://m.youtube.com/watch?v=OAr6AIvH9VY",
            "https://music.youtube.com/watch?v=OAr6AIvH9VY",
            "https://youtu.be/OAr6AIvH9VY",
            "https://youtu.be/OAr6AIvH9VY?si=abc",
            "https://www.youtube.com/shorts/OAr6AIvH9VY",
            "https://www.youtube.com/embed/OAr6AIvH9VY",
            "https://www.youtube-nocookie.com/embed/OAr6AIvH9VY",
            "https://www.youtube.com/live/OAr6AIvH9VY",
            "https://www.youtube.com/v/OAr6AIvH9VY",
        ] {
            assert_eq!(parse_id(url).unwrap(), id, "{url}");
        }
    }

    #[test]
    fn test_rejects_non_youtube() {
        for url in [
            "https://vimeo.com/123456",
            "https://notyoutube.com/watch?v=OAr6AIvH9VY",
            "https://youtube.com.evil.org/watch?v=OAr6AIvH9VY",
        ] {
            let err = parse_id(url).unwrap_err().to_string();
            assert!(err.contains("Not a valid YouTube URL"), "{err}");
            assert!(!is_valid_video_url(url));
        }
        // Bare ids are not URLs
        assert!(!is_valid_video_url("OAr6AIvH9VY"));
    }

    #[test]
    fn test_rejects_missing_or_bad_id() {
        let err = parse_id("https://www.youtube.com/feed/trending")
            .unwrap_err()
            .to_string();
        assert!(err.contains("Cannot extract video ID"), "{err}");
        assert!(!is_valid_video_url("https://www.youtube.com/watch?v=short"));
        assert!(!is_valid_video_url("https://www.youtube.com/watch?v=OAr6AIvH9VY!"));
        assert!(matches!(
            parse_id("https://youtu.be/"),
            Err(CobaltError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_build_watch_path() {
        assert_eq!(build_watch_path("OAr6AIvH9VY"), "watch?v=OAr6AIvH9VY");
    }
}
