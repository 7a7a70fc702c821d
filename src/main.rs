use anyhow::{Context, bail};
use clap::Parser;
use cobalt_api::{
    AudioFormat, ClientConfig, CobaltClient, CobaltResponse, DownloadConfig, FilenamePattern,
    VideoCodec, VideoQuality, YoutubeSource, pick_best_quality,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cobalt",
    version,
    about = "Request download links from the cobalt API",
    long_about = "Send a video URL to cobalt and print the download link it returns.\n\n\
    Examples:\n\
      cobalt https://www.youtube.com/watch?v=OAr6AIvH9VY          # Default options (720p, h264)\n\
      cobalt -Q https://www.youtube.com/watch?v=OAr6AIvH9VY       # List available qualities\n\
      cobalt --best https://www.youtube.com/watch?v=OAr6AIvH9VY   # Pick 2160, 1080 or the first available\n\
      cobalt -q 1080 -c av1 https://youtu.be/OAr6AIvH9VY          # 1080p AV1\n\
      cobalt --audio-only -a opus https://youtu.be/OAr6AIvH9VY    # Audio only as opus"
)]
struct Args {
    /// URL of the video
    #[arg(help = "URL of the video (YouTube, TikTok, Twitter, ...)")]
    url: String,

    /// Video quality (max, 2160, 1440, 1080, 720, 480, 360, 240, 144)
    #[arg(short = 'q', long = "quality")]
    quality: Option<VideoQuality>,

    /// Video codec (h264, av1, vp9)
    #[arg(short = 'c', long = "codec")]
    codec: Option<VideoCodec>,

    /// Audio format (best, mp3, ogg, wav, opus)
    #[arg(short = 'a', long = "audio-format")]
    audio_format: Option<AudioFormat>,

    /// Filename pattern (classic, basic, pretty, nerdy)
    #[arg(short = 'p', long = "filename-pattern")]
    filename_pattern: Option<FilenamePattern>,

    /// Download only the audio track
    #[arg(long = "audio-only")]
    audio_only: bool,

    /// Download the original sound of a TikTok video
    #[arg(long = "tiktok-full-audio")]
    tiktok_full_audio: bool,

    /// Remove the audio track
    #[arg(long = "mute")]
    mute: bool,

    /// Use the dub track matching --accept-language
    #[arg(long = "dub-lang")]
    dub_lang: bool,

    /// Do not write file metadata
    #[arg(long = "disable-metadata")]
    disable_metadata: bool,

    /// Convert Twitter gifs to .gif
    #[arg(long = "twitter-gif")]
    twitter_gif: bool,

    /// Prefer 1080p h265 videos on TikTok
    #[arg(long = "tiktok-h265")]
    tiktok_h265: bool,

    /// Accept-Language header sent to cobalt
    #[arg(long = "accept-language")]
    accept_language: Option<String>,

    /// cobalt instance to use
    #[arg(long = "api-url", default_value = cobalt_api::config::DEFAULT_API_URL)]
    api_url: String,

    /// List the qualities the video is available in, then exit
    #[arg(short = 'Q', long = "list-qualities")]
    list_qualities: bool,

    /// Pick the best available quality (2160, then 1080, then the first listed)
    #[arg(long = "best", conflicts_with = "quality")]
    best: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args) -> anyhow::Result<DownloadConfig> {
    let mut config = DownloadConfig::new(args.url.as_str())?;

    if let Some(quality) = args.quality {
        config = config.with_quality(quality);
    }
    if let Some(codec) = args.codec {
        config = config.with_video_codec(codec);
    }
    if let Some(format) = args.audio_format {
        config = config.with_audio_format(format);
    }
    if let Some(pattern) = args.filename_pattern {
        config = config.with_filename_pattern(pattern);
    }
    if let Some(language) = &args.accept_language {
        config = config.with_accept_language(language.as_str());
    }

    let flags: [(bool, fn(DownloadConfig) -> DownloadConfig); 7] = [
        (args.audio_only, DownloadConfig::audio_only),
        (args.tiktok_full_audio, DownloadConfig::tiktok_full_audio),
        (args.mute, DownloadConfig::mute_audio),
        (args.dub_lang, DownloadConfig::dub_lang),
        (args.disable_metadata, DownloadConfig::disable_metadata),
        (args.twitter_gif, DownloadConfig::twitter_gif),
        (args.tiktok_h265, DownloadConfig::tiktok_h265),
    ];
    for (enabled, enable) in flags {
        if enabled {
            config = enable(config);
        }
    }

    Ok(config)
}

fn display_response(response: &CobaltResponse) {
    match response {
        CobaltResponse::Success { data } => {
            if let Some(url) = response.download_url() {
                println!("Download link: {}", url);
                return;
            }

            let items = response.picker();
            if items.is_empty() {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
                return;
            }

            println!("Found {} item(s):", items.len());
            for (index, item) in items.iter().enumerate() {
                println!("[{}] {}", index + 1, item.url);
                if let Some(thumb) = &item.thumb {
                    println!("    Thumbnail: {}", thumb);
                }
            }
        }
        CobaltResponse::Failure { message } => {
            eprintln!("Error: {}", message);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let mut config = build_config(&args)?;

    if args.list_qualities || args.best {
        let source = YoutubeSource::new()?;
        let qualities = config
            .available_qualities_with(&source)
            .await
            .context("Could not look up video qualities")?;

        if args.list_qualities {
            println!("Available video qualities: {}", qualities.join(", "));
            return Ok(true);
        }

        let Some(quality) = pick_best_quality(&qualities) else {
            bail!("No supported quality among: {}", qualities.join(", "));
        };
        debug!(%quality, "picked best quality");
        config = config.with_quality(quality);
    }

    let client = CobaltClient::with_config(ClientConfig::new(args.api_url.as_str()))?;
    println!("Requesting {} ({}, {})", config.url(), config.video_quality(), config.video_codec());
    let response = client.send(&config).await;
    display_response(&response);
    Ok(response.is_success())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://youtu.be/OAr6AIvH9VY";

    fn config(extra: &[&str]) -> DownloadConfig {
        let argv = ["cobalt"].iter().chain(extra).chain(&[URL]).copied();
        let args = Args::try_parse_from(argv).unwrap();
        build_config(&args).unwrap()
    }

    #[test]
    fn test_defaults_without_options() {
        assert_eq!(config(&[]), DownloadConfig::new(URL).unwrap());
    }

    #[test]
    fn test_value_options() {
        let cfg = config(&[
            "-q",
            "1080",
            "-c",
            "av1",
            "-a",
            "opus",
            "-p",
            "nerdy",
            "--accept-language",
            "de-DE",
        ]);
        assert_eq!(cfg.video_quality(), VideoQuality::P1080);
        assert_eq!(cfg.video_codec(), VideoCodec::Av1);
        assert_eq!(cfg.audio_format(), AudioFormat::Opus);
        assert_eq!(cfg.filename_pattern(), FilenamePattern::Nerdy);
        assert_eq!(cfg.accept_language(), Some("de-DE"));
    }

    #[test]
    fn test_each_flag_sets_its_own_option() {
        let cases: [(&str, fn(&DownloadConfig) -> bool); 7] = [
            ("--audio-only", DownloadConfig::is_audio_only),
            ("--tiktok-full-audio", DownloadConfig::is_tiktok_full_audio),
            ("--mute", DownloadConfig::is_audio_muted),
            ("--dub-lang", DownloadConfig::is_dub_lang),
            ("--disable-metadata", DownloadConfig::is_metadata_disabled),
            ("--twitter-gif", DownloadConfig::is_twitter_gif),
            ("--tiktok-h265", DownloadConfig::is_tiktok_h265),
        ];
        for (flag, _) in &cases {
            let cfg = config(&[*flag]);
            for (other, is_set) in &cases {
                assert_eq!(is_set(&cfg), flag == other, "{flag} vs {other}");
            }
        }
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!(Args::try_parse_from(["cobalt", "-q", "4320", URL]).is_err());
        assert!(Args::try_parse_from(["cobalt", "-c", "h265", URL]).is_err());
        assert!(Args::try_parse_from(["cobalt", "--best", "-q", "720", URL]).is_err());
    }
}
