use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

pub mod youtube;

/// Audio fetched for one video, plus the metadata that came with it.
#[derive(Debug, Clone)]
pub struct AcquiredAudio {
    /// Video title as reported by the platform
    pub title: String,

    /// Duration in seconds if the platform reported one
    pub duration_seconds: Option<f64>,

    /// Downloaded audio file, owned by the caller's scratch directory
    pub audio_path: PathBuf,
}

/// Errors from audio acquisition.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("could not fetch video: {0}")]
    Unreachable(String),

    #[error("video is unavailable or restricted: {0}")]
    Restricted(String),

    #[error("yt-dlp is not installed or not on PATH ({0}); see https://github.com/yt-dlp/yt-dlp")]
    MissingTool(String),

    #[error("download I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for fetching a video's audio track.
#[async_trait]
pub trait MediaAcquirer: Send + Sync {
    /// Fetch the audio track and metadata for one video URL.
    ///
    /// The audio file is written under `workdir`; the caller owns that
    /// directory and its cleanup.
    async fn acquire(&self, url: &str, workdir: &Path) -> Result<AcquiredAudio, DownloadError>;
}

/// Extract the video id from a YouTube URL, or `None` if the string is not a
/// recognizable YouTube video link.
///
/// Accepts `watch?v=` query URLs on youtube.com (including the `www.`, `m.`
/// and `music.` hosts), `/embed/`, `/shorts/` and `/v/` paths, and youtu.be
/// short links.
pub fn extract_video_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    match host {
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "v") {
                return valid_id(&id);
            }
            let mut segments = parsed.path_segments()?;
            match segments.next() {
                Some("embed") | Some("shorts") | Some("v") => valid_id(segments.next()?),
                _ => None,
            }
        }
        "youtu.be" => valid_id(parsed.path_segments()?.next()?),
        _ => None,
    }
}

/// Video ids are URL-safe base64: alphanumerics, `-` and `_`.
fn valid_id(candidate: &str) -> Option<String> {
    let ok = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    ok.then(|| candidate.to_string())
}
