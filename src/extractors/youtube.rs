use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use uuid::Uuid;

use super::{AcquiredAudio, DownloadError, MediaAcquirer};
use crate::config::Config;

/// YouTube audio acquirer backed by yt-dlp.
pub struct YtDlpAcquirer {
    yt_dlp_path: String,
    audio_format: String,
    audio_quality: String,
}

impl YtDlpAcquirer {
    pub fn new() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            audio_format: config.audio_format.clone(),
            audio_quality: config.audio_quality.clone(),
        }
    }

    /// Fetch video metadata without downloading anything.
    async fn probe(&self, url: &str) -> Result<Value, DownloadError> {
        tracing::debug!("Fetching video info for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--no-playlist", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| DownloadError::Unreachable(format!("unparseable yt-dlp metadata: {e}")))
    }

    /// Download and extract the audio track to `template` (a yt-dlp output
    /// template ending in `.%(ext)s`).
    async fn download(&self, url: &str, template: &Path) -> Result<(), DownloadError> {
        tracing::debug!("Downloading audio for: {}", url);

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        progress.set_message("Downloading audio with yt-dlp...");

        let output = Command::new(&self.yt_dlp_path)
            .arg("--output")
            .arg(template)
            .args([
                "--extract-audio",
                "--audio-format",
                self.audio_format.as_str(),
                "--audio-quality",
                self.audio_quality.as_str(),
                "--format",
                "bestaudio/best",
                "--no-playlist",
                "--no-warnings",
                url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            progress.finish_and_clear();
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        progress.finish_with_message("Download complete");
        Ok(())
    }

    fn map_spawn_error(&self, error: std::io::Error) -> DownloadError {
        if error.kind() == std::io::ErrorKind::NotFound {
            DownloadError::MissingTool(self.yt_dlp_path.clone())
        } else {
            DownloadError::Io(error)
        }
    }
}

/// Map a failed yt-dlp run to an error variant based on its stderr.
fn classify_failure(stderr: &str) -> DownloadError {
    let detail = stderr
        .lines()
        .rev()
        .find(|line| line.contains("ERROR"))
        .unwrap_or_else(|| stderr.trim_end().lines().last().unwrap_or(""))
        .trim()
        .to_string();

    let detail = if detail.is_empty() {
        "yt-dlp exited with an error".to_string()
    } else {
        detail
    };

    const RESTRICTED_MARKERS: &[&str] = &[
        "unavailable",
        "private",
        "age",
        "region",
        "blocked",
        "removed",
        "members-only",
    ];

    let lower = detail.to_lowercase();
    if RESTRICTED_MARKERS.iter().any(|marker| lower.contains(marker)) {
        DownloadError::Restricted(detail)
    } else {
        DownloadError::Unreachable(detail)
    }
}

#[async_trait]
impl MediaAcquirer for YtDlpAcquirer {
    async fn acquire(&self, url: &str, workdir: &Path) -> Result<AcquiredAudio, DownloadError> {
        let info = self.probe(url).await?;

        let title = info["title"].as_str().unwrap_or("untitled").to_string();
        let duration_seconds = info["duration"].as_f64();

        let stem = format!("audio_{}", &Uuid::new_v4().to_string()[..8]);
        let template = workdir.join(format!("{stem}.%(ext)s"));
        self.download(url, &template).await?;

        // The ffmpeg post-processor replaces %(ext)s with the requested format
        let audio_path = workdir.join(format!("{stem}.{}", self.audio_format));
        if !audio_path.exists() {
            return Err(DownloadError::Unreachable(format!(
                "yt-dlp reported success but produced no {} file",
                self.audio_format
            )));
        }

        Ok(AcquiredAudio {
            title,
            duration_seconds,
            audio_path,
        })
    }
}

impl Default for YtDlpAcquirer {
    fn default() -> Self {
        Self::new()
    }
}
