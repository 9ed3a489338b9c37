use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::{ModelSize, Transcriber, TranscriptionError};

/// Transcriber backed by the openai-whisper command line tool.
pub struct WhisperCliTranscriber {
    whisper_path: String,
}

impl WhisperCliTranscriber {
    pub fn new() -> Self {
        Self {
            whisper_path: "whisper".to_string(),
        }
    }

    /// Map a failed whisper run to an error variant based on its stderr.
    ///
    /// The non-openai `whisper` package on PyPI installs a CLI that rejects
    /// our arguments, and a broken install dies on import; both are setup
    /// problems rather than problems with the video.
    fn classify_failure(stderr: &str) -> TranscriptionError {
        let detail = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("whisper exited with an error")
            .trim()
            .to_string();

        let lower = detail.to_lowercase();
        let incompatible = lower.contains("unrecognized arguments")
            || lower.contains("no module named")
            || lower.contains("attributeerror");

        if incompatible {
            TranscriptionError::IncompatibleEngine(detail)
        } else {
            TranscriptionError::Failed(detail)
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        model: ModelSize,
    ) -> Result<String, TranscriptionError> {
        let out_dir = audio_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        tracing::debug!("Transcribing {} with the {} model", audio_path.display(), model);

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        progress.set_message(format!("Transcribing with whisper ({} model)...", model));

        let output = Command::new(&self.whisper_path)
            .arg(audio_path)
            .args(["--model", model.as_str(), "--output_format", "txt"])
            .arg("--output_dir")
            .arg(&out_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    TranscriptionError::MissingEngine(self.whisper_path.clone())
                }
                _ => TranscriptionError::Io(e),
            })?;

        if !output.status.success() {
            progress.finish_and_clear();
            return Err(Self::classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        progress.finish_with_message("Transcription complete");

        // whisper writes `<audio stem>.txt` into the output directory
        let stem = audio_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        let transcript_path = out_dir.join(format!("{stem}.txt"));

        let text = fs_err::read_to_string(&transcript_path)?;
        let text = text.trim().to_string();

        if text.is_empty() {
            return Err(TranscriptionError::Failed(format!(
                "whisper produced an empty transcript for {}",
                audio_path.display()
            )));
        }

        Ok(text)
    }
}

impl Default for WhisperCliTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_whisper_package_is_flagged_as_incompatible() {
        let err = WhisperCliTranscriber::classify_failure(
            "usage: whisper [-h]\nwhisper: error: unrecognized arguments: --output_format txt",
        );
        assert!(matches!(err, TranscriptionError::IncompatibleEngine(_)));
    }

    #[test]
    fn broken_install_is_flagged_as_incompatible() {
        let err = WhisperCliTranscriber::classify_failure(
            "Traceback (most recent call last):\nModuleNotFoundError: No module named 'torch'",
        );
        assert!(matches!(err, TranscriptionError::IncompatibleEngine(_)));
    }

    #[test]
    fn engine_errors_fall_back_to_generic_failure() {
        let err = WhisperCliTranscriber::classify_failure(
            "RuntimeError: Failed to load audio: corrupt frame header",
        );
        assert!(matches!(err, TranscriptionError::Failed(_)));
    }
}
