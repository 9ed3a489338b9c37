use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod whisper;

/// Whisper model sizes, smallest to largest. Larger models are slower but
/// more accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }

    /// Short tradeoff note shown by the `models` subcommand.
    pub fn description(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "fastest, lowest accuracy (~1 GB RAM)",
            ModelSize::Base => "good default for clear speech (~1 GB RAM)",
            ModelSize::Small => "better accuracy, noticeably slower (~2 GB RAM)",
            ModelSize::Medium => "high accuracy, slow (~5 GB RAM)",
            ModelSize::Large => "best accuracy, slowest (~10 GB RAM)",
        }
    }
}

impl Default for ModelSize {
    fn default() -> Self {
        ModelSize::Base
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from the speech-to-text engine.
///
/// An incompatible installation is kept separate from per-file failures: the
/// former is fixed by reinstalling the engine, the latter by skipping the
/// video.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("whisper is not installed or not on PATH ({0}); install it with `pip install openai-whisper`")]
    MissingEngine(String),

    #[error("incompatible whisper installation: {0}; run `pip uninstall whisper && pip install openai-whisper`")]
    IncompatibleEngine(String),

    #[error("transcription failed: {0}")]
    Failed(String),

    #[error("transcript file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for speech-to-text engines.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into plain text, parameterized by model size.
    async fn transcribe(
        &self,
        audio_path: &Path,
        model: ModelSize,
    ) -> Result<String, TranscriptionError>;
}
