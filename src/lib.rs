//! YouTube Transcriptor - a Rust CLI tool for turning YouTube videos into text
//!
//! This library downloads a video's audio track with yt-dlp, runs it through
//! the openai-whisper speech-to-text CLI, and persists the transcripts as
//! per-video text files, a combined CSV table, or a combined JSON document.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod pipeline;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{AcquiredAudio, DownloadError, MediaAcquirer};
pub use output::WriteError;
pub use pipeline::{BatchRun, ProcessingResult, TranscriptionPipeline, VideoReference};
pub use transcribe::{ModelSize, Transcriber, TranscriptionError};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
