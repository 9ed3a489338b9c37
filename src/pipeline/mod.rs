use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::extractors::youtube::YtDlpAcquirer;
use crate::extractors::{self, MediaAcquirer};
use crate::transcribe::whisper::WhisperCliTranscriber;
use crate::transcribe::{ModelSize, Transcriber};
use crate::utils::FilenameAllocator;

/// One candidate URL from the batch input.
#[derive(Debug, Clone)]
pub struct VideoReference {
    /// Raw URL as supplied
    pub url: String,

    /// 1-based input line (or argument position), for diagnostics
    pub line: usize,

    /// Parsed video id, `None` if the URL is not a recognizable video link
    pub video_id: Option<String>,
}

impl VideoReference {
    pub fn new(url: impl Into<String>, line: usize) -> Self {
        let url = url.into();
        let video_id = extractors::extract_video_id(&url);
        Self { url, line, video_id }
    }

    /// Build references from an in-memory URL list, in order.
    pub fn from_urls(urls: &[String]) -> Vec<Self> {
        urls.iter()
            .enumerate()
            .map(|(index, url)| Self::new(url.clone(), index + 1))
            .collect()
    }
}

/// Read candidate URLs from a line-oriented file.
///
/// Blank lines and lines whose first non-whitespace character is `#` are
/// skipped silently; they are not counted as failures.
pub fn load_references(path: &Path) -> Result<Vec<VideoReference>> {
    let content = fs_err::read_to_string(path)
        .with_context(|| format!("failed to read URL list {}", path.display()))?;
    Ok(references_from_lines(&content))
}

/// Line-oriented parsing behind [`load_references`], 1-based line numbers.
pub fn references_from_lines(content: &str) -> Vec<VideoReference> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            Some(VideoReference::new(trimmed.to_string(), index + 1))
        })
        .collect()
}

/// Which stage of the per-item pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidUrl,
    Download,
    Transcription,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingStatus {
    Success,
    Failure { kind: FailureKind },
}

/// The outcome of processing one [`VideoReference`].
///
/// Built exactly once per reference; a failure never carries a transcript and
/// a success always carries a non-empty one.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub url: String,
    pub title: Option<String>,
    pub duration_seconds: Option<f64>,
    pub transcript: Option<String>,
    pub output_filename: Option<String>,
    pub processed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub status: ProcessingStatus,
    /// Diagnostic detail, present only on failure
    pub error: Option<String>,
}

impl ProcessingResult {
    fn success(
        reference: &VideoReference,
        title: String,
        duration_seconds: Option<f64>,
        transcript: String,
        output_filename: String,
    ) -> Self {
        Self {
            url: reference.url.clone(),
            title: Some(title),
            duration_seconds,
            transcript: Some(transcript),
            output_filename: Some(output_filename),
            processed_at: Utc::now(),
            status: ProcessingStatus::Success,
            error: None,
        }
    }

    fn failure(
        reference: &VideoReference,
        kind: FailureKind,
        detail: String,
        title: Option<String>,
        duration_seconds: Option<f64>,
    ) -> Self {
        Self {
            url: reference.url.clone(),
            title,
            duration_seconds,
            transcript: None,
            output_filename: None,
            processed_at: Utc::now(),
            status: ProcessingStatus::Failure { kind },
            error: Some(detail),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ProcessingStatus::Success)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self.status {
            ProcessingStatus::Success => None,
            ProcessingStatus::Failure { kind } => Some(kind),
        }
    }
}

/// Aggregate counters for one batch, computed at finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// A finalized batch: every result in input order plus the configuration the
/// run was made with.
#[derive(Debug)]
pub struct BatchRun {
    pub results: Vec<ProcessingResult>,
    pub model: ModelSize,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub summary: BatchSummary,
}

impl BatchRun {
    fn finalize(
        results: Vec<ProcessingResult>,
        model: ModelSize,
        output_dir: PathBuf,
        format: OutputFormat,
    ) -> Self {
        let mut summary = BatchSummary {
            attempted: results.len(),
            succeeded: 0,
            failed: 0,
        };
        for result in &results {
            if result.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }

        Self {
            results,
            model,
            output_dir,
            format,
            summary,
        }
    }
}

/// The download -> transcribe -> persist pipeline.
///
/// Items are processed strictly in input order, one at a time: the whisper
/// engine is the bottleneck and loading its model concurrently is not safe on
/// constrained hardware. A failure in one item is recorded and never aborts
/// the rest of the batch.
pub struct TranscriptionPipeline {
    acquirer: Box<dyn MediaAcquirer>,
    transcriber: Box<dyn Transcriber>,
    model: ModelSize,
    output_dir: PathBuf,
    max_filename_length: usize,
}

impl TranscriptionPipeline {
    /// Pipeline backed by yt-dlp and the openai-whisper CLI.
    pub fn new(config: &Config, model: ModelSize, output_dir: PathBuf) -> Self {
        Self::with_collaborators(
            Box::new(YtDlpAcquirer::from_config(config)),
            Box::new(WhisperCliTranscriber::new()),
            model,
            output_dir,
            config.max_filename_length,
        )
    }

    /// Pipeline with custom acquirer and transcriber implementations.
    pub fn with_collaborators(
        acquirer: Box<dyn MediaAcquirer>,
        transcriber: Box<dyn Transcriber>,
        model: ModelSize,
        output_dir: PathBuf,
        max_filename_length: usize,
    ) -> Self {
        Self {
            acquirer,
            transcriber,
            model,
            output_dir,
            max_filename_length,
        }
    }

    /// Process one URL and return its result.
    pub async fn process_single(&self, url: &str) -> ProcessingResult {
        let reference = VideoReference::new(url, 1);
        let mut names = FilenameAllocator::new(&self.output_dir, self.max_filename_length);
        self.process_item(&reference, &mut names).await
    }

    /// Process an ordered list of references into a finalized [`BatchRun`].
    ///
    /// Every reference yields exactly one result, in input order. An empty
    /// input yields an empty run with zero counters.
    pub async fn process_batch(
        &self,
        references: Vec<VideoReference>,
        format: OutputFormat,
    ) -> Result<BatchRun> {
        fs_err::create_dir_all(&self.output_dir)
            .with_context(|| format!("failed to create output directory {}", self.output_dir.display()))?;

        let mut names = FilenameAllocator::new(&self.output_dir, self.max_filename_length);
        let mut results = Vec::with_capacity(references.len());

        for reference in &references {
            let result = self.process_item(reference, &mut names).await;
            match &result.status {
                ProcessingStatus::Success => {
                    tracing::info!(url = %reference.url, "transcribed");
                }
                ProcessingStatus::Failure { kind } => {
                    tracing::warn!(
                        url = %reference.url,
                        line = reference.line,
                        ?kind,
                        detail = result.error.as_deref().unwrap_or(""),
                        "item failed"
                    );
                }
            }
            results.push(result);
        }

        Ok(BatchRun::finalize(
            results,
            self.model,
            self.output_dir.clone(),
            format,
        ))
    }

    /// Run the per-item pipeline, converting every stage error into a
    /// `Failure` result so it cannot escape and abort the batch.
    async fn process_item(
        &self,
        reference: &VideoReference,
        names: &mut FilenameAllocator,
    ) -> ProcessingResult {
        tracing::info!(url = %reference.url, line = reference.line, "processing video");

        if reference.video_id.is_none() {
            return ProcessingResult::failure(
                reference,
                FailureKind::InvalidUrl,
                "not a recognizable YouTube URL".to_string(),
                None,
                None,
            );
        }

        // Scratch space for the downloaded audio. Dropping the TempDir at the
        // end of this call releases it on every exit path, including failures.
        let workdir = match TempDir::new() {
            Ok(dir) => dir,
            Err(e) => {
                return ProcessingResult::failure(
                    reference,
                    FailureKind::Download,
                    format!("could not create scratch directory: {e}"),
                    None,
                    None,
                );
            }
        };

        let audio = match self.acquirer.acquire(&reference.url, workdir.path()).await {
            Ok(audio) => audio,
            Err(e) => {
                return ProcessingResult::failure(
                    reference,
                    FailureKind::Download,
                    e.to_string(),
                    None,
                    None,
                );
            }
        };

        let transcript = match self.transcriber.transcribe(&audio.audio_path, self.model).await {
            Ok(text) => text,
            Err(e) => {
                return ProcessingResult::failure(
                    reference,
                    FailureKind::Transcription,
                    e.to_string(),
                    Some(audio.title),
                    audio.duration_seconds,
                );
            }
        };

        let output_filename = names.assign(&audio.title);
        ProcessingResult::success(
            reference,
            audio.title,
            audio.duration_seconds,
            transcript,
            output_filename,
        )
    }
}
