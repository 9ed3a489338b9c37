//! Result-writer tests over batches produced with stub collaborators.

use async_trait::async_trait;
use std::path::Path;

use youtube_transcriptor::cli::OutputFormat;
use youtube_transcriptor::extractors::{AcquiredAudio, DownloadError, MediaAcquirer};
use youtube_transcriptor::output;
use youtube_transcriptor::pipeline::{BatchRun, TranscriptionPipeline, VideoReference};
use youtube_transcriptor::transcribe::{ModelSize, Transcriber, TranscriptionError};

struct StubAcquirer;

#[async_trait]
impl MediaAcquirer for StubAcquirer {
    async fn acquire(&self, url: &str, workdir: &Path) -> Result<AcquiredAudio, DownloadError> {
        // One deliberately unavailable video in every batch
        if url.contains("GONE") {
            return Err(DownloadError::Restricted("stub: video unavailable".to_string()));
        }

        let audio_path = workdir.join("audio.mp3");
        fs_err::write(&audio_path, b"fake audio")?;
        Ok(AcquiredAudio {
            title: format!("Video {url}"),
            duration_seconds: Some(60.0),
            audio_path,
        })
    }
}

struct StubTranscriber;

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(
        &self,
        _audio_path: &Path,
        _model: ModelSize,
    ) -> Result<String, TranscriptionError> {
        Ok("stub transcript text".to_string())
    }
}

async fn run_batch(output_dir: &Path, format: OutputFormat) -> BatchRun {
    let pipeline = TranscriptionPipeline::with_collaborators(
        Box::new(StubAcquirer),
        Box::new(StubTranscriber),
        ModelSize::Base,
        output_dir.to_path_buf(),
        100,
    );

    pipeline
        .process_batch(
            VideoReference::from_urls(&[
                "https://youtu.be/AAA".to_string(),
                "https://youtu.be/GONE".to_string(),
            ]),
            format,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn text_format_writes_one_file_per_success() {
    let out = tempfile::tempdir().unwrap();
    let run = run_batch(out.path(), OutputFormat::Text).await;

    let written = output::write_batch(&run).unwrap();
    assert_eq!(written.len(), 1);

    let content = fs_err::read_to_string(&written[0]).unwrap();
    assert_eq!(content, "stub transcript text");
}

#[tokio::test]
async fn csv_format_writes_one_row_per_result() {
    let out = tempfile::tempdir().unwrap();
    let run = run_batch(out.path(), OutputFormat::Csv).await;

    let written = output::write_batch(&run).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0], out.path().join(output::CSV_FILENAME));

    let content = fs_err::read_to_string(&written[0]).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one row per result");
    assert_eq!(lines[0], "title,url,duration,transcript,filename,processed_at");

    let success: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(success[3], "stub transcript text");

    let failure: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(failure[0], "", "failure row has no title");
    assert_eq!(failure[3], "", "failure row has no transcript");
    assert_eq!(failure[4], "", "failure row has no filename");
}

#[tokio::test]
async fn json_format_writes_ordered_records_with_status() {
    let out = tempfile::tempdir().unwrap();
    let run = run_batch(out.path(), OutputFormat::Json).await;

    let written = output::write_batch(&run).unwrap();
    assert_eq!(written[0], out.path().join(output::JSON_FILENAME));

    let content = fs_err::read_to_string(&written[0]).unwrap();
    let records: serde_json::Value = serde_json::from_str(&content).unwrap();
    let records = records.as_array().unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["status"], "success");
    assert_eq!(records[0]["url"], "https://youtu.be/AAA");
    assert_eq!(records[1]["status"], "failure");
    assert_eq!(records[1]["kind"], "download");
    assert!(records[1]["transcript"].is_null());
    assert!(records[1]["error"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn all_format_writes_every_artifact() {
    let out = tempfile::tempdir().unwrap();
    let run = run_batch(out.path(), OutputFormat::All).await;

    let written = output::write_batch(&run).unwrap();

    // One per-item text file, plus the combined CSV and JSON
    assert_eq!(written.len(), 3);
    assert!(out.path().join(output::CSV_FILENAME).exists());
    assert!(out.path().join(output::JSON_FILENAME).exists());
}

#[tokio::test]
async fn write_failure_leaves_results_intact() {
    let out = tempfile::tempdir().unwrap();
    let mut run = run_batch(out.path(), OutputFormat::Text).await;

    // Point the writer at a path that cannot become a directory
    let blocker = out.path().join("blocker");
    fs_err::write(&blocker, b"file, not a directory").unwrap();
    run.output_dir = blocker;

    let err = output::write_batch(&run).unwrap_err();
    assert!(matches!(err, output::WriteError::Io { .. }));

    // Transcription work is still available for a retry
    assert_eq!(run.summary.succeeded, 1);
    assert!(run.results[0].transcript.is_some());
}
