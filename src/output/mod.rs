use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::pipeline::{BatchRun, ProcessingResult};

pub mod formatters;

/// Fixed name of the combined tabular artifact.
pub const CSV_FILENAME: &str = "transcripts.csv";

/// Fixed name of the combined structured artifact.
pub const JSON_FILENAME: &str = "transcripts.json";

/// Errors from persisting results.
///
/// Fatal to the write step only: the results already collected in memory stay
/// valid, so a caller can fix the problem and write again without
/// re-transcribing anything.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Write all artifacts selected by the run's output format.
///
/// Returns the paths written, in write order. Existing files other than the
/// artifacts themselves are never touched.
pub fn write_batch(run: &BatchRun) -> Result<Vec<PathBuf>, WriteError> {
    fs_err::create_dir_all(&run.output_dir).map_err(|source| WriteError::Io {
        path: run.output_dir.clone(),
        source,
    })?;

    let mut written = Vec::new();

    if matches!(run.format, OutputFormat::Text | OutputFormat::All) {
        for result in &run.results {
            if let Some(path) = write_transcript(result, &run.output_dir)? {
                written.push(path);
            }
        }
    }

    if matches!(run.format, OutputFormat::Csv | OutputFormat::All) {
        let path = run.output_dir.join(CSV_FILENAME);
        write_file(&path, &formatters::format_as_csv(&run.results))?;
        written.push(path);
    }

    if matches!(run.format, OutputFormat::Json | OutputFormat::All) {
        let path = run.output_dir.join(JSON_FILENAME);
        write_file(&path, &formatters::format_as_json(&run.results)?)?;
        written.push(path);
    }

    Ok(written)
}

/// Write one success result's transcript as a standalone text file.
///
/// Failures produce no per-item artifact and return `Ok(None)`.
pub fn write_transcript(
    result: &ProcessingResult,
    dir: &Path,
) -> Result<Option<PathBuf>, WriteError> {
    let (name, transcript) = match (&result.output_filename, &result.transcript) {
        (Some(name), Some(transcript)) => (name, transcript),
        _ => return Ok(None),
    };

    let path = dir.join(name);
    write_file(&path, transcript)?;
    Ok(Some(path))
}

fn write_file(path: &Path, content: &str) -> Result<(), WriteError> {
    fs_err::write(path, content).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
