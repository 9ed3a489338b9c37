use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::transcribe::ModelSize;

#[derive(Parser)]
#[command(
    name = "yt-transcriptor",
    about = "YouTube Transcriptor - turn YouTube videos into text transcripts",
    version,
    long_about = "A CLI tool for transcribing YouTube videos, one at a time or in batches. Audio is downloaded with yt-dlp and transcribed locally with the openai-whisper CLI; results are written as per-video text files, a combined CSV table, or a combined JSON document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable dependency warnings and progress chatter
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe a single YouTube video
    Transcribe {
        /// YouTube video URL (youtube.com or youtu.be)
        #[arg(value_name = "URL")]
        url: String,

        /// Whisper model size (defaults to the configured model)
        #[arg(short, long, value_enum)]
        model: Option<ModelSize>,

        /// Directory the transcript is written to (defaults to the configured directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Transcribe a batch of YouTube videos
    Batch {
        /// YouTube video URLs, processed in the order given
        #[arg(value_name = "URL", conflicts_with = "file")]
        urls: Vec<String>,

        /// Read URLs from a file instead, one per line (blank lines and `#` comments ignored)
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Whisper model size (defaults to the configured model)
        #[arg(short, long, value_enum)]
        model: Option<ModelSize>,

        /// Directory artifacts are written to (defaults to the configured directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Output encoding for the collected results
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the effective configuration
    Config,

    /// List available whisper model sizes
    Models,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One text file per transcribed video
    Text,
    /// One combined CSV file with a row per video
    Csv,
    /// One combined JSON file with a record per video
    Json,
    /// All of the above
    All,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::All => write!(f, "all"),
        }
    }
}
