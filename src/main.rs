use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod extractors;
mod output;
mod pipeline;
mod transcribe;
mod utils;

use cli::{Cli, Commands};
use config::Config;
use pipeline::{BatchRun, TranscriptionPipeline, VideoReference};
use transcribe::ModelSize;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "yt_transcriptor=debug"
    } else {
        "yt_transcriptor=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Check for required external tools (non-fatal, the per-item path
    // reports missing tools as item failures)
    if !cli.quiet {
        let missing_deps = utils::check_dependencies().await;
        if !missing_deps.is_empty() {
            eprintln!("⚠️  Dependency check warnings:");
            for dep in missing_deps {
                eprintln!("   • {}", dep);
            }
            eprintln!("   (Continuing anyway - tools may be available)");
        }
    }

    let config = Config::load().await?;

    match cli.command {
        Commands::Transcribe { url, model, output_dir } => {
            let model = model.unwrap_or(config.default_model);
            let output_dir = output_dir.unwrap_or_else(|| config.output_directory.clone());
            let pipeline = TranscriptionPipeline::new(&config, model, output_dir.clone());

            tracing::info!("Starting transcription for URL: {}", url);
            let result = pipeline.process_single(&url).await;

            if !result.is_success() {
                anyhow::bail!(
                    "transcription failed: {}",
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }

            fs_err::create_dir_all(&output_dir)?;
            if let Some(path) = output::write_transcript(&result, &output_dir)? {
                println!("Transcript saved to: {}", path.display());
            }
            if let Some(duration) = result.duration_seconds {
                println!("Video duration: {}", utils::format_duration(duration));
            }
            if let Some(transcript) = &result.transcript {
                print_preview(transcript);
            }
        }

        Commands::Batch { urls, file, model, output_dir, format } => {
            let references = match file {
                Some(path) => pipeline::load_references(&path)?,
                None => {
                    if urls.is_empty() {
                        anyhow::bail!("provide URLs on the command line or a list via --file");
                    }
                    VideoReference::from_urls(&urls)
                }
            };

            let model = model.unwrap_or(config.default_model);
            let output_dir = output_dir.unwrap_or_else(|| config.output_directory.clone());
            let pipeline = TranscriptionPipeline::new(&config, model, output_dir);

            tracing::info!("Starting batch of {} video(s)", references.len());
            let run = pipeline.process_batch(references, format).await?;

            let written = output::write_batch(&run)?;
            for path in &written {
                tracing::info!("Wrote {}", path.display());
            }

            print_summary(&run);
        }

        Commands::Config => {
            config.display();
        }

        Commands::Models => {
            println!("Available whisper models:");
            for model in ModelSize::value_variants() {
                println!("  • {:<8} {}", model.as_str(), model.description());
            }
        }
    }

    Ok(())
}

/// First 500 characters of the transcript, the way a quick sanity check wants it.
fn print_preview(transcript: &str) {
    let preview: String = transcript.chars().take(500).collect();
    let ellipsis = if transcript.chars().count() > 500 { "..." } else { "" };
    println!("\nFirst 500 characters:\n{}{}", preview, ellipsis);
}

fn print_summary(run: &BatchRun) {
    let summary = &run.summary;
    println!();
    println!(
        "Batch complete: {} attempted, {} succeeded, {} failed",
        summary.attempted,
        style(summary.succeeded).green(),
        style(summary.failed).red()
    );

    // List failed items with their diagnostics so just those can be re-run
    for result in run.results.iter().filter(|r| !r.is_success()) {
        println!(
            "  {} {} - {}",
            style("✗").red(),
            result.url,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}
