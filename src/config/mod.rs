use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::transcribe::ModelSize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory transcripts and combined artifacts are written to
    pub output_directory: PathBuf,

    /// Whisper model used when none is given on the command line
    pub default_model: ModelSize,

    /// Audio container requested from yt-dlp
    pub audio_format: String,

    /// Audio quality passed to yt-dlp's ffmpeg post-processor
    pub audio_quality: String,

    /// Upper bound on generated file name length
    pub max_filename_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("downloads"),
            default_model: ModelSize::Base,
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
            max_filename_length: 100,
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("youtube-transcriptor").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.audio_format.is_empty() {
            anyhow::bail!("audio_format must not be empty");
        }

        if self.max_filename_length == 0 {
            anyhow::bail!("max_filename_length must be at least 1");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Output Directory: {}", self.output_directory.display());
        println!("  Default Model: {}", self.default_model);
        println!("  Audio Format: {}", self.audio_format);
        println!("  Audio Quality: {}", self.audio_quality);
        println!("  Max Filename Length: {}", self.max_filename_length);
        if let Ok(path) = Self::config_path() {
            println!("  Config File: {}", path.display());
        }
    }
}
