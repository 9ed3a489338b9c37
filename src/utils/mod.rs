use std::collections::HashSet;
use std::path::PathBuf;

/// Turn a video title into a filesystem-safe file stem.
///
/// Keeps alphanumerics, `-` and `_`, collapses everything else (including
/// whitespace runs) into single underscores, lowercases, and truncates to
/// `max_len` characters. Empty results fall back to `untitled`.
pub fn sanitize_title(title: &str, max_len: usize) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let joined = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    let truncated: String = joined.chars().take(max_len).collect();
    let trimmed = truncated.trim_matches('_');

    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Run-scoped allocator of unique transcript file names.
///
/// A candidate that collides with a name assigned earlier in the same run, or
/// with a file already present in the output directory, gets `_2`, `_3`, ...
/// appended until it is unique.
pub struct FilenameAllocator {
    dir: PathBuf,
    max_len: usize,
    assigned: HashSet<String>,
}

impl FilenameAllocator {
    pub fn new(dir: impl Into<PathBuf>, max_len: usize) -> Self {
        Self {
            dir: dir.into(),
            max_len,
            assigned: HashSet::new(),
        }
    }

    /// Claim a unique `.txt` file name for `title`.
    pub fn assign(&mut self, title: &str) -> String {
        let base = sanitize_title(title, self.max_len);

        let mut candidate = base.clone();
        let mut counter = 2;
        while !self.is_free(&candidate) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }

        self.assigned.insert(candidate.clone());
        format!("{candidate}.txt")
    }

    fn is_free(&self, stem: &str) -> bool {
        !self.assigned.contains(stem) && !self.dir.join(format!("{stem}.txt")).exists()
    }
}

/// Format a duration in seconds in human-readable form.
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Check if the current environment has the required external tools.
pub async fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available("yt-dlp", "--version").await {
        missing.push("yt-dlp - required for downloading YouTube audio".to_string());
    }

    if !check_command_available("ffmpeg", "-version").await {
        missing.push("ffmpeg - required for audio extraction".to_string());
    }

    if !check_command_available("whisper", "--help").await {
        missing.push("whisper - required for transcription (pip install openai-whisper)".to_string());
    }

    missing
}

/// Check if a command is available in PATH.
async fn check_command_available(command: &str, probe_arg: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg(probe_arg)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Episode 1", 100), "episode_1");
        assert_eq!(sanitize_title("Hello, World!", 100), "hello_world");
        assert_eq!(sanitize_title("a/b\\c:d", 100), "a_b_c_d");
        assert_eq!(sanitize_title("  spaced   out  ", 100), "spaced_out");
    }

    #[test]
    fn test_sanitize_title_truncates() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_title(&long, 100).chars().count(), 100);
    }

    #[test]
    fn test_sanitize_title_fallback() {
        assert_eq!(sanitize_title("", 100), "untitled");
        assert_eq!(sanitize_title("!!!???", 100), "untitled");
    }

    #[test]
    fn test_sanitize_title_is_deterministic() {
        assert_eq!(sanitize_title("Episode 1", 100), sanitize_title("Episode 1", 100));
    }

    #[test]
    fn test_allocator_disambiguates_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut names = FilenameAllocator::new(dir.path(), 100);

        assert_eq!(names.assign("Episode 1"), "episode_1.txt");
        assert_eq!(names.assign("Episode 1"), "episode_1_2.txt");
        assert_eq!(names.assign("Episode 1"), "episode_1_3.txt");
    }

    #[test]
    fn test_allocator_avoids_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("episode_1.txt"), "earlier run").unwrap();

        let mut names = FilenameAllocator::new(dir.path(), 100);
        assert_eq!(names.assign("Episode 1"), "episode_1_2.txt");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30.0), "30s");
        assert_eq!(format_duration(90.0), "1m 30s");
        assert_eq!(format_duration(3661.0), "1h 1m 1s");
    }
}
