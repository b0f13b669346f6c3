//! Log file handling for the simulator.
//!
//! The subscriber writes to a file because stdout is the simulated panel.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use pocket_config::{LogConfig, LogLevel};
use tracing_subscriber::EnvFilter;

/// Size at which the log file is rotated (1 MB).
pub const DEFAULT_MAX_LOG_SIZE: u64 = 1024 * 1024;

/// Rotated files kept next to the live one.
pub const DEFAULT_MAX_LOG_FILES: u32 = 3;

/// Create the parent directory of `log_path` if needed.
pub fn ensure_log_dir(log_path: &Path) -> io::Result<()> {
    if let Some(parent) = log_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Rotate `pocket.log` to `pocket.log.1`, shifting older files up and
/// dropping the one past `max_files`. Does nothing while the file is
/// smaller than `max_size`.
pub fn rotate_log_files(log_path: &Path, max_size: u64, max_files: u32) -> io::Result<()> {
    if !log_path.exists() || fs::metadata(log_path)?.len() < max_size {
        return Ok(());
    }

    let oldest = rotated_path(log_path, max_files);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for i in (1..max_files).rev() {
        let from = rotated_path(log_path, i);
        if from.exists() {
            fs::rename(&from, rotated_path(log_path, i + 1))?;
        }
    }
    fs::rename(log_path, rotated_path(log_path, 1))
}

pub fn log_level_to_filter(level: &LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured
/// level. Returns the file being written.
pub fn init(config: &LogConfig, default_path: PathBuf) -> Result<PathBuf> {
    let path = config.file.clone().unwrap_or(default_path);
    ensure_log_dir(&path)
        .with_context(|| format!("failed to create log directory for {}", path.display()))?;
    rotate_log_files(&path, DEFAULT_MAX_LOG_SIZE, DEFAULT_MAX_LOG_FILES)
        .with_context(|| format!("failed to rotate {}", path.display()))?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level_to_filter(&config.level)));
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(path)
}

fn rotated_path(base: &Path, index: u32) -> PathBuf {
    let name = base.file_name().unwrap_or_default().to_string_lossy();
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}.{}", name, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rotated_path_format() {
        let base = Path::new("/tmp/pocket.log");
        assert_eq!(rotated_path(base, 2), PathBuf::from("/tmp/pocket.log.2"));
    }

    #[test]
    fn rotate_no_op_when_missing_or_small() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("pocket.log");
        rotate_log_files(&log, 50, 3).unwrap();
        fs::write(&log, "short").unwrap();
        rotate_log_files(&log, 50, 3).unwrap();
        assert!(log.exists());
        assert!(!dir.path().join("pocket.log.1").exists());
    }

    #[test]
    fn rotate_cascades_and_drops_oldest() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("pocket.log");
        fs::write(dir.path().join("pocket.log.1"), "old1").unwrap();
        fs::write(dir.path().join("pocket.log.2"), "old2").unwrap();
        fs::write(&log, "x".repeat(100)).unwrap();

        rotate_log_files(&log, 50, 2).unwrap();

        assert!(!log.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("pocket.log.1")).unwrap(),
            "x".repeat(100)
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("pocket.log.2")).unwrap(),
            "old1"
        );
        assert!(!dir.path().join("pocket.log.3").exists());
    }

    #[test]
    fn ensure_log_dir_creates_parents() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("a").join("b").join("pocket.log");
        ensure_log_dir(&log).unwrap();
        ensure_log_dir(&log).unwrap();
        assert!(dir.path().join("a").join("b").exists());
    }

    #[test]
    fn level_names() {
        assert_eq!(log_level_to_filter(&LogLevel::Trace), "trace");
        assert_eq!(log_level_to_filter(&LogLevel::Info), "info");
        assert_eq!(log_level_to_filter(&LogLevel::Error), "error");
    }
}
