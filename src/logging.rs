//! Log routing: a compact stdout stream plus an append-only log file.
//!
//! The file is `DOCSORT_LOG_FILE` when set, otherwise `logs/docsort.log`. Missing parent
//! folders are created. If the file cannot be opened the service still starts and logs to
//! stdout only.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "DOCSORT_LOG_FILE";
const FALLBACK_LOG_PATH: &str = "logs/docsort.log";

// Dropping the guard would stop the background writer and lose buffered lines.
static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_path = log_file_path(std::env::var(LOG_FILE_ENV).ok());

    let file_layer = match open_log_file(&log_path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = FILE_WRITER_GUARD.set(guard);
            Some(fmt::layer().with_writer(writer).with_ansi(false).compact())
        }
        Err(err) => {
            eprintln!(
                "Logging to stdout only; cannot open {}: {err}",
                log_path.display()
            );
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .init();
}

fn log_file_path(configured: Option<String>) -> PathBuf {
    configured
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_LOG_PATH))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn blank_or_missing_setting_uses_fallback_path() {
        assert_eq!(log_file_path(None), PathBuf::from("logs/docsort.log"));
        assert_eq!(log_file_path(Some("  ".into())), PathBuf::from("logs/docsort.log"));
        assert_eq!(
            log_file_path(Some("/var/log/docsort.log".into())),
            PathBuf::from("/var/log/docsort.log")
        );
    }

    #[test]
    fn log_file_is_created_with_parents_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/app.log");

        open_log_file(&path).unwrap().write_all(b"first\n").unwrap();
        open_log_file(&path).unwrap().write_all(b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
