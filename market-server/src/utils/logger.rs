//! Logging Infrastructure
//!
//! Structured logging with `tracing-subscriber`. Console output always; a
//! daily rolling file (via `tracing-appender`) when a log directory is set.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Initialize the logger (console only, `info` unless `RUST_LOG` says otherwise)
pub fn init_logger() {
    let _ = init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON format and file output
///
/// The returned guard must be kept alive for the file writer to flush.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: bool,
    log_dir: Option<&str>,
) -> Option<WorkerGuard> {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},tower_http=info,sqlx=warn")));

    let console = if json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .boxed()
    };

    let (file_layer, guard) = match log_dir.map(Path::new) {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, "market-server");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init();

    if result.is_err() {
        // Already initialized (tests, repeated init)
        return None;
    }
    guard
}

/// Remove rolling log files older than `days`
pub fn cleanup_old_logs(log_dir: &str, days: u64) -> std::io::Result<usize> {
    let cutoff = std::time::SystemTime::now()
        .checked_sub(std::time::Duration::from_secs(days * 24 * 60 * 60))
        .unwrap_or(std::time::UNIX_EPOCH);

    let mut removed = 0;
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with("market-server") {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if modified < cutoff {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.log"), "x").unwrap();
        std::fs::write(dir.path().join("market-server.2024-01-01"), "x").unwrap();

        // 0 days: everything of ours is "old"
        let removed = cleanup_old_logs(dir.path().to_str().unwrap(), 0).unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("other.log").exists());
    }
}
