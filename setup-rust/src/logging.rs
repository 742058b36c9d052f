use anyhow::{Context, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "node-setup.log";

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join("logs")
}

/// Creates the log directory and file so the appender never races on them.
pub fn prepare_log_file(root: &Path) -> Result<PathBuf> {
    let dir = logs_dir(root);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let log_path = dir.join(LOG_FILE_NAME);
    let _file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open {}", log_path.display()))?;
    Ok(log_path)
}

/// Installs the global subscriber writing to `logs/node-setup.log`.
/// `RUST_LOG` wins over the configured filter. Keep the guard alive until exit.
///
/// A root where the log file cannot be created (read-only install, locked
/// file) falls back to stderr; the setup itself must still run and report.
pub fn init(root: &Path, filter: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    match prepare_log_file(root) {
        Ok(_) => {
            let appender = tracing_appender::rolling::never(logs_dir(root), LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_writer(writer)
                .with_ansi(false)
                .with_env_filter(filter)
                .try_init()
                .ok()
                .map(|()| guard)
        }
        Err(err) => {
            let _ = tracing_subscriber::fmt()
                .with_writer(io::stderr)
                .with_env_filter(filter)
                .try_init();
            warn!(error = %format!("{err:#}"), "file logging unavailable, logging to stderr");
            None
        }
    }
}
