use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tagviz_core::TagvizConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Install the server's global subscriber.
///
/// Logs go to stderr and are appended to `<log_dir>/<log_file>` without ANSI
/// colors. If the log file cannot be opened the server still starts, logging
/// to stderr only.
pub fn init(config: &TagvizConfig) -> Result<(), TryInitError> {
    let log_path = config.log_path();
    let (file, open_error) = match open_log_file(&config.log_dir(), &log_path) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };

    let file_layer = file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    match open_error {
        None => tracing::debug!(path = %log_path.display(), "logging to file"),
        Some(e) => tracing::warn!(
            path = %log_path.display(),
            error = %e,
            "cannot open log file, logging to stderr only"
        ),
    }
    Ok(())
}

fn open_log_file(log_dir: &Path, log_path: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(log_dir)?;
    OpenOptions::new().create(true).append(true).open(log_path)
}
