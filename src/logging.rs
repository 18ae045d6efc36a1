use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "clothing_gourmet=debug,tower_http=debug";

/// Install the global subscriber: stderr, plus `log_file` when set.
///
/// The returned guard flushes the file writer when dropped, so `main` has to
/// hold it for the life of the server.
pub fn init(log_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Non-blocking writer appending to a single, never-rotated file
pub fn file_writer(path: &str) -> Result<(NonBlocking, WorkerGuard)> {
    let (dir, file_name) = split_log_path(path)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| anyhow!("Cannot open log file {}: {}", path, e))?;
    Ok(tracing_appender::non_blocking(appender))
}

fn split_log_path(path: &str) -> Result<(PathBuf, String)> {
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name.to_string()))
}
