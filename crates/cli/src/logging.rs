use anyhow::{anyhow, Result};
use preview_config::LogConfig;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// Log files larger than this are truncated on startup.
const MAX_LOG_FILE_SIZE: u64 = 8 * 1024 * 1024;

const LOG_PATH_ENV: &str = "MDPREVIEW_LOG_PATH";

/// Installs the global subscriber writing to the log file, if any is specified.
///
/// stdout carries the protocol messages, nothing is logged there. The returned
/// guard must be kept alive for the logs to be flushed.
pub(crate) fn init(
    specified_log_file: Option<PathBuf>,
    log_config: &LogConfig,
) -> Result<Option<WorkerGuard>> {
    let maybe_log = specified_log_file
        .or_else(|| std::env::var(LOG_PATH_ENV).ok().map(PathBuf::from))
        .or_else(|| log_config.log_file.as_ref().map(PathBuf::from));

    let Some(log_path) = maybe_log else {
        return Ok(None);
    };

    if let Ok(metadata) = std::fs::metadata(&log_path) {
        if log_path.is_file() && metadata.len() > MAX_LOG_FILE_SIZE {
            std::fs::remove_file(&log_path)?;
        }
    }

    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("no file name in {log_path:?}"))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| anyhow!("{log_path:?} has no parent"))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let max_level = log_config
        .max_level
        .parse()
        .unwrap_or(tracing::Level::DEBUG);

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Some(guard))
}
