use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes structured logging: JSON lines to a daily-rolling file under
/// `logs_dir`, plus human-readable output on stderr. The returned guard must be
/// held for the lifetime of the process to avoid dropping buffered log lines.
pub fn init_logging(logs_dir: &Path) -> WorkerGuard {
    std::fs::create_dir_all(logs_dir).expect("failed to create logs directory");
    let file_appender = tracing_appender::rolling::daily(logs_dir, "minidb.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking);
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}
