use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter() -> tracing_subscriber::EnvFilter {
    // Use RUST_LOG environment variable, default to info level
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Initialize logging to stderr (CLI commands)
pub fn init_logger() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false) // Don't show module paths
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init();
}

/// Initialize logging to `<dir>/sitescan.log`.
///
/// The TUI owns the terminal, so anything written to stderr would corrupt the
/// screen. The returned guard must be kept alive until exit so buffered lines
/// are flushed.
pub fn init_file_logger(dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(dir, "sitescan.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .compact(),
        )
        .try_init();

    guard
}
