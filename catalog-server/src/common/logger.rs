//! Logging Infrastructure
//!
//! Structured logging setup for development and production environments:
//! console output plus an optional daily-rotating file layer.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Initialize logging with console output only
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    init_logger_with_file(level, false, None).map(|_| ())
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - log level used when `RUST_LOG` is unset (e.g. "info")
/// * `json_format` - JSON output (production) vs human-readable (development)
/// * `log_dir` - optional directory for daily-rotating file logs
///
/// Returns the appender worker guard when file logging is enabled; the
/// caller must keep it alive for buffered log lines to be flushed.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    // Console layer
    if json_format {
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .boxed(),
        );
    } else {
        layers.push(fmt::layer().with_target(true).boxed());
    }

    // Daily-rotating file layer
    let mut guard = None;
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "catalog.log");
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
        guard = Some(worker_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;

    Ok(guard)
}
