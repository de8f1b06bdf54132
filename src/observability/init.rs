//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFileWriter;
use crate::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the log inside the data directory.
pub const LOG_FILE_NAME: &str = "news-brief.log";

/// Installs the global tracing subscriber.
///
/// Events are written as JSON lines to a rotating log file in the data
/// directory and, when `log_to_stderr` is set, as human-readable lines to
/// stderr.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.log_level`
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Skips the file layer if that fails (logging is optional)
/// - Idempotent: only the first call takes effect
///
/// # Returns
///
/// Path of the log file, if the file layer was installed.
///
/// # Example
///
/// ```rust,no_run
/// use news_brief::observability::init_tracing;
/// use news_brief::Config;
///
/// let config = Config {
///     log_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config.log_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = config.data_dir();
    let log_file = std::fs::create_dir_all(&data_dir)
        .is_ok()
        .then(|| data_dir.join(LOG_FILE_NAME));

    let file_layer = log_file.clone().map(|path| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_ansi(false)
            .with_writer(RotatingFileWriter::new(path))
    });
    let stderr_layer = config
        .log_to_stderr
        .then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(log_file = ?log_file, "tracing initialized");
    }

    log_file
}
