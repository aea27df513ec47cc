//! Structured Logger
//!
//! Wraps `tracing` to provide JSON-formatted output, file rotation (NDJSON),
//! and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of the rolling log.
pub const LOG_FILE_NAME: &str = "a11yscore.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` overrides `level`. Safe to call more than once; later calls
/// are ignored.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Writes NDJSON to `<log_dir>/a11yscore.log.YYYY-MM-DD`
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_log_dir() -> PathBuf {
        std::env::temp_dir().join(format!("a11yscore-logs-{}", uuid::Uuid::new_v4()))
    }

    fn has_log_file(dir: &Path) -> bool {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .flatten()
                    .any(|e| e.file_name().to_string_lossy().starts_with(LOG_FILE_NAME))
            })
            .unwrap_or(false)
    }

    #[test]
    fn second_init_is_ignored() {
        let first = temp_log_dir();
        let second = temp_log_dir();

        init_logger(&first, "info");
        init_logger(&second, "debug");
        tracing::info!(target: "a11yscore_logging", "still logging after a second init");

        assert!(has_log_file(&first));
        // The appender is opened before the subscriber is refused.
        assert!(has_log_file(&second));

        std::fs::remove_dir_all(&first).ok();
        std::fs::remove_dir_all(&second).ok();
    }
}
