//! Logging Infrastructure
//!
//! Structured logging with a human-readable format for development and JSON
//! for everything else. `RUST_LOG` wins over the configured level.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Emit a security-relevant event under the `security` target
#[macro_export]
macro_rules! security_log {
    ($event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            $($arg)*
        );
    };
}

/// Initialize the global subscriber
///
/// Returns the file appender guard when `log_dir` is set; the caller must
/// keep it alive for buffered lines to be flushed.
pub fn init_logger(
    log_level: &str,
    format: LogFormat,
    log_dir: Option<&str>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("pvz_server={log_level},tower_http={log_level},{log_level}"))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    let file_writer = log_dir
        .map(Path::new)
        .filter(|p| p.exists())
        .and_then(|p| p.to_str())
        .map(|dir| tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "pvz-server")));

    match (format, file_writer) {
        (LogFormat::Json, Some((writer, guard))) => {
            builder.json().with_writer(writer).init();
            Some(guard)
        }
        (LogFormat::Pretty, Some((writer, guard))) => {
            builder.with_ansi(false).with_writer(writer).init();
            Some(guard)
        }
        (LogFormat::Json, None) => {
            builder.json().init();
            None
        }
        (LogFormat::Pretty, None) => {
            builder.init();
            None
        }
    }
}
