//! Logging Infrastructure
//!
//! Console logging with optional daily rotating file output.
//! `RUST_LOG` takes precedence over the configured level.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Filter used when neither `RUST_LOG` nor a level is given
pub const DEFAULT_FILTER: &str = "product_editor=info,catalog_client=info";

/// Build the filter directive for a plain level such as `debug`
///
/// A value that already contains directives (`=` or `,`) is used as is.
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return DEFAULT_FILTER.to_string();
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("product_editor={level},catalog_client={level},catalog_admin={level}")
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)))
}

/// Initialize console logging only
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    init_logger_with_file(level, false, None)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level or filter directives (e.g., "info", "debug")
/// * `json_format` - JSON console output instead of the pretty format
/// * `log_dir` - Optional directory for daily rotating `admin.*` log files
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let file_layer = match log_dir {
        Some(dir) => {
            let log_dir = Path::new(dir);
            fs::create_dir_all(log_dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "admin");
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::sync::Mutex::new(appender))
                    .with_filter(env_filter(level)),
            )
        }
        None => None,
    };

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(env_filter(level))
            .boxed()
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(""), DEFAULT_FILTER);
        assert_eq!(
            filter_directive("debug"),
            "product_editor=debug,catalog_client=debug,catalog_admin=debug"
        );
        assert_eq!(filter_directive("warn,hyper=off"), "warn,hyper=off");
    }

    #[test]
    fn test_init_twice_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs");
        let first = init_logger_with_file("info", false, path.to_str());
        assert!(first.is_ok());
        assert!(path.exists());
        assert!(init_logger("info").is_err());
    }
}
