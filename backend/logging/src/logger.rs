//! Structured Logger
//!
//! Wraps `tracing-subscriber` with environment-based level control, an
//! optional JSON console format and an optional rolling NDJSON file.

use plugstack_config::StackConfig;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix of the rolling log files.
const LOG_FILE_PREFIX: &str = "plugstack.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            dir: None,
        }
    }
}

impl From<&StackConfig> for LogSettings {
    fn from(config: &StackConfig) -> Self {
        Self {
            level: config.log_level().to_string(),
            json: config.log_json(),
            dir: config.log_dir().map(PathBuf::from),
        }
    }
}

/// Initialize the global subscriber.
///
/// Returns `false` when a global subscriber was already installed; the
/// existing one is kept.
pub fn init_logger(settings: &LogSettings) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let console_layer = if settings.json {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    // NDJSON file: `<dir>/plugstack.log.YYYY-MM-DD`
    let file_layer = settings.dir.as_ref().map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer().json().with_writer(appender).with_ansi(false)
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(
            level = %settings.level,
            json = settings.json,
            file = settings.dir.is_some(),
            "[Logging] Logger initialized"
        );
    }
    installed
}

/// Initialize logging from a loaded config.
pub fn init_from_config(config: &StackConfig) -> bool {
    init_logger(&LogSettings::from(config))
}
