//! Config validation with path-qualified messages.

use crate::schema::StackConfig;
use thiserror::Error;

/// Level names accepted as the bare form of a filter directive.
const KNOWN_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &StackConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_logging(config, &mut report);
    validate_hooks(config, &mut report);
    report
}

fn validate_logging(config: &StackConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };

    if let Some(level) = &logging.level {
        for directive in level.split(',').map(str::trim) {
            // `target=level` directives are checked on their level part only.
            let bare = directive.rsplit('=').next().unwrap_or(directive);
            if !KNOWN_LEVELS.contains(&bare.to_ascii_lowercase().as_str()) {
                report.error(
                    "logging.level",
                    format!("Unknown log level '{bare}' in directive '{directive}'"),
                );
            }
        }
    }

    if let Some(dir) = &logging.dir {
        if dir.trim().is_empty() {
            report.error("logging.dir", "Log directory cannot be empty");
        }
    }
}

fn validate_hooks(config: &StackConfig, report: &mut ValidationReport) {
    if config.optional_dependencies() && !config.isolated_hooks() {
        report.warn(
            "hooks.optionalDependencies",
            "Registered on the process-wide hook set; every stack in this process will inject optional dependencies",
        );
    }
}
