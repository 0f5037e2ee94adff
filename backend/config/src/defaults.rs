//! Config defaults: applies default values to a parsed config.

use crate::schema::{HooksConfig, LoggingConfig, StackConfig};

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Console output is human-readable unless asked otherwise.
pub const DEFAULT_LOG_JSON: bool = false;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: StackConfig) -> StackConfig {
    let config = apply_logging_defaults(config);
    apply_hook_defaults(config)
}

fn apply_logging_defaults(mut config: StackConfig) -> StackConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(DEFAULT_LOG_JSON);
    }
    config
}

/// Hooks are opt-in; a stack starts with whatever its hook set already holds.
fn apply_hook_defaults(mut config: StackConfig) -> StackConfig {
    let hooks = config.hooks.get_or_insert_with(HooksConfig::default);
    hooks.isolated.get_or_insert(false);
    hooks.optional_dependencies.get_or_insert(false);
    hooks.trace_installs.get_or_insert(false);
    config
}
