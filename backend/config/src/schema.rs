//! Typed configuration schema.
//!
//! Every field is optional on disk; `defaults::apply_all_defaults` fills the
//! gaps after loading, and the accessor methods below fall back to the same
//! defaults for configs built in code.

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_LOG_LEVEL, DEFAULT_LOG_JSON};

/// Root configuration for a plugin stack and its process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    /// Logging output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Which hook set a stack uses and which built-in hooks it starts with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<HooksConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `plugstack_plugins=debug`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
    /// Directory for daily-rotated NDJSON log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HooksConfig {
    /// Use a fresh hook set instead of the process-wide one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_dependencies: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_installs: Option<bool>,
}

impl StackConfig {
    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_json(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.json)
            .unwrap_or(DEFAULT_LOG_JSON)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn isolated_hooks(&self) -> bool {
        self.hook_flag(|h| h.isolated)
    }

    pub fn optional_dependencies(&self) -> bool {
        self.hook_flag(|h| h.optional_dependencies)
    }

    pub fn trace_installs(&self) -> bool {
        self.hook_flag(|h| h.trace_installs)
    }

    fn hook_flag(&self, get: impl Fn(&HooksConfig) -> Option<bool>) -> bool {
        self.hooks.as_ref().and_then(get).unwrap_or(false)
    }
}
