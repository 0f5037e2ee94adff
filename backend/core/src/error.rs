use thiserror::Error;

/// Top-level error type for building a plugin stack.
///
/// Every variant is fatal to the `build` call that produced it.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("the '{name}' plugin has already been registered (id '{id}')")]
    DuplicatePlugin { id: String, name: String },

    #[error("invalid plugin '{name}': {reason}")]
    InvalidPlugin { name: String, reason: String },

    #[error("plugin '{plugin}' depends on unregistered plugin '{dependency}'")]
    UnknownDependency { plugin: String, dependency: String },

    #[error("cyclic dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("an error occurred while installing the '{name}' plugin: {source:#}")]
    InstallFailed {
        id: String,
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("an export has already been recorded for the '{0}' plugin")]
    DuplicateExport(String),

    #[error("no register registered with id '{0}'")]
    UnknownRegister(String),

    #[error("import '{id}' is unavailable as {expected}")]
    ImportUnavailable { id: String, expected: &'static str },
}

impl StackError {
    /// Id of the plugin the error is about, when there is exactly one.
    pub fn plugin_id(&self) -> Option<&str> {
        match self {
            StackError::DuplicatePlugin { id, .. } => Some(id),
            StackError::UnknownDependency { plugin, .. } => Some(plugin),
            StackError::InstallFailed { id, .. } => Some(id),
            StackError::DuplicateExport(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = StackError::CyclicDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "cyclic dependency: a -> b -> a");
    }

    #[test]
    fn install_failure_keeps_source() {
        let err = StackError::InstallFailed {
            id: "p1".into(),
            name: "P1".into(),
            source: anyhow::anyhow!("boom"),
        };
        assert!(err.to_string().contains("'P1'"));
        assert!(err.to_string().ends_with("boom"));
        assert_eq!(err.plugin_id(), Some("p1"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
