/// Built-in hook implementations.
///
/// These extend the installation protocol without touching the scheduler.
/// Each one is registered on a `HookSet` under a fixed id, and registering
/// twice is a no-op.
use plugstack_core::{Plugin, PluginBuilder};
use serde_json::Value;
use tracing::{debug, info};

use crate::pipeline::HookSet;
use crate::types::{ExportParams, ImportParams, ProcessParams};

// ---------------------------------------------------------------------------
// Optional dependencies
// ---------------------------------------------------------------------------

/// Register id of the optional-dependency import hook.
pub const OPTIONAL_DEPENDENCIES_HOOK: &str = "optional-dependencies";

/// Plugin extension key holding the optional dependency id list.
pub const OPTIONAL_DEPENDENCIES_KEY: &str = "optional_dependencies";

/// Adds optional dependencies to plugin definitions.
///
/// Optional dependencies are not graph edges: they do not order installs.
/// The import hook copies whatever the export map holds for each id at the
/// moment the dependent plugin is about to install.
pub trait OptionalDependenciesExt {
    fn optional_dependencies<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;
}

impl OptionalDependenciesExt for PluginBuilder {
    fn optional_dependencies<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<Value> = ids.into_iter().map(|id| Value::String(id.into())).collect();
        self.extension(OPTIONAL_DEPENDENCIES_KEY, Value::Array(ids))
    }
}

/// Optional dependency ids declared by `plugin`. Non-string entries are ignored.
pub fn optional_dependency_ids(plugin: &Plugin) -> Vec<String> {
    plugin
        .extension(OPTIONAL_DEPENDENCIES_KEY)
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

/// Import hook: inject the current export of every optional dependency.
pub fn inject_optional_dependencies(params: &mut ImportParams) {
    for id in optional_dependency_ids(&params.node.plugin) {
        let value = params.exports.get(&id);
        debug!(
            plugin = %params.node.id,
            optional = %id,
            available = value.is_some(),
            "Injecting optional dependency"
        );
        params.imports.insert(id, value);
    }
}

/// Register the optional-dependency import hook on `hooks`.
pub fn register_optional_dependencies(hooks: &HookSet) {
    if hooks.imports.contains(OPTIONAL_DEPENDENCIES_HOOK) {
        return;
    }
    hooks
        .imports
        .add_register(OPTIONAL_DEPENDENCIES_HOOK, inject_optional_dependencies);
}

// ---------------------------------------------------------------------------
// Install tracing
// ---------------------------------------------------------------------------

/// Register id shared by the install-tracing hooks.
pub const INSTALL_TRACING_HOOK: &str = "install-tracing";

fn trace_export(params: &mut ExportParams) {
    info!(
        plugin = %params.node.id,
        name = %params.node.name(),
        exported = params.export.is_some(),
        "Plugin installed"
    );
}

fn trace_process(params: &mut ProcessParams) {
    debug!(child = %params.child.id, parent = %params.parent.id, "Join completed");
}

/// Log every install and every completed fan-in join.
pub fn register_install_tracing(hooks: &HookSet) {
    if !hooks.exports.contains(INSTALL_TRACING_HOOK) {
        hooks.exports.add_register(INSTALL_TRACING_HOOK, trace_export);
    }
    if !hooks.process.contains(INSTALL_TRACING_HOOK) {
        hooks.process.add_register(INSTALL_TRACING_HOOK, trace_process);
    }
}
