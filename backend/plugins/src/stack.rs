//! The plugin stack: register plugins, build once, query exports by id.

use plugstack_config::StackConfig;
use plugstack_core::{Export, ExportMap, Plugin, StackError};
use plugstack_hooks::{HookSet, register_install_tracing, register_optional_dependencies};
use std::any::Any;
use std::sync::Arc;
use tracing::info;

use crate::builtin::core_plugin;
use crate::graph::DependencyGraph;
use crate::registry::PluginRegistry;
use crate::scheduler::InstallScheduler;

pub struct Stack {
    registry: PluginRegistry,
    hooks: HookSet,
    exports: Option<ExportMap>,
}

impl Stack {
    /// A stack wired to the process-wide hook set.
    pub fn new() -> Self {
        Self::with_hooks(HookSet::global())
    }

    /// A stack wired to `hooks`. Share a set between stacks to share extensions.
    pub fn with_hooks(hooks: HookSet) -> Self {
        Self {
            registry: PluginRegistry::new(),
            hooks,
            exports: None,
        }
    }

    /// A stack whose hook set and built-in hooks follow `config`.
    pub fn from_config(config: &StackConfig) -> Self {
        let hooks = if config.isolated_hooks() {
            HookSet::new()
        } else {
            HookSet::global()
        };
        if config.optional_dependencies() {
            register_optional_dependencies(&hooks);
        }
        if config.trace_installs() {
            register_install_tracing(&hooks);
        }
        Self::with_hooks(hooks)
    }

    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    pub fn register(&mut self, plugin: Plugin) -> Result<(), StackError> {
        self.registry.register(plugin)
    }

    /// Register the `core` plugin, exporting this stack's hook set.
    pub fn register_core(&mut self) -> Result<(), StackError> {
        self.register(core_plugin(self.hooks.clone()))
    }

    pub fn get_plugin(&self, id: &str) -> Option<Arc<Plugin>> {
        self.registry.get(id)
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Resolve the graph and install every plugin once.
    ///
    /// Each call starts from a fresh export map and re-runs every install. The
    /// map is attached to the stack before anything installs, so after a failed
    /// build it holds whatever was recorded before the failure.
    pub async fn build(&mut self) -> Result<DependencyGraph, StackError> {
        let exports = ExportMap::new();
        self.exports = Some(exports.clone());

        let mut graph = DependencyGraph::build(&self.registry)?;
        info!(
            plugins = graph.len(),
            roots = ?graph.root_ids(),
            "[Stack] Building"
        );

        InstallScheduler::new(&self.hooks, &exports)
            .run(&mut graph)
            .await?;

        info!(installed = graph.install_order().len(), "[Stack] Build complete");
        Ok(graph)
    }

    /// The export recorded for `id` by the latest build.
    pub fn get_exports(&self, id: &str) -> Option<Export> {
        self.exports.as_ref().and_then(|map| map.get(id))
    }

    pub fn get_exports_as<T: Any + Send + Sync>(&self, id: &str) -> Option<Arc<T>> {
        self.exports.as_ref().and_then(|map| map.get_as(id))
    }

    pub fn export_map(&self) -> Option<&ExportMap> {
        self.exports.as_ref()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
