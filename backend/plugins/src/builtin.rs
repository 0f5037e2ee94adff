//! Built-in plugins.
//!
//! `core` hands the stack's hook set to other plugins, so extensions can be
//! installed as plugins themselves. `optional-dependencies` is one such
//! extension.

use plugstack_core::{Plugin, export};
use plugstack_hooks::{HookSet, register_optional_dependencies};
use tracing::info;

pub const CORE_PLUGIN_ID: &str = "core";
pub const OPTIONAL_DEPENDENCIES_PLUGIN_ID: &str = "optional-dependencies";

/// Export of the `core` plugin.
#[derive(Debug, Clone)]
pub struct CoreApi {
    pub hooks: HookSet,
}

pub fn core_plugin(hooks: HookSet) -> Plugin {
    Plugin::builder(CORE_PLUGIN_ID, "Core")
        .description("Exposes the stack's hook registers")
        .install_sync(move |_| {
            Ok(export(CoreApi {
                hooks: hooks.clone(),
            }))
        })
}

/// Registers the optional-dependency import hook on the hooks exported by `core`.
pub fn optional_dependencies_plugin() -> Plugin {
    Plugin::builder(OPTIONAL_DEPENDENCIES_PLUGIN_ID, "Optional Dependencies")
        .description("Injects exports of optional dependencies into imports")
        .depends_on([CORE_PLUGIN_ID])
        .install_sync(|imports| {
            let core = imports.require::<CoreApi>(CORE_PLUGIN_ID)?;
            register_optional_dependencies(&core.hooks);
            info!("[Plugins] Optional dependencies enabled");
            Ok(None)
        })
}
