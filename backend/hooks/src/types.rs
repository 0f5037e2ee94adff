/// Hook points and the payloads handed to their callbacks.
///
/// Each payload carries a snapshot of the node being processed plus a handle
/// to the build's shared export map.
use plugstack_core::{Export, ExportMap, Imports, Plugin};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Hook points
// ---------------------------------------------------------------------------

/// The point in the installation protocol at which a register fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    /// Per node, after the import bundle is assembled and before install.
    Import,
    /// Per node, after its export is recorded.
    Export,
    /// Per child, after it was installed through the given parent.
    Process,
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookPoint::Import => "import",
            HookPoint::Export => "export",
            HookPoint::Process => "process",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Node snapshot
// ---------------------------------------------------------------------------

/// The view of a graph node given to hooks.
#[derive(Debug, Clone)]
pub struct HookNode {
    pub id: String,
    pub plugin: Arc<Plugin>,
    /// Parent plugin ids, in dependency declaration order.
    pub parents: Vec<String>,
    pub installed: bool,
}

impl HookNode {
    pub fn name(&self) -> &str {
        &self.plugin.name
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload for import hooks. Hooks may add or overwrite `imports` entries;
/// the final bundle is what the plugin's install receives.
#[derive(Debug, Clone)]
pub struct ImportParams {
    pub node: HookNode,
    pub imports: Imports,
    pub exports: ExportMap,
}

/// Payload for export hooks.
#[derive(Debug, Clone)]
pub struct ExportParams {
    pub node: HookNode,
    /// What the plugin's install returned.
    pub export: Option<Export>,
    pub exports: ExportMap,
}

/// Payload for process hooks, fired after `child` was installed from `parent`.
#[derive(Debug, Clone)]
pub struct ProcessParams {
    pub child: HookNode,
    pub parent: HookNode,
    pub exports: ExportMap,
}
