/// The hook set consulted by the install scheduler.
///
/// The scheduler fires:
/// 1. `imports` per node, before its install → may rewrite the import bundle
/// 2. `exports` per node, once its export is recorded
/// 3. `process` per child, after it was installed from a parent
///
/// A `HookSet` is a bundle of shared handles. Pass the same set to several
/// stacks to share extensions, or a fresh one to isolate them.
use once_cell::sync::Lazy;
use tracing::debug;

use crate::registry::Register;
use crate::types::{ExportParams, HookPoint, ImportParams, ProcessParams};

/// Process-wide hook set. Created on first use, never reset.
static GLOBAL_HOOKS: Lazy<HookSet> = Lazy::new(HookSet::new);

#[derive(Debug, Clone, Default)]
pub struct HookSet {
    pub imports: Register<ImportParams>,
    pub exports: Register<ExportParams>,
    pub process: Register<ProcessParams>,
}

impl HookSet {
    /// A new, isolated hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the process-wide hook set.
    pub fn global() -> Self {
        GLOBAL_HOOKS.clone()
    }

    pub fn size(&self, point: HookPoint) -> usize {
        match point {
            HookPoint::Import => self.imports.size(),
            HookPoint::Export => self.exports.size(),
            HookPoint::Process => self.process.size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.size() == 0 && self.exports.size() == 0 && self.process.size() == 0
    }

    pub fn fire_import(&self, params: &mut ImportParams) {
        debug!(plugin = %params.node.id, hooks = self.imports.size(), "[Hooks] import");
        self.imports.invoke(params);
    }

    pub fn fire_export(&self, params: &mut ExportParams) {
        debug!(plugin = %params.node.id, hooks = self.exports.size(), "[Hooks] export");
        self.exports.invoke(params);
    }

    pub fn fire_process(&self, params: &mut ProcessParams) {
        debug!(
            child = %params.child.id,
            parent = %params.parent.id,
            hooks = self.process.size(),
            "[Hooks] process"
        );
        self.process.invoke(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_are_isolated() {
        let a = HookSet::new();
        let b = HookSet::new();
        a.imports.add_register("only-a", |_| {});
        assert_eq!(a.size(HookPoint::Import), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn global_handles_share_registers() {
        let first = HookSet::global();
        let second = HookSet::global();
        first.process.add_register("pipeline-test-global", |_| {});
        assert!(second.process.contains("pipeline-test-global"));
        second.process.remove_register("pipeline-test-global").unwrap();
        assert!(!first.process.contains("pipeline-test-global"));
    }
}
