/// Plugin registry: the flat id → plugin table a stack is built from.
///
/// Registration order is kept; the graph builder visits plugins in that order,
/// which fixes the order of root nodes.
use plugstack_core::{Plugin, StackError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<Plugin>>,
    order: Vec<String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. The first registration of an id wins.
    pub fn register(&mut self, plugin: Plugin) -> Result<(), StackError> {
        if plugin.id.trim().is_empty() {
            return Err(StackError::InvalidPlugin {
                name: plugin.name,
                reason: "plugin id cannot be empty".to_string(),
            });
        }
        if self.plugins.contains_key(&plugin.id) {
            warn!(plugin = %plugin.id, "[Plugins] Duplicate registration rejected");
            return Err(StackError::DuplicatePlugin {
                id: plugin.id,
                name: plugin.name,
            });
        }

        debug!(plugin = %plugin.id, deps = ?plugin.dependencies, "[Plugins] Registered");
        self.order.push(plugin.id.clone());
        self.plugins.insert(plugin.id.clone(), Arc::new(plugin));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<Plugin>> {
        self.plugins.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    /// Plugins in registration order.
    pub fn list(&self) -> Vec<Arc<Plugin>> {
        self.order
            .iter()
            .filter_map(|id| self.plugins.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(id: &str, name: &str) -> Plugin {
        Plugin::builder(id, name).install_sync(|_| Ok(None))
    }

    #[test]
    fn duplicate_id_is_rejected_and_first_kept() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("p1", "First")).unwrap();

        let err = registry.register(plugin("p1", "Second")).unwrap_err();
        assert!(matches!(err, StackError::DuplicatePlugin { ref name, .. } if name == "Second"));
        assert_eq!(registry.get("p1").unwrap().name, "First");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_id_is_invalid() {
        let mut registry = PluginRegistry::new();
        let err = registry.register(plugin(" ", "Blank")).unwrap_err();
        assert!(matches!(err, StackError::InvalidPlugin { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn list_follows_registration_order() {
        let mut registry = PluginRegistry::new();
        for id in ["c", "a", "b"] {
            registry.register(plugin(id, id)).unwrap();
        }
        let ids: Vec<_> = registry.list().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(registry.contains("a"));
        assert!(registry.get("zzz").is_none());
    }
}
