//! Dependency graph for one build.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`], so a plugin
//! that several others depend on is a single node with several children.
//! The builder resolves each plugin's dependency ids through a node cache,
//! detects cycles while it recurses, then nests the nodes: every node is
//! linked under its parents and parentless nodes become roots.

use plugstack_core::{Export, Plugin, StackError};
use plugstack_hooks::HookNode;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::registry::PluginRegistry;

/// Index of a node within its [`DependencyGraph`].
pub type NodeId = usize;

/// One plugin within one build.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub plugin: Arc<Plugin>,
    /// In dependency declaration order.
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
    /// Set once installed.
    pub exports: Option<Export>,
    pub installed: bool,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
    roots: Vec<NodeId>,
    install_order: Vec<NodeId>,
}

impl DependencyGraph {
    /// Build the graph for every plugin in `registry`.
    ///
    /// Fails on a dependency id that is not registered and on any cycle.
    pub fn build(registry: &PluginRegistry) -> Result<Self, StackError> {
        let mut graph = Self::default();
        let mut path = Vec::new();

        let mut built = Vec::with_capacity(registry.len());
        for plugin in registry.list() {
            built.push(graph.build_node(registry, plugin, &mut path)?);
        }
        graph.nest(&built);

        info!(
            nodes = graph.nodes.len(),
            roots = graph.roots.len(),
            "[Graph] Dependency graph built"
        );
        Ok(graph)
    }

    /// `path` holds the ids whose parents are being resolved, outermost first.
    fn build_node(
        &mut self,
        registry: &PluginRegistry,
        plugin: Arc<Plugin>,
        path: &mut Vec<String>,
    ) -> Result<NodeId, StackError> {
        if let Some(&existing) = self.index.get(&plugin.id) {
            return Ok(existing);
        }
        if let Some(start) = path.iter().position(|id| *id == plugin.id) {
            let mut cycle = path[start..].to_vec();
            cycle.push(plugin.id.clone());
            return Err(StackError::CyclicDependency { cycle });
        }

        path.push(plugin.id.clone());
        let mut parents = Vec::with_capacity(plugin.dependencies.len());
        let mut fresh = Vec::new();
        for dep in &plugin.dependencies {
            let parent = match self.index.get(dep) {
                Some(&cached) => cached,
                None => {
                    let parent_plugin =
                        registry
                            .get(dep)
                            .ok_or_else(|| StackError::UnknownDependency {
                                plugin: plugin.id.clone(),
                                dependency: dep.clone(),
                            })?;
                    let built = self.build_node(registry, parent_plugin, path)?;
                    fresh.push(built);
                    built
                }
            };
            parents.push(parent);
        }
        path.pop();

        let id = self.nodes.len();
        debug!(plugin = %plugin.id, parents = parents.len(), "[Graph] Node built");
        self.index.insert(plugin.id.clone(), id);
        self.nodes.push(Node {
            id: plugin.id.clone(),
            plugin,
            parents,
            children: Vec::new(),
            exports: None,
            installed: false,
        });

        // Parents built on behalf of this node learn about it right away; cached
        // parents are linked during nesting.
        for parent in fresh {
            self.attach_child(parent, id);
        }
        Ok(id)
    }

    fn nest(&mut self, nodes: &[NodeId]) {
        let mut visited = HashSet::new();
        for &node in nodes {
            self.nest_node(node, &mut visited);
        }
    }

    fn nest_node(&mut self, node: NodeId, visited: &mut HashSet<NodeId>) {
        if !visited.insert(node) {
            return;
        }

        let parents = self.nodes[node].parents.clone();
        for &parent in &parents {
            self.nest_node(parent, visited);
            self.attach_child(parent, node);
        }

        if parents.is_empty() && !self.roots.contains(&node) {
            self.roots.push(node);
        }
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.nodes[parent].children;
        if !children.contains(&child) {
            children.push(child);
        }
    }

    pub(crate) fn mark_installed(&mut self, node: NodeId, exports: Option<Export>) {
        let entry = &mut self.nodes[node];
        entry.installed = true;
        entry.exports = exports;
        self.install_order.push(node);
    }

    /// Snapshot of a node for hook payloads.
    pub fn hook_node(&self, node: NodeId) -> HookNode {
        let entry = &self.nodes[node];
        HookNode {
            id: entry.id.clone(),
            plugin: Arc::clone(&entry.plugin),
            parents: entry.parents.iter().map(|&p| self.nodes[p].id.clone()).collect(),
            installed: entry.installed,
        }
    }

    /// True when every parent of `node` is installed (vacuously for roots).
    pub fn parents_installed(&self, node: NodeId) -> bool {
        self.nodes[node]
            .parents
            .iter()
            .all(|&parent| self.nodes[parent].installed)
    }

    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node]
    }

    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.lookup(id).map(|node| &self.nodes[node])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn root_ids(&self) -> Vec<&str> {
        self.roots.iter().map(|&r| self.nodes[r].id.as_str()).collect()
    }

    /// Plugin ids in the order they were installed.
    pub fn install_order(&self) -> Vec<&str> {
        self.install_order
            .iter()
            .map(|&n| self.nodes[n].id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `(id, "space separated dependency ids")`
    fn registry(specs: &[(&str, &str)]) -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        for (id, deps) in specs {
            let plugin = Plugin::builder(*id, *id)
                .depends_on(deps.split_whitespace())
                .install_sync(|_| Ok(None));
            registry.register(plugin).unwrap();
        }
        registry
    }

    fn child_ids<'g>(graph: &'g DependencyGraph, id: &str) -> Vec<&'g str> {
        graph
            .get(id)
            .unwrap()
            .children
            .iter()
            .map(|&c| graph.node(c).id.as_str())
            .collect()
    }

    #[test]
    fn diamond_shares_one_parent_node() {
        let graph = DependencyGraph::build(&registry(&[
            ("a", ""),
            ("b", "a"),
            ("c", "a"),
            ("d", "b c"),
        ]))
        .unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.root_ids(), vec!["a"]);
        let a = graph.lookup("a").unwrap();
        assert_eq!(graph.get("b").unwrap().parents, vec![a]);
        assert_eq!(graph.get("c").unwrap().parents, vec![a]);
        assert_eq!(child_ids(&graph, "a"), vec!["b", "c"]);
        assert_eq!(child_ids(&graph, "b"), vec!["d"]);
        assert_eq!(child_ids(&graph, "c"), vec!["d"]);
    }

    #[test]
    fn dependents_may_register_before_dependencies() {
        let graph = DependencyGraph::build(&registry(&[
            ("c", "b"),
            ("b", "a"),
            ("a", ""),
        ]))
        .unwrap();

        assert_eq!(graph.root_ids(), vec!["a"]);
        assert_eq!(child_ids(&graph, "a"), vec!["b"]);
        assert_eq!(child_ids(&graph, "b"), vec!["c"]);
    }

    #[test]
    fn roots_follow_registration_order() {
        let graph = DependencyGraph::build(&registry(&[
            ("x", "r2"),
            ("r1", ""),
            ("r2", ""),
        ]))
        .unwrap();
        assert_eq!(graph.root_ids(), vec!["r2", "r1"]);
        assert!(graph.get("r1").unwrap().is_root());
        assert!(!graph.get("x").unwrap().is_root());
    }

    #[test]
    fn children_are_not_duplicated() {
        let graph = DependencyGraph::build(&registry(&[
            ("app", ""),
            ("layout", "app"),
            ("plugin", "layout"),
            ("system", "layout"),
            ("task", "plugin layout app"),
        ]))
        .unwrap();

        assert_eq!(child_ids(&graph, "app"), vec!["layout", "task"]);
        assert_eq!(child_ids(&graph, "layout"), vec!["plugin", "system", "task"]);
        assert_eq!(child_ids(&graph, "plugin"), vec!["task"]);
    }

    #[test]
    fn unknown_dependency_fails() {
        let err = DependencyGraph::build(&registry(&[("b", "ghost")])).unwrap_err();
        assert!(matches!(
            err,
            StackError::UnknownDependency { ref plugin, ref dependency }
                if plugin == "b" && dependency == "ghost"
        ));
    }

    #[test]
    fn cycle_fails_with_path() {
        let err = DependencyGraph::build(&registry(&[
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
        ]))
        .unwrap_err();
        match err {
            StackError::CyclicDependency { cycle } => {
                assert_eq!(cycle, vec!["a", "b", "c", "a"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let err = DependencyGraph::build(&registry(&[("loop", "loop")])).unwrap_err();
        assert!(matches!(err, StackError::CyclicDependency { ref cycle } if cycle.len() == 2));
    }

    #[test]
    fn hook_node_lists_parent_ids() {
        let graph = DependencyGraph::build(&registry(&[
            ("a", ""),
            ("b", ""),
            ("c", "b a"),
        ]))
        .unwrap();
        let node = graph.hook_node(graph.lookup("c").unwrap());
        assert_eq!(node.parents, vec!["b", "a"]);
        assert!(!node.installed);
        assert!(!graph.parents_installed(graph.lookup("c").unwrap()));
        assert!(graph.parents_installed(graph.lookup("a").unwrap()));
    }
}
