//! Install scheduler: one sequential depth-first pass over the graph.
//!
//! Each node is installed once all of its parents are. After a node installs,
//! its children are visited in order; a child with a parent still pending is
//! skipped and gets installed later from whichever parent completes the join.
//! Nothing runs concurrently, so the check-then-recurse join needs no locking.

use plugstack_core::{ExportMap, Imports, StackError};
use plugstack_hooks::{ExportParams, HookSet, ImportParams, ProcessParams};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error};

use crate::graph::{DependencyGraph, NodeId};

type InstallFuture<'g> = Pin<Box<dyn Future<Output = Result<(), StackError>> + Send + 'g>>;

pub struct InstallScheduler<'a> {
    hooks: &'a HookSet,
    exports: &'a ExportMap,
}

impl<'a> InstallScheduler<'a> {
    pub fn new(hooks: &'a HookSet, exports: &'a ExportMap) -> Self {
        Self { hooks, exports }
    }

    /// Install every node reachable from the graph's roots, in root order.
    pub async fn run(&self, graph: &mut DependencyGraph) -> Result<(), StackError> {
        let roots = graph.roots().to_vec();
        for root in roots {
            if graph.node(root).installed {
                continue;
            }
            self.install(graph, root).await?;
        }
        Ok(())
    }

    /// Gather imports for `node`, let the import hooks adjust them.
    fn imports_for(&self, graph: &DependencyGraph, node: NodeId) -> Imports {
        let mut imports = Imports::new();
        for dep in &graph.node(node).plugin.dependencies {
            imports.insert(dep.clone(), self.exports.get(dep));
        }

        let mut params = ImportParams {
            node: graph.hook_node(node),
            imports,
            exports: self.exports.clone(),
        };
        self.hooks.fire_import(&mut params);
        params.imports
    }

    fn install<'g>(&'g self, graph: &'g mut DependencyGraph, node: NodeId) -> InstallFuture<'g> {
        Box::pin(async move {
            let plugin = Arc::clone(&graph.node(node).plugin);
            let imports = self.imports_for(graph, node);

            debug!(plugin = %plugin.id, imports = imports.len(), "[Stack] Installing");
            let export = plugin.install(imports).await.map_err(|source| {
                error!(plugin = %plugin.id, error = %source, "[Stack] Install failed");
                StackError::InstallFailed {
                    id: plugin.id.clone(),
                    name: plugin.name.clone(),
                    source,
                }
            })?;

            graph.mark_installed(node, export.clone());
            self.exports.insert(plugin.id.clone(), export.clone())?;

            let mut params = ExportParams {
                node: graph.hook_node(node),
                export,
                exports: self.exports.clone(),
            };
            self.hooks.fire_export(&mut params);

            let children = graph.node(node).children.clone();
            for child in children {
                if graph.node(child).installed {
                    continue;
                }
                if !graph.parents_installed(child) {
                    debug!(
                        plugin = %graph.node(child).id,
                        via = %plugin.id,
                        "[Stack] Parents pending; deferring"
                    );
                    continue;
                }

                self.install(graph, child).await?;

                let mut params = ProcessParams {
                    child: graph.hook_node(child),
                    parent: graph.hook_node(node),
                    exports: self.exports.clone(),
                };
                self.hooks.fire_process(&mut params);
            }

            Ok(())
        })
    }
}
