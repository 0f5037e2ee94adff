pub mod builtin;
pub mod graph;
pub mod registry;
pub mod scheduler;
pub mod stack;

pub use builtin::{
    CORE_PLUGIN_ID, CoreApi, OPTIONAL_DEPENDENCIES_PLUGIN_ID, core_plugin,
    optional_dependencies_plugin,
};
pub use graph::{DependencyGraph, Node, NodeId};
pub use registry::PluginRegistry;
pub use scheduler::InstallScheduler;
pub use stack::Stack;
