pub mod builtin;
pub mod pipeline;
pub mod registry;
pub mod types;

pub use builtin::{
    OptionalDependenciesExt, inject_optional_dependencies, optional_dependency_ids,
    register_install_tracing, register_optional_dependencies,
};
pub use pipeline::HookSet;
pub use registry::Register;
pub use types::{ExportParams, HookNode, HookPoint, ImportParams, ProcessParams};
