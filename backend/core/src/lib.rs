//! `plugstack-core`: the types every other plugstack crate speaks.
//!
//! - [`Plugin`] / [`PluginBuilder`] / [`Install`]: plugin definitions
//! - [`Export`], [`Imports`], [`ExportMap`]: opaque values passed between plugins
//! - [`StackError`]: the error type shared by registry, graph and scheduler

pub mod error;
pub mod plugin;
pub mod value;

pub use error::StackError;
pub use plugin::{Install, Plugin, PluginBuilder};
pub use value::{downcast, export, Export, ExportMap, Imports};
