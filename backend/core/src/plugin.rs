//! Plugin definitions.
//!
//! A plugin is a plain record: an id, a display name, the ids it depends on,
//! and an installer. Nothing else is needed to author one; the engine derives
//! install order from `dependencies` alone.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::value::{Export, Imports};

/// The install step of a plugin.
///
/// Receives the exports of the plugin's dependencies and returns the plugin's
/// own export, or `None` when it has nothing to share.
#[async_trait]
pub trait Install: Send + Sync {
    async fn install(&self, imports: Imports) -> Result<Option<Export>>;
}

struct AsyncFnInstaller<F>(F);

#[async_trait]
impl<F, Fut> Install for AsyncFnInstaller<F>
where
    F: Fn(Imports) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Export>>> + Send + 'static,
{
    async fn install(&self, imports: Imports) -> Result<Option<Export>> {
        (self.0)(imports).await
    }
}

struct SyncFnInstaller<F>(F);

#[async_trait]
impl<F> Install for SyncFnInstaller<F>
where
    F: Fn(Imports) -> Result<Option<Export>> + Send + Sync + 'static,
{
    async fn install(&self, imports: Imports) -> Result<Option<Export>> {
        (self.0)(imports)
    }
}

/// An immutable plugin definition.
#[derive(Clone)]
pub struct Plugin {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Ids of the plugins whose exports this plugin imports, in order.
    pub dependencies: Vec<String>,
    /// Free-form fields read by extension hooks (not graph edges).
    pub extensions: Map<String, Value>,
    installer: Arc<dyn Install>,
}

impl Plugin {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        dependencies: Vec<String>,
        installer: Arc<dyn Install>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            dependencies,
            extensions: Map::new(),
            installer,
        }
    }

    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> PluginBuilder {
        PluginBuilder {
            id: id.into(),
            name: name.into(),
            description: None,
            dependencies: Vec::new(),
            extensions: Map::new(),
        }
    }

    /// Run the installer.
    pub async fn install(&self, imports: Imports) -> Result<Option<Export>> {
        self.installer.install(imports).await
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Plugin`]; finish with [`install`](PluginBuilder::install),
/// [`install_sync`](PluginBuilder::install_sync) or
/// [`installer`](PluginBuilder::installer).
#[derive(Debug, Clone)]
pub struct PluginBuilder {
    id: String,
    name: String,
    description: Option<String>,
    dependencies: Vec<String>,
    extensions: Map<String, Value>,
}

impl PluginBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn depends_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn installer(self, installer: Arc<dyn Install>) -> Plugin {
        Plugin {
            id: self.id,
            name: self.name,
            description: self.description,
            dependencies: self.dependencies,
            extensions: self.extensions,
            installer,
        }
    }

    /// Finish with an async install closure.
    pub fn install<F, Fut>(self, f: F) -> Plugin
    where
        F: Fn(Imports) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Export>>> + Send + 'static,
    {
        self.installer(Arc::new(AsyncFnInstaller(f)))
    }

    /// Finish with a synchronous install closure.
    pub fn install_sync<F>(self, f: F) -> Plugin
    where
        F: Fn(Imports) -> Result<Option<Export>> + Send + Sync + 'static,
    {
        self.installer(Arc::new(SyncFnInstaller(f)))
    }
}
