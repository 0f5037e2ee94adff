//! Opaque export values and the two maps they travel through.
//!
//! A plugin's `install` returns an [`Export`], an untyped shared value. The
//! engine never looks inside it: [`Imports`] and [`ExportMap`] only move the
//! `Arc` around, and each plugin recovers its concrete type with `downcast`.

use parking_lot::RwLock;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::StackError;

/// A value exported by an installed plugin.
pub type Export = Arc<dyn Any + Send + Sync>;

/// Wrap a concrete value as a plugin export.
pub fn export<T: Any + Send + Sync>(value: T) -> Option<Export> {
    Some(Arc::new(value))
}

/// Downcast an export to `T`. `None` if the export is absent or of another type.
pub fn downcast<T: Any + Send + Sync>(value: Option<Export>) -> Option<Arc<T>> {
    value.and_then(|v| v.downcast::<T>().ok())
}

// ---------------------------------------------------------------------------
// Imports
// ---------------------------------------------------------------------------

/// The import bundle handed to a plugin's `install`.
///
/// Keys are dependency ids; a `None` value means the dependency had no
/// recorded export when the bundle was assembled.
#[derive(Clone, Default)]
pub struct Imports {
    entries: HashMap<String, Option<Export>>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite the entry for `id`.
    pub fn insert(&mut self, id: impl Into<String>, value: Option<Export>) {
        self.entries.insert(id.into(), value);
    }

    /// Whether `id` has an entry, even an empty one.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// The raw export for `id`, if any.
    pub fn raw(&self, id: &str) -> Option<Export> {
        self.entries.get(id).cloned().flatten()
    }

    /// The export for `id` downcast to `T`.
    pub fn get<T: Any + Send + Sync>(&self, id: &str) -> Option<Arc<T>> {
        downcast(self.raw(id))
    }

    /// Like [`Imports::get`] but fails when the value is missing or mistyped.
    pub fn require<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>, StackError> {
        self.get(id).ok_or_else(|| StackError::ImportUnavailable {
            id: id.to_string(),
            expected: type_name::<T>(),
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Imports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.entries.iter().map(|(k, v)| (k, v.is_some())).collect();
        ids.sort();
        f.debug_struct("Imports").field("entries", &ids).finish()
    }
}

// ---------------------------------------------------------------------------
// Export map
// ---------------------------------------------------------------------------

/// Write-once table of plugin exports for one build.
///
/// Cloning yields another handle to the same table; hooks and the stack that
/// owns the build all see the same entries.
#[derive(Clone, Default)]
pub struct ExportMap {
    inner: Arc<RwLock<HashMap<String, Option<Export>>>>,
}

impl ExportMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the export for `id`. An id can be recorded once per build,
    /// including when the plugin exported nothing.
    pub fn insert(&self, id: impl Into<String>, value: Option<Export>) -> Result<(), StackError> {
        let id = id.into();
        let mut map = self.inner.write();
        if map.contains_key(&id) {
            return Err(StackError::DuplicateExport(id));
        }
        debug!(plugin = %id, has_value = value.is_some(), "Export recorded");
        map.insert(id, value);
        Ok(())
    }

    /// The export recorded for `id`. `None` when not yet installed or when the
    /// plugin exported nothing.
    pub fn get(&self, id: &str) -> Option<Export> {
        self.inner.read().get(id).cloned().flatten()
    }

    pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> Option<Arc<T>> {
        downcast(self.get(id))
    }

    /// Whether an entry (possibly empty) was recorded for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// True when both handles point at the same table.
    pub fn same_map(&self, other: &ExportMap) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ExportMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids = self.ids();
        ids.sort();
        f.debug_struct("ExportMap").field("ids", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_map_is_write_once() {
        let map = ExportMap::new();
        map.insert("a", export(1u32)).unwrap();
        let err = map.insert("a", export(2u32)).unwrap_err();
        assert!(matches!(err, StackError::DuplicateExport(id) if id == "a"));
        assert_eq!(*map.get_as::<u32>("a").unwrap(), 1);
    }

    #[test]
    fn empty_export_still_counts_as_recorded() {
        let map = ExportMap::new();
        map.insert("a", None).unwrap();
        assert!(map.contains("a"));
        assert!(map.get("a").is_none());
        assert!(map.insert("a", export("late")).is_err());
    }

    #[test]
    fn unknown_id_reads_as_none() {
        let map = ExportMap::new();
        assert!(map.get("missing").is_none());
        assert!(!map.contains("missing"));
    }

    #[test]
    fn clones_share_entries() {
        let map = ExportMap::new();
        let other = map.clone();
        other.insert("b", export("B")).unwrap();
        assert_eq!(*map.get_as::<&str>("b").unwrap(), "B");
        assert!(map.same_map(&other));
        assert!(!map.same_map(&ExportMap::new()));
    }

    #[test]
    fn imports_downcast_at_the_boundary() {
        let mut imports = Imports::new();
        imports.insert("n", export(7i64));
        imports.insert("absent", None);

        assert_eq!(*imports.get::<i64>("n").unwrap(), 7);
        assert!(imports.get::<String>("n").is_none());
        assert!(imports.contains("absent"));
        assert!(imports.raw("absent").is_none());

        let err = imports.require::<String>("n").unwrap_err();
        assert!(matches!(err, StackError::ImportUnavailable { ref id, .. } if id == "n"));
    }
}
