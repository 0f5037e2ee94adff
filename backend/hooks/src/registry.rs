/// Extension registry: an ordered multicast list of named callbacks.
///
/// Callbacks run synchronously, in registration order, against one shared
/// mutable params value. Clones of a `Register` share the same list, so a
/// register handed to a plugin can be extended from inside its install step.
use parking_lot::RwLock;
use plugstack_core::StackError;
use std::sync::Arc;
use tracing::debug;

type Callback<P> = Arc<dyn Fn(&mut P) + Send + Sync>;

struct Entry<P> {
    id: String,
    callback: Callback<P>,
}

pub struct Register<P> {
    entries: Arc<RwLock<Vec<Entry<P>>>>,
}

impl<P> Register<P> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append a callback. Ids need not be unique.
    pub fn add_register(&self, id: impl Into<String>, callback: impl Fn(&mut P) + Send + Sync + 'static) {
        let id = id.into();
        debug!(register = %id, "Register added");
        self.entries.write().push(Entry {
            id,
            callback: Arc::new(callback),
        });
    }

    /// Remove the first callback registered under `id`.
    pub fn remove_register(&self, id: &str) -> Result<(), StackError> {
        let mut entries = self.entries.write();
        let Some(index) = entries.iter().position(|e| e.id == id) else {
            return Err(StackError::UnknownRegister(id.to_string()));
        };
        entries.remove(index);
        debug!(register = %id, "Register removed");
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.entries.read().len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().iter().any(|e| e.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.read().iter().map(|e| e.id.clone()).collect()
    }

    /// Call every callback with `params`.
    ///
    /// The list is snapshotted first: callbacks added or removed while the
    /// pass runs take effect on the next `invoke`.
    pub fn invoke(&self, params: &mut P) {
        let snapshot: Vec<(String, Callback<P>)> = self
            .entries
            .read()
            .iter()
            .map(|e| (e.id.clone(), Arc::clone(&e.callback)))
            .collect();

        for (id, callback) in snapshot {
            debug!(register = %id, "Invoking register");
            callback(params);
        }
    }
}

impl<P> Clone for Register<P> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<P> Default for Register<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for Register<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Register").field("ids", &self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invokes_in_registration_order() {
        let register: Register<Vec<&'static str>> = Register::new();
        register.add_register("first", |log| log.push("first"));
        register.add_register("second", |log| log.push("second"));

        let mut log = Vec::new();
        register.invoke(&mut log);
        assert_eq!(log, vec!["first", "second"]);
        assert_eq!(register.size(), 2);
    }

    #[test]
    fn callbacks_see_earlier_mutations() {
        let register: Register<u32> = Register::new();
        register.add_register("add", |n| *n += 1);
        register.add_register("double", |n| *n *= 2);

        let mut n = 1;
        register.invoke(&mut n);
        assert_eq!(n, 4);
    }

    #[test]
    fn remove_drops_first_match_only() {
        let register: Register<Vec<u8>> = Register::new();
        register.add_register("dup", |v| v.push(1));
        register.add_register("dup", |v| v.push(2));

        register.remove_register("dup").unwrap();
        assert_eq!(register.size(), 1);

        let mut v = Vec::new();
        register.invoke(&mut v);
        assert_eq!(v, vec![2]);
    }

    #[test]
    fn remove_unknown_id_fails() {
        let register: Register<()> = Register::new();
        let err = register.remove_register("ghost").unwrap_err();
        assert!(matches!(err, StackError::UnknownRegister(id) if id == "ghost"));
    }

    #[test]
    fn removal_during_invoke_does_not_affect_current_pass() {
        let register: Register<Vec<&'static str>> = Register::new();
        let handle = register.clone();
        register.add_register("remover", move |log| {
            log.push("remover");
            let _ = handle.remove_register("victim");
        });
        register.add_register("victim", |log| log.push("victim"));

        let mut log = Vec::new();
        register.invoke(&mut log);
        assert_eq!(log, vec!["remover", "victim"]);

        let mut log = Vec::new();
        register.invoke(&mut log);
        assert_eq!(log, vec!["remover"]);
    }

    #[test]
    fn clones_share_the_list() {
        let register: Register<()> = Register::new();
        let clone = register.clone();
        clone.add_register("x", |_| {});
        assert!(register.contains("x"));
        assert_eq!(register.ids(), vec!["x".to_string()]);
    }
}
