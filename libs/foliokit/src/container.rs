//! String-keyed service container.
//!
//! Implementation details:
//! - Key = (identifier, [`Qualifier`]). Identifiers are opaque strings chosen
//!   by the bootstrap; qualifiers distinguish named/tagged variants of the
//!   same identifier.
//! - Value = `Arc<T>` stored as `Box<dyn Any + Send + Sync>` (downcast on read).
//! - Sync hot path: `get()` is non-async and takes no lock while a singleton
//!   factory runs.
//!
//! Notes:
//! - Binding an already-bound key is an error, never a silent overwrite; a
//!   silently replaced binding would make startup-order bugs invisible.
//! - Registration is expected to happen only during single-threaded bootstrap;
//!   after that the container is effectively read-only.

use parking_lot::RwLock;
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock},
};

/// Distinguishes multiple bindings registered under one identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// The plain binding for the identifier.
    Default,
    /// A binding addressed by `(identifier, name)`.
    Named(String),
    /// A binding addressed by `(identifier, tag-key, tag-value)`.
    Tagged(String, String),
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Default => Ok(()),
            Qualifier::Named(name) => write!(f, " (named '{name}')"),
            Qualifier::Tagged(key, value) => write!(f, " (tagged '{key}'='{value}')"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("duplicate binding for identifier '{id}'{qualifier}")]
    Duplicate { id: String, qualifier: Qualifier },

    #[error("no binding for identifier '{id}'{qualifier}")]
    Unbound { id: String, qualifier: Qualifier },

    #[error("binding '{id}' does not hold an Arc<{requested}>")]
    TypeMismatch { id: String, requested: &'static str },

    #[error("binding '{id}' is a multi-binding; resolve it with get_all")]
    MultiBinding { id: String },

    #[error("binding '{id}' is not a multi-binding")]
    NotMulti { id: String },
}

type Boxed = Box<dyn Any + Send + Sync>;

/// Factory for a lazily constructed singleton. Runs at most once, on the
/// first resolution of its binding, and may resolve other bindings from the
/// container it is handed.
type Factory = Arc<dyn Fn(&ServiceContainer) -> Result<Boxed, ContainerError> + Send + Sync>;

enum Slot {
    Constant(Boxed),
    Singleton {
        factory: Factory,
        cached: OnceLock<Boxed>,
    },
    Multi(Vec<Boxed>),
}

type BindingMap = HashMap<(String, Qualifier), Slot>;

/// Registry mapping stable identifiers to service bindings.
///
/// Three binding kinds exist: pre-constructed constants, singletons built by
/// a factory on first resolution, and multi-bindings (several values under
/// one identifier, resolved as a group).
pub struct ServiceContainer {
    map: RwLock<BindingMap>,
}

impl ServiceContainer {
    #[inline]
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, id: String, qualifier: Qualifier, slot: Slot) -> Result<(), ContainerError> {
        let mut w = self.map.write();
        let key = (id, qualifier);
        if w.contains_key(&key) {
            return Err(ContainerError::Duplicate {
                id: key.0,
                qualifier: key.1,
            });
        }
        w.insert(key, slot);
        Ok(())
    }

    /// Bind a pre-constructed instance under `id`.
    pub fn bind_constant<T>(&self, id: impl Into<String>, value: Arc<T>) -> Result<(), ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bind_constant_qualified(id, Qualifier::Default, value)
    }

    /// Bind a pre-constructed instance under `(id, name)`.
    pub fn bind_constant_named<T>(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        value: Arc<T>,
    ) -> Result<(), ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bind_constant_qualified(id, Qualifier::Named(name.into()), value)
    }

    /// Bind a pre-constructed instance under `(id, tag-key, tag-value)`.
    pub fn bind_constant_tagged<T>(
        &self,
        id: impl Into<String>,
        tag: impl Into<String>,
        value_tag: impl Into<String>,
        value: Arc<T>,
    ) -> Result<(), ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bind_constant_qualified(id, Qualifier::Tagged(tag.into(), value_tag.into()), value)
    }

    /// Bind a pre-constructed instance under an explicit qualifier.
    pub fn bind_constant_qualified<T>(
        &self,
        id: impl Into<String>,
        qualifier: Qualifier,
        value: Arc<T>,
    ) -> Result<(), ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.insert(id.into(), qualifier, Slot::Constant(Box::new(value)))
    }

    /// Bind a singleton factory under `id`. The factory runs on the first
    /// `get` for this binding; the result is cached for the process lifetime.
    pub fn bind_singleton<T, F>(&self, id: impl Into<String>, factory: F) -> Result<(), ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceContainer) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.bind_singleton_qualified(id, Qualifier::Default, factory)
    }

    /// Bind a singleton factory under an explicit qualifier.
    pub fn bind_singleton_qualified<T, F>(
        &self,
        id: impl Into<String>,
        qualifier: Qualifier,
        factory: F,
    ) -> Result<(), ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceContainer) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |c| factory(c).map(|arc| Box::new(arc) as Boxed));
        self.insert(
            id.into(),
            qualifier,
            Slot::Singleton {
                factory,
                cached: OnceLock::new(),
            },
        )
    }

    /// Append a value to the multi-binding group under `id`.
    ///
    /// The first call creates the group; later calls append. Mixing a group
    /// with a single-value binding under the same identifier is a duplicate.
    pub fn bind_multi<T>(&self, id: impl Into<String>, value: Arc<T>) -> Result<(), ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let id = id.into();
        let mut w = self.map.write();
        match w.entry((id.clone(), Qualifier::Default)) {
            std::collections::hash_map::Entry::Occupied(mut e) => match e.get_mut() {
                Slot::Multi(values) => {
                    values.push(Box::new(value));
                    Ok(())
                }
                _ => Err(ContainerError::Duplicate {
                    id,
                    qualifier: Qualifier::Default,
                }),
            },
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(Slot::Multi(vec![Box::new(value)]));
                Ok(())
            }
        }
    }

    /// Resolve the binding under `id`.
    pub fn get<T>(&self, id: &str) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_qualified(id, &Qualifier::Default)
    }

    /// Resolve the binding under `(id, name)`.
    pub fn get_named<T>(&self, id: &str, name: &str) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_qualified(id, &Qualifier::Named(name.to_owned()))
    }

    /// Resolve the binding under `(id, tag-key, tag-value)`.
    pub fn get_tagged<T>(&self, id: &str, tag: &str, value: &str) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_qualified(id, &Qualifier::Tagged(tag.to_owned(), value.to_owned()))
    }

    /// Resolve a binding under an explicit qualifier.
    pub fn get_qualified<T>(&self, id: &str, qualifier: &Qualifier) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = (id.to_owned(), qualifier.clone());

        // Fast path under the read lock; factories never run while it is held.
        let factory = {
            let r = self.map.read();
            match r.get(&key) {
                None => {
                    return Err(ContainerError::Unbound {
                        id: key.0,
                        qualifier: key.1,
                    });
                }
                Some(Slot::Constant(boxed)) => return downcast::<T>(id, boxed),
                Some(Slot::Multi(_)) => {
                    return Err(ContainerError::MultiBinding { id: key.0 });
                }
                Some(Slot::Singleton { factory, cached }) => {
                    if let Some(boxed) = cached.get() {
                        return downcast::<T>(id, boxed);
                    }
                    factory.clone()
                }
            }
        };

        // First resolution of a singleton: construct outside the lock so the
        // factory may resolve other bindings, then publish (first writer wins).
        let constructed = factory(self)?;
        let r = self.map.read();
        match r.get(&key) {
            Some(Slot::Singleton { cached, .. }) => {
                // First writer wins; a racer's value is dropped unused.
                downcast::<T>(id, cached.get_or_init(|| constructed))
            }
            _ => Err(ContainerError::Unbound {
                id: key.0,
                qualifier: key.1,
            }),
        }
    }

    /// Resolve the full multi-binding group under `id`.
    pub fn get_all<T>(&self, id: &str) -> Result<Vec<Arc<T>>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let r = self.map.read();
        match r.get(&(id.to_owned(), Qualifier::Default)) {
            None => Err(ContainerError::Unbound {
                id: id.to_owned(),
                qualifier: Qualifier::Default,
            }),
            Some(Slot::Multi(values)) => values
                .iter()
                .map(|boxed| downcast::<T>(id, boxed))
                .collect(),
            Some(_) => Err(ContainerError::NotMulti { id: id.to_owned() }),
        }
    }

    /// Whether any binding exists under `id` with the default qualifier.
    pub fn contains(&self, id: &str) -> bool {
        self.map
            .read()
            .contains_key(&(id.to_owned(), Qualifier::Default))
    }

    /// Introspection: total number of binding keys.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("bindings", &self.len())
            .finish()
    }
}

fn downcast<T>(id: &str, boxed: &Boxed) -> Result<Arc<T>, ContainerError>
where
    T: ?Sized + Send + Sync + 'static,
{
    boxed
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| ContainerError::TypeMismatch {
            id: id.to_owned(),
            requested: std::any::type_name::<T>(),
        })
}
