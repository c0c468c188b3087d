//! Deferred-resolution accessors over a populated container.
//!
//! A [`Lazy`] handle resolves its binding on first read and caches the `Arc`
//! for every read after that. Laziness is about timing only: resolution is
//! synchronous, and reading an accessor before bootstrap has bound the
//! identifier fails with the container's unbound-identifier error.

use std::sync::{Arc, OnceLock};

use crate::container::{ContainerError, Qualifier, ServiceContainer};

/// Factory for lazy accessors, bound to one fully-populated container.
///
/// Handed out by the bootstrap once binding is complete; consumers keep the
/// accessors it produces and never touch the container directly.
#[derive(Clone)]
pub struct Injector {
    container: Arc<ServiceContainer>,
}

impl Injector {
    pub fn new(container: Arc<ServiceContainer>) -> Self {
        Self { container }
    }

    /// The underlying container, for callers that need direct `get` access.
    pub fn container(&self) -> &Arc<ServiceContainer> {
        &self.container
    }

    pub fn lazy<T>(&self, id: impl Into<String>) -> Lazy<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lazy_qualified(id, Qualifier::Default)
    }

    pub fn lazy_named<T>(&self, id: impl Into<String>, name: impl Into<String>) -> Lazy<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lazy_qualified(id, Qualifier::Named(name.into()))
    }

    pub fn lazy_tagged<T>(
        &self,
        id: impl Into<String>,
        tag: impl Into<String>,
        value: impl Into<String>,
    ) -> Lazy<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lazy_qualified(id, Qualifier::Tagged(tag.into(), value.into()))
    }

    fn lazy_qualified<T>(&self, id: impl Into<String>, qualifier: Qualifier) -> Lazy<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Lazy {
            container: self.container.clone(),
            id: id.into(),
            qualifier,
            cell: OnceLock::new(),
        }
    }

    pub fn lazy_multi<T>(&self, id: impl Into<String>) -> LazyMulti<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        LazyMulti {
            container: self.container.clone(),
            id: id.into(),
            cell: OnceLock::new(),
        }
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("container", &self.container)
            .finish()
    }
}

/// A deferred handle to one binding. First `get` resolves through the
/// container; later `get`s return the cached `Arc`.
pub struct Lazy<T: ?Sized> {
    container: Arc<ServiceContainer>,
    id: String,
    qualifier: Qualifier,
    cell: OnceLock<Arc<T>>,
}

impl<T> Lazy<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    pub fn get(&self) -> Result<Arc<T>, ContainerError> {
        if let Some(v) = self.cell.get() {
            return Ok(v.clone());
        }
        let resolved = self.container.get_qualified::<T>(&self.id, &self.qualifier)?;
        Ok(self.cell.get_or_init(|| resolved).clone())
    }

    pub fn identifier(&self) -> &str {
        &self.id
    }
}

/// A deferred handle to a multi-binding group.
pub struct LazyMulti<T: ?Sized> {
    container: Arc<ServiceContainer>,
    id: String,
    cell: OnceLock<Vec<Arc<T>>>,
}

impl<T> LazyMulti<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    pub fn get(&self) -> Result<Vec<Arc<T>>, ContainerError> {
        if let Some(v) = self.cell.get() {
            return Ok(v.clone());
        }
        let resolved = self.container.get_all::<T>(&self.id)?;
        Ok(self.cell.get_or_init(|| resolved).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_bindings_added_after_accessor_creation() {
        let container = Arc::new(ServiceContainer::new());
        let injector = Injector::new(container.clone());

        // Consumer declares its dependency before the binding exists.
        let accessor: Lazy<String> = injector.lazy("greeting");
        container
            .bind_constant("greeting", Arc::new("hello".to_owned()))
            .unwrap();

        assert_eq!(*accessor.get().unwrap(), "hello");
    }

    #[test]
    fn read_before_binding_fails_with_identifier() {
        let container = Arc::new(ServiceContainer::new());
        let injector = Injector::new(container);

        let accessor: Lazy<String> = injector.lazy("greeting");
        let err = accessor.get().unwrap_err();
        assert!(matches!(err, ContainerError::Unbound { ref id, .. } if id == "greeting"));
    }

    #[test]
    fn caches_the_resolved_instance() {
        let container = Arc::new(ServiceContainer::new());
        container
            .bind_singleton::<String, _>("value", |_| Ok(Arc::new("v".to_owned())))
            .unwrap();
        let injector = Injector::new(container);

        let a: Lazy<String> = injector.lazy("value");
        let b: Lazy<String> = injector.lazy("value");
        let first = a.get().unwrap();
        let second = a.get().unwrap();
        let other = b.get().unwrap();

        // Same instance through one accessor, and across accessors for a
        // singleton binding.
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn named_and_tagged_accessors_resolve_their_variant() {
        let container = Arc::new(ServiceContainer::new());
        container
            .bind_constant_named("db", "cache", Arc::new("cache".to_owned()))
            .unwrap();
        container
            .bind_constant_tagged("db", "tier", "cold", Arc::new("cold".to_owned()))
            .unwrap();
        let injector = Injector::new(container);

        let named: Lazy<String> = injector.lazy_named("db", "cache");
        let tagged: Lazy<String> = injector.lazy_tagged("db", "tier", "cold");
        assert_eq!(*named.get().unwrap(), "cache");
        assert_eq!(*tagged.get().unwrap(), "cold");
    }

    #[test]
    fn lazy_multi_resolves_the_full_group() {
        let container = Arc::new(ServiceContainer::new());
        container.bind_multi("locale", Arc::new("en".to_owned())).unwrap();
        container.bind_multi("locale", Arc::new("fr".to_owned())).unwrap();
        let injector = Injector::new(container);

        let group: LazyMulti<String> = injector.lazy_multi("locale");
        let values = group.get().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(*values[0], "en");
        assert_eq!(*values[1], "fr");
    }
}
