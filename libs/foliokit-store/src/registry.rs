//! Adapter registry and process-wide activation.
//!
//! The set of adapters is fixed at build time: cargo features decide which
//! engines are compiled in, and one configuration value selects among them at
//! startup. Activation is exactly-once per process: re-activating the same
//! name is a no-op, activating a different name after one is active is an
//! error rather than a silent re-registration.

use std::sync::{Arc, OnceLock};

use crate::{memory::MemoryAdapter, StorageAdapter, StoreError};

static ACTIVE_ADAPTER: OnceLock<String> = OnceLock::new();

/// Record `name` as the process-wide active adapter.
///
/// # Errors
/// Returns `StoreError::AdapterAlreadyActive` if a different adapter has
/// already been activated in this process.
pub fn activate_adapter(name: &str) -> crate::Result<()> {
    let active = ACTIVE_ADAPTER.get_or_init(|| name.to_owned());
    if active == name {
        tracing::debug!(adapter = name, "storage adapter active");
        Ok(())
    } else {
        Err(StoreError::AdapterAlreadyActive {
            active: active.clone(),
            requested: name.to_owned(),
        })
    }
}

/// The name of the active adapter, if one has been activated.
pub fn active_adapter() -> Option<&'static str> {
    ACTIVE_ADAPTER.get().map(String::as_str)
}

/// Registry of compiled-in storage adapters, keyed by name.
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn StorageAdapter>>,
}

impl AdapterRegistry {
    /// Registry holding every adapter compiled into this binary.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut adapters: Vec<Arc<dyn StorageAdapter>> = vec![Arc::new(MemoryAdapter::new())];
        #[cfg(feature = "sled")]
        adapters.push(Arc::new(crate::sled_store::SledAdapter::new()));
        Self { adapters }
    }

    /// An empty registry, for callers that register their own adapters.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Add an adapter. Later registrations do not shadow earlier ones;
    /// `select` resolves first match by name.
    pub fn register(&mut self, adapter: Arc<dyn StorageAdapter>) {
        self.adapters.push(adapter);
    }

    /// Names of all registered adapters.
    pub fn available(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Resolve an adapter by name.
    ///
    /// # Errors
    /// Returns `StoreError::UnknownAdapter` naming the request and the
    /// compiled-in alternatives.
    pub fn select(&self, name: &str) -> crate::Result<Arc<dyn StorageAdapter>> {
        self.adapters
            .iter()
            .find(|a| a.name() == name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownAdapter {
                requested: name.to_owned(),
                available: self.available(),
            })
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
