//! Device identity.
//!
//! Each installation gets a stable random identifier, generated on first
//! access and persisted in the configuration database so it survives
//! restarts. Used by reading-position sync and LCP-style license workflows,
//! which are external collaborators.

use std::sync::{Arc, OnceLock};

use foliokit_store::Result;

use super::db::ConfigDb;

pub struct DeviceIdManager {
    key: String,
    config: Arc<ConfigDb>,
    cached: OnceLock<String>,
}

impl DeviceIdManager {
    /// `app_name` namespaces the identity key so several applications can
    /// share one configuration database layout convention.
    pub fn new(app_name: &str, config: Arc<ConfigDb>) -> Self {
        Self {
            key: format!("{app_name}.device-id"),
            config,
            cached: OnceLock::new(),
        }
    }

    /// The persistent device identifier, generating and storing it on first
    /// access.
    pub fn device_id(&self) -> Result<String> {
        if let Some(id) = self.cached.get() {
            return Ok(id.clone());
        }
        let id = match self.config.get::<String>(&self.key)? {
            Some(existing) => existing,
            None => {
                let fresh = uuid::Uuid::new_v4().to_string();
                self.config.put(&self.key, &fresh)?;
                fresh
            }
        };
        Ok(self.cached.get_or_init(|| id).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::db::tests::open_memory_db;

    #[test]
    fn generates_once_and_persists() {
        let config = Arc::new(ConfigDb::new(open_memory_db("config")));
        let manager = DeviceIdManager::new("folio", config.clone());

        let first = manager.device_id().unwrap();
        let second = manager.device_id().unwrap();
        assert_eq!(first, second);

        // A second manager over the same database sees the stored identity.
        let other = DeviceIdManager::new("folio", config);
        assert_eq!(other.device_id().unwrap(), first);
    }

    #[test]
    fn app_names_are_namespaced() {
        let config = Arc::new(ConfigDb::new(open_memory_db("config")));
        let a = DeviceIdManager::new("folio", config.clone());
        let b = DeviceIdManager::new("other-app", config);

        assert_ne!(a.device_id().unwrap(), b.device_id().unwrap());
    }
}
