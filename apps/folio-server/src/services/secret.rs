//! Named secrets (feed credentials, license passphrases) persisted in the
//! configuration database under a `secret.` key prefix.

use std::sync::Arc;

use foliokit_store::Result;

use super::db::ConfigDb;

pub struct SecretManager {
    config: Arc<ConfigDb>,
}

impl SecretManager {
    pub fn new(config: Arc<ConfigDb>) -> Self {
        Self { config }
    }

    fn key(name: &str) -> String {
        format!("secret.{name}")
    }

    pub fn store_secret(&self, name: &str, value: &str) -> Result<()> {
        self.config.put(&Self::key(name), &value.to_owned())
    }

    pub fn secret(&self, name: &str) -> Result<Option<String>> {
        self.config.get(&Self::key(name))
    }

    pub fn forget_secret(&self, name: &str) -> Result<bool> {
        self.config.remove(&Self::key(name))
    }
}
