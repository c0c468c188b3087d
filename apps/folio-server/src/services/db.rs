//! Wrappers over the three logical databases.
//!
//! Each wrapper exclusively owns its [`LogicalDb`]; no two services open or
//! write the same logical database directly.

use foliokit_store::{Document, LogicalDb, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A catalog entry for one publication.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
}

/// Publication catalog database ("publications").
pub struct PublicationDb {
    db: LogicalDb,
}

impl PublicationDb {
    pub fn new(db: LogicalDb) -> Self {
        Self { db }
    }

    pub fn database_name(&self) -> &str {
        &self.db.name
    }

    pub fn put(&self, record: &PublicationRecord) -> Result<()> {
        let body = serde_json::to_value(record)?;
        self.db.store().put(Document::new(&record.identifier, body))
    }

    pub fn get(&self, identifier: &str) -> Result<Option<PublicationRecord>> {
        match self.db.store().get(identifier)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc.body)?)),
            None => Ok(None),
        }
    }

    pub fn remove(&self, identifier: &str) -> Result<bool> {
        self.db.store().delete(identifier)
    }

    pub fn all(&self) -> Result<Vec<PublicationRecord>> {
        self.db
            .store()
            .all()?
            .into_iter()
            .map(|doc| Ok(serde_json::from_value(doc.body)?))
            .collect()
    }
}

/// OPDS feed cache database ("opds"). Keyed by feed URL.
pub struct OpdsDb {
    db: LogicalDb,
}

impl OpdsDb {
    pub fn new(db: LogicalDb) -> Self {
        Self { db }
    }

    pub fn database_name(&self) -> &str {
        &self.db.name
    }

    pub fn put_feed(&self, url: &str, feed: serde_json::Value) -> Result<()> {
        self.db.store().put(Document::new(url, feed))
    }

    pub fn feed(&self, url: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.db.store().get(url)?.map(|doc| doc.body))
    }

    pub fn evict(&self, url: &str) -> Result<bool> {
        self.db.store().delete(url)
    }
}

/// Configuration database ("config"): typed key/value access for the
/// device-identity, secret and bookmark managers.
pub struct ConfigDb {
    db: LogicalDb,
}

impl ConfigDb {
    pub fn new(db: LogicalDb) -> Self {
        Self { db }
    }

    pub fn database_name(&self) -> &str {
        &self.db.name
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let body = serde_json::to_value(value)?;
        self.db.store().put(Document::new(key, body))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.db.store().get(key)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc.body)?)),
            None => Ok(None),
        }
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        self.db.store().delete(key)
    }
}
