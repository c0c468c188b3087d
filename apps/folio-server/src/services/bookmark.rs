//! Per-publication bookmarks persisted in the configuration database.

use std::sync::Arc;

use foliokit_store::Result;
use serde::{Deserialize, Serialize};

use super::db::ConfigDb;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Locator inside the publication (resource href + progression).
    pub locator: String,
    #[serde(default)]
    pub label: Option<String>,
}

pub struct BookmarkManager {
    config: Arc<ConfigDb>,
}

impl BookmarkManager {
    pub fn new(config: Arc<ConfigDb>) -> Self {
        Self { config }
    }

    fn key(publication_id: &str) -> String {
        format!("bookmarks.{publication_id}")
    }

    pub fn add_bookmark(&self, publication_id: &str, bookmark: Bookmark) -> Result<()> {
        let key = Self::key(publication_id);
        let mut bookmarks: Vec<Bookmark> = self.config.get(&key)?.unwrap_or_default();
        bookmarks.push(bookmark);
        self.config.put(&key, &bookmarks)
    }

    pub fn bookmarks(&self, publication_id: &str) -> Result<Vec<Bookmark>> {
        Ok(self.config.get(&Self::key(publication_id))?.unwrap_or_default())
    }

    pub fn clear_bookmarks(&self, publication_id: &str) -> Result<bool> {
        self.config.remove(&Self::key(publication_id))
    }
}
