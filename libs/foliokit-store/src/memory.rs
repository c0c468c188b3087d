//! In-process storage adapter.
//!
//! Backs each logical database with a plain map behind a `parking_lot`
//! read-write lock. Nothing touches the filesystem, so data lives only for
//! the process lifetime; this is the development and test engine.

use std::{collections::HashMap, path::Path};

use parking_lot::RwLock;

use crate::{Document, DocumentStore, Result, StorageAdapter};

#[derive(Debug)]
pub struct MemoryAdapter;

impl MemoryAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageAdapter for MemoryAdapter {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn open(&self, _dir: &Path, _logical_name: &str) -> Result<Box<dyn DocumentStore>> {
        Ok(Box::new(MemoryStore::default()))
    }
}

#[derive(Default)]
struct MemoryStore {
    docs: RwLock<HashMap<String, Document>>,
}

impl DocumentStore for MemoryStore {
    fn put(&self, doc: Document) -> Result<()> {
        self.docs.write().insert(doc.id.clone(), doc);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.docs.read().get(id).cloned())
    }

    fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.docs.write().remove(id).is_some())
    }

    fn all(&self) -> Result<Vec<Document>> {
        Ok(self.docs.read().values().cloned().collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.docs.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open_store() -> Box<dyn DocumentStore> {
        MemoryAdapter::new()
            .open(Path::new("/unused"), "test")
            .unwrap()
    }

    #[test]
    fn put_get_delete_roundtrip() {
        let store = open_store();
        store
            .put(Document::new("a", json!({"title": "Dracula"})))
            .unwrap();

        let doc = store.get("a").unwrap().unwrap();
        assert_eq!(doc.body["title"], "Dracula");

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert!(store.get("a").unwrap().is_none());
    }

    #[test]
    fn put_replaces_existing_document() {
        let store = open_store();
        store.put(Document::new("a", json!(1))).unwrap();
        store.put(Document::new("a", json!(2))).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("a").unwrap().unwrap().body, json!(2));
    }

    #[test]
    fn opens_are_independent_namespaces() {
        let adapter = MemoryAdapter::new();
        let a = adapter.open(Path::new("/unused"), "a").unwrap();
        let b = adapter.open(Path::new("/unused"), "b").unwrap();

        a.put(Document::new("x", json!(true))).unwrap();
        assert!(b.get("x").unwrap().is_none());
        assert!(b.is_empty().unwrap());
    }
}
