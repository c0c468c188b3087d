//! Persistent sled-backed storage adapter.
//!
//! One sled database per logical name, rooted at `dir/logical_name`. Document
//! bodies are stored as JSON bytes under the document id; sled handles
//! durability and crash recovery, so reopening the same path yields the prior
//! contents.

use std::path::Path;

use crate::{Document, DocumentStore, Result, StorageAdapter};

#[derive(Debug)]
pub struct SledAdapter;

impl SledAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SledAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageAdapter for SledAdapter {
    fn name(&self) -> &'static str {
        "sled"
    }

    fn open(&self, dir: &Path, logical_name: &str) -> Result<Box<dyn DocumentStore>> {
        let db = sled::open(dir.join(logical_name))?;
        Ok(Box::new(SledStore { db }))
    }
}

struct SledStore {
    db: sled::Db,
}

impl DocumentStore for SledStore {
    fn put(&self, doc: Document) -> Result<()> {
        let bytes = serde_json::to_vec(&doc.body)?;
        self.db.insert(doc.id.as_bytes(), bytes)?;
        self.db.flush()?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Document>> {
        match self.db.get(id.as_bytes())? {
            Some(bytes) => {
                let body: serde_json::Value = serde_json::from_slice(&bytes)?;
                Ok(Some(Document::new(id, body)))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.db.remove(id.as_bytes())?.is_some();
        if removed {
            self.db.flush()?;
        }
        Ok(removed)
    }

    fn all(&self) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        for entry in self.db.iter() {
            let (key, bytes) = entry?;
            let id = String::from_utf8_lossy(&key).into_owned();
            let body: serde_json::Value = serde_json::from_slice(&bytes)?;
            docs.push(Document::new(id, body));
        }
        Ok(docs)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.db.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_and_reopen_preserves_data() {
        let dir = tempdir().unwrap();
        let adapter = SledAdapter::new();

        {
            let store = adapter.open(dir.path(), "publications").unwrap();
            store
                .put(Document::new("pub-1", json!({"title": "Frankenstein"})))
                .unwrap();
            assert_eq!(store.len().unwrap(), 1);
        }

        // A second open against the same path sees the prior write.
        let store = adapter.open(dir.path(), "publications").unwrap();
        let doc = store.get("pub-1").unwrap().unwrap();
        assert_eq!(doc.body["title"], "Frankenstein");
    }

    #[test]
    fn logical_names_do_not_share_a_path() {
        let dir = tempdir().unwrap();
        let adapter = SledAdapter::new();

        let a = adapter.open(dir.path(), "opds").unwrap();
        let b = adapter.open(dir.path(), "config").unwrap();
        a.put(Document::new("k", json!("feed"))).unwrap();

        assert!(b.get("k").unwrap().is_none());
        assert!(dir.path().join("opds").is_dir());
        assert!(dir.path().join("config").is_dir());
    }

    #[test]
    fn delete_then_iterate() {
        let dir = tempdir().unwrap();
        let store = SledAdapter::new().open(dir.path(), "config").unwrap();

        store.put(Document::new("a", json!(1))).unwrap();
        store.put(Document::new("b", json!(2))).unwrap();
        assert!(store.delete("a").unwrap());

        let all = store.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "b");
    }
}
