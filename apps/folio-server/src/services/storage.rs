//! On-disk publication storage.
//!
//! Each publication owns one directory under the publication storage root,
//! named by its identifier (percent-style escaped so identifiers with path
//! separators stay inside the root).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct PublicationStorage {
    root: PathBuf,
}

impl PublicationStorage {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_owned(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn escape(identifier: &str) -> String {
        identifier
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                other => other,
            })
            .collect()
    }

    pub fn dir_for(&self, identifier: &str) -> PathBuf {
        self.root.join(Self::escape(identifier))
    }

    pub fn ensure(&self, identifier: &str) -> io::Result<PathBuf> {
        let dir = self.dir_for(identifier);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Deletes a publication's directory. Returns whether anything existed.
    pub fn remove(&self, identifier: &str) -> io::Result<bool> {
        let dir = self.dir_for(identifier);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_stay_under_the_root() {
        let root = tempfile::tempdir().unwrap();
        let storage = PublicationStorage::new(root.path());

        let dir = storage.ensure("urn:isbn:9780141439846").unwrap();
        assert!(dir.starts_with(root.path()));
        assert!(dir.is_dir());
        // The urn's colons must not become path components.
        assert_eq!(dir.parent().unwrap(), root.path());

        assert!(storage.remove("urn:isbn:9780141439846").unwrap());
        assert!(!storage.remove("urn:isbn:9780141439846").unwrap());
    }

    #[test]
    fn ensure_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let storage = PublicationStorage::new(root.path());
        let first = storage.ensure("pub-1").unwrap();
        let second = storage.ensure("pub-1").unwrap();
        assert_eq!(first, second);
    }
}
