//! Download staging.
//!
//! Allocates unique staging paths under the temp root and mirrors each
//! download's lifecycle into the shared [`StateStore`]. The actual transfer
//! is a collaborator concern; the daemon only tracks it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::state::{DownloadStatus, StateStore};

pub struct StagedDownload {
    pub id: String,
    pub path: PathBuf,
}

pub struct Downloader {
    temp_root: PathBuf,
    state: Arc<StateStore>,
}

impl Downloader {
    pub fn new(temp_root: &Path, state: Arc<StateStore>) -> Self {
        Self {
            temp_root: temp_root.to_owned(),
            state,
        }
    }

    /// Reserves a staging directory for one download and records it as
    /// pending. Two downloads of the same URL stage separately.
    pub fn stage(&self) -> io::Result<StagedDownload> {
        let id = uuid::Uuid::new_v4().to_string();
        let path = self.temp_root.join(&id);
        fs::create_dir_all(&path)?;
        self.state.update(|s| {
            s.downloads.insert(id.clone(), DownloadStatus::Pending);
        });
        tracing::debug!(download = %id, path = %path.display(), "staged download");
        Ok(StagedDownload { id, path })
    }

    pub fn mark(&self, id: &str, status: DownloadStatus) {
        self.state.update(|s| {
            s.downloads.insert(id.to_owned(), status);
        });
    }

    /// Removes a download's staging directory and drops it from the state.
    pub fn discard(&self, download: &StagedDownload) -> io::Result<()> {
        if download.path.exists() {
            fs::remove_dir_all(&download.path)?;
        }
        self.state.update(|s| {
            s.downloads.remove(&download.id);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_paths_are_unique_and_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(StateStore::new());
        let downloader = Downloader::new(dir.path(), state.clone());

        let a = downloader.stage().unwrap();
        let b = downloader.stage().unwrap();
        assert_ne!(a.path, b.path);
        assert!(a.path.is_dir());

        let snapshot = state.snapshot();
        assert_eq!(snapshot.downloads[&a.id], DownloadStatus::Pending);
        assert_eq!(snapshot.downloads.len(), 2);

        downloader.mark(&a.id, DownloadStatus::Done);
        assert_eq!(state.snapshot().downloads[&a.id], DownloadStatus::Done);

        downloader.discard(&b).unwrap();
        assert!(!b.path.exists());
        assert!(!state.snapshot().downloads.contains_key(&b.id));
    }
}
