//! In-memory application state shared between services.
//!
//! The state is a plain value behind a `parking_lot` lock: readers take a
//! snapshot, writers mutate through a closure. Nothing here is persisted;
//! persistent data belongs to the logical databases.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    Pending,
    InProgress,
    Done,
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Active and recently finished downloads, keyed by download id.
    #[serde(default)]
    pub downloads: HashMap<String, DownloadStatus>,
}

#[derive(Debug, Default)]
pub struct StateStore {
    state: RwLock<AppState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AppState {
        self.state.read().clone()
    }

    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut AppState),
    {
        mutate(&mut self.state.write());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let store = StateStore::new();
        store.update(|s| {
            s.downloads
                .insert("dl-1".to_owned(), DownloadStatus::Pending);
        });

        let before = store.snapshot();
        store.update(|s| {
            s.downloads
                .insert("dl-1".to_owned(), DownloadStatus::Done);
        });

        assert_eq!(before.downloads["dl-1"], DownloadStatus::Pending);
        assert_eq!(store.snapshot().downloads["dl-1"], DownloadStatus::Done);
    }
}
