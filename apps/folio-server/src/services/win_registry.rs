//! Registry of open reader windows.
//!
//! The daemon tracks which windows the UI shell has opened so broadcast-style
//! operations (state pushes, shutdown) can address all of them. Handles are
//! issued from a process-local counter; the registry never reuses one.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

pub type WindowId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct WindowInfo {
    /// Identifier of the publication the window displays, if any. The
    /// library window carries no publication.
    pub publication_id: Option<String>,
}

#[derive(Default)]
pub struct WindowRegistry {
    next_id: AtomicU64,
    windows: RwLock<BTreeMap<WindowId, WindowInfo>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, info: WindowInfo) -> WindowId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.windows.write().insert(id, info);
        id
    }

    pub fn unregister(&self, id: WindowId) -> bool {
        self.windows.write().remove(&id).is_some()
    }

    pub fn windows(&self) -> Vec<(WindowId, WindowInfo)> {
        self.windows
            .read()
            .iter()
            .map(|(id, info)| (*id, info.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.windows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let registry = WindowRegistry::new();
        let library = registry.register(WindowInfo {
            publication_id: None,
        });
        let reader = registry.register(WindowInfo {
            publication_id: Some("pub-1".to_owned()),
        });
        assert_ne!(library, reader);

        assert!(registry.unregister(reader));
        assert!(!registry.unregister(reader));

        let reopened = registry.register(WindowInfo {
            publication_id: Some("pub-1".to_owned()),
        });
        assert_ne!(reopened, reader);
        assert_eq!(registry.len(), 2);
    }
}
