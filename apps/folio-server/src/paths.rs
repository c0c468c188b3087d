//! Application directory layout and provisioning.
//!
//! Every path referenced by a downstream component must exist on disk before
//! that component is constructed, so provisioning runs first during bootstrap
//! and in dependency order: user-data root, database root, publication
//! storage root. Provisioning is idempotent; a restart against an existing
//! layout is a no-op.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum PathsError {
    #[error("no user-data directory available on this host")]
    UserDataRootUnavailable,

    #[error("failed to create directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Idempotent directory creation: existing directories are a no-op.
pub fn ensure_dir(path: &Path) -> Result<(), PathsError> {
    std::fs::create_dir_all(path).map_err(|source| PathsError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// The on-disk layout of the daemon, derived once at startup.
#[derive(Clone, Debug)]
pub struct AppPaths {
    /// Host-supplied root for all persistent application data.
    pub user_data_root: PathBuf,
    /// `user_data_root/db` or `user_data_root/db-dev` depending on build mode.
    pub database_root: PathBuf,
    /// `user_data_root/publications`, raw publication file storage.
    pub publication_storage_root: PathBuf,
    /// Host temp directory for transient download staging.
    pub temp_root: PathBuf,
}

impl AppPaths {
    /// Derive the layout from configuration and its effective build mode.
    pub fn resolve(config: &AppConfig) -> Result<Self, PathsError> {
        let mode = config.mode();
        let user_data_root = match &config.user_data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or(PathsError::UserDataRootUnavailable)?
                .join("folio"),
        };
        Ok(Self {
            database_root: user_data_root.join(mode.db_dir_name()),
            publication_storage_root: user_data_root.join("publications"),
            temp_root: std::env::temp_dir().join("folio"),
            user_data_root,
        })
    }

    /// Create the directories downstream components rely on, in dependency
    /// order. Any failure is fatal to startup.
    pub fn provision(&self) -> Result<(), PathsError> {
        ensure_dir(&self.user_data_root)?;
        ensure_dir(&self.database_root)?;
        ensure_dir(&self.publication_storage_root)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;

    fn config_with_root(root: &Path, mode: BuildMode) -> AppConfig {
        AppConfig {
            user_data_dir: Some(root.to_path_buf()),
            mode: Some(mode),
            ..AppConfig::default()
        }
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("dir");

        ensure_dir(&target).unwrap();
        ensure_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn database_root_depends_on_build_mode() {
        let tmp = tempfile::tempdir().unwrap();

        let dev = AppPaths::resolve(&config_with_root(tmp.path(), BuildMode::Development)).unwrap();
        let prod = AppPaths::resolve(&config_with_root(tmp.path(), BuildMode::Production)).unwrap();

        assert_eq!(dev.database_root, tmp.path().join("db-dev"));
        assert_eq!(prod.database_root, tmp.path().join("db"));
        assert_ne!(dev.database_root, prod.database_root);
    }

    #[test]
    fn provision_creates_the_layout_and_survives_restart() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::resolve(&config_with_root(tmp.path(), BuildMode::Production)).unwrap();

        paths.provision().unwrap();
        assert!(paths.database_root.is_dir());
        assert!(paths.publication_storage_root.is_dir());

        // Second run against the existing layout must not fail.
        paths.provision().unwrap();
    }

    #[test]
    fn create_failure_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = ensure_dir(&blocker.join("child")).unwrap_err();
        assert!(err.to_string().contains("blocker"));
    }
}
