//! Layered daemon configuration.
//!
//! Precedence, lowest to highest: built-in defaults -> YAML file (if given)
//! -> `FOLIO__*` environment variables -> CLI overrides. The dev/production
//! discriminator and the default storage adapter are build-time inputs
//! (`debug_assertions` and the `sled` cargo feature); the runtime config can
//! override the adapter name, which is mainly useful for development runs
//! against the in-memory engine.

use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Development/production discriminator. Decides the database root directory
/// name so dev and production data never collide under one user-data root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// The mode this binary was built for.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }

    /// Directory name for the database root under the user-data root.
    pub fn db_dir_name(self) -> &'static str {
        match self {
            BuildMode::Development => "db-dev",
            BuildMode::Production => "db",
        }
    }
}

/// Storage adapter name compiled in as the default.
pub fn default_adapter_name() -> &'static str {
    if cfg!(feature = "sled") {
        "sled"
    } else {
        "memory"
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Adapter name override; defaults to the build's adapter.
    pub adapter: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is not set and no `-v` given.
    pub level: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// User-data root; defaults to the OS data directory plus `folio`.
    pub user_data_dir: Option<PathBuf>,
    /// Build-mode override, mainly for tests.
    pub mode: Option<BuildMode>,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// CLI arguments that flow into the config merge.
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub adapter: Option<String>,
}

impl AppConfig {
    /// Load the layered configuration.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("FOLIO__").split("__"));
        figment
            .extract()
            .context("failed to load daemon configuration")
    }

    pub fn apply_cli_overrides(&mut self, args: &CliOverrides) {
        if let Some(dir) = &args.data_dir {
            self.user_data_dir = Some(dir.clone());
        }
        if let Some(adapter) = &args.adapter {
            self.storage.adapter = Some(adapter.clone());
        }
    }

    /// Effective build mode.
    pub fn mode(&self) -> BuildMode {
        self.mode.unwrap_or_else(BuildMode::build_default)
    }

    /// Effective storage adapter name.
    pub fn adapter_name(&self) -> &str {
        self.storage
            .adapter
            .as_deref()
            .unwrap_or_else(|| default_adapter_name())
    }

    /// Effective configuration as pretty JSON, for `--print-config`.
    pub fn to_pretty(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fall_back_to_build_inputs() {
        let config = AppConfig::default();
        assert_eq!(config.mode(), BuildMode::build_default());
        assert_eq!(config.adapter_name(), default_adapter_name());
    }

    #[test]
    fn env_overrides_storage_adapter() {
        temp_env::with_var("FOLIO__STORAGE__ADAPTER", Some("memory"), || {
            let config = AppConfig::load_or_default(None).unwrap();
            assert_eq!(config.adapter_name(), "memory");
        });
    }

    #[test]
    fn cli_overrides_win_over_everything() {
        let mut config = AppConfig {
            storage: StorageConfig {
                adapter: Some("sled".to_owned()),
            },
            ..AppConfig::default()
        };
        config.apply_cli_overrides(&CliOverrides {
            data_dir: Some(PathBuf::from("/tmp/folio-test")),
            adapter: Some("memory".to_owned()),
        });

        assert_eq!(config.adapter_name(), "memory");
        assert_eq!(config.user_data_dir.as_deref(), Some(Path::new("/tmp/folio-test")));
    }

    #[test]
    fn yaml_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.yaml");
        std::fs::write(&path, "mode: production\nstorage:\n  adapter: memory\n").unwrap();

        let config = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.mode(), BuildMode::Production);
        assert_eq!(config.adapter_name(), "memory");
    }

    #[test]
    fn db_dir_names_never_collide() {
        assert_ne!(
            BuildMode::Development.db_dir_name(),
            BuildMode::Production.db_dir_name()
        );
    }
}
