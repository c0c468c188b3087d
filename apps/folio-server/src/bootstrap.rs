//! Daemon bootstrap.
//!
//! Startup phases, in order:
//! 1. resolve and provision the directory layout,
//! 2. select and activate the storage adapter,
//! 3. open the logical databases,
//! 4. populate the service container,
//! 5. hand out the injector.
//!
//! Binding order inside phase 4 is fixed; singleton factories let a service
//! depend on bindings registered after it, since factories only run at first
//! resolution.

use std::sync::Arc;

use anyhow::Context;
use foliokit::{Injector, ServiceContainer};
use foliokit_store::{activate_adapter, AdapterRegistry, DbFactory};

use crate::config::AppConfig;
use crate::paths::AppPaths;
use crate::services::{
    bookmark::BookmarkManager,
    catalog::CatalogService,
    content::ContentServer,
    db::{ConfigDb, OpdsDb, PublicationDb},
    device::DeviceIdManager,
    downloader::Downloader,
    opds::OpdsParser,
    secret::SecretManager,
    serializer::ActionSerializer,
    state::StateStore,
    storage::PublicationStorage,
    translator::Translator,
    win_registry::WindowRegistry,
};

/// Application name, used to namespace persisted identity keys.
pub const APP_NAME: &str = "folio";

/// Container identifiers. Consumers address services by these; the bootstrap
/// is the only writer.
pub mod keys {
    pub const STORE: &str = "store";
    pub const WIN_REGISTRY: &str = "win-registry";
    pub const TRANSLATOR: &str = "translator";
    pub const STREAMER: &str = "streamer";
    pub const OPDS_PARSER: &str = "opds-parser";
    pub const CATALOG_SERVICE: &str = "catalog-service";
    pub const DOWNLOADER: &str = "downloader";
    pub const PUBLICATION_DB: &str = "publication-db";
    pub const OPDS_DB: &str = "opds-db";
    pub const CONFIG_DB: &str = "config-db";
    pub const PUBLICATION_STORAGE: &str = "publication-storage";
    pub const DEVICE_ID_MANAGER: &str = "device-id-manager";
    pub const SECRET_MANAGER: &str = "secret-manager";
    pub const BOOKMARK_MANAGER: &str = "bookmark-manager";
    pub const ACTION_SERIALIZER: &str = "action-serializer";
}

/// A bootstrapped daemon: the populated container, the injector consumers
/// resolve through, and the provisioned directory layout.
pub struct App {
    container: Arc<ServiceContainer>,
    injector: Injector,
    paths: AppPaths,
}

impl App {
    pub fn container(&self) -> &Arc<ServiceContainer> {
        &self.container
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }
}

/// Run the startup sequence against `config`, binding `content_server` as the
/// streamer seam.
pub fn bootstrap(
    config: &AppConfig,
    content_server: Arc<dyn ContentServer>,
) -> anyhow::Result<App> {
    let paths = AppPaths::resolve(config).context("failed to resolve directory layout")?;
    paths.provision().context("failed to provision directories")?;
    tracing::info!(
        user_data_root = %paths.user_data_root.display(),
        database_root = %paths.database_root.display(),
        "directory layout provisioned"
    );

    let registry = AdapterRegistry::builtin();
    let adapter_name = config.adapter_name();
    let adapter = registry
        .select(adapter_name)
        .context("failed to select storage adapter")?;
    activate_adapter(adapter.name()).context("failed to activate storage adapter")?;
    tracing::info!(adapter = adapter.name(), "storage adapter selected");

    let factory = DbFactory::with_adapter(adapter);
    let publication_db = Arc::new(PublicationDb::new(
        factory.open_database(&paths.database_root, "publications")?,
    ));
    let opds_db = Arc::new(OpdsDb::new(
        factory.open_database(&paths.database_root, "opds")?,
    ));
    let config_db = Arc::new(ConfigDb::new(
        factory.open_database(&paths.database_root, "config")?,
    ));
    tracing::info!("logical databases opened");

    let container = Arc::new(ServiceContainer::new());
    bind_services(
        &container,
        &paths,
        content_server,
        publication_db,
        opds_db,
        config_db,
    )
    .context("failed to populate service container")?;
    tracing::info!(bindings = container.len(), "service container populated");

    let injector = Injector::new(container.clone());
    Ok(App {
        container,
        injector,
        paths,
    })
}

fn bind_services(
    container: &Arc<ServiceContainer>,
    paths: &AppPaths,
    content_server: Arc<dyn ContentServer>,
    publication_db: Arc<PublicationDb>,
    opds_db: Arc<OpdsDb>,
    config_db: Arc<ConfigDb>,
) -> Result<(), foliokit::ContainerError> {
    let state = Arc::new(StateStore::new());
    container.bind_constant(keys::STORE, state.clone())?;
    container.bind_constant(keys::WIN_REGISTRY, Arc::new(WindowRegistry::new()))?;
    container.bind_constant(keys::TRANSLATOR, Arc::new(Translator::default()))?;
    container.bind_constant(keys::STREAMER, content_server)?;
    container.bind_singleton(keys::OPDS_PARSER, |_| Ok(Arc::new(OpdsParser::new())))?;

    // Registered before its dependencies; construction is deferred until the
    // first resolution, by which point everything below is bound.
    container.bind_singleton(keys::CATALOG_SERVICE, |c| {
        Ok(Arc::new(CatalogService::new(
            c.get::<PublicationDb>(keys::PUBLICATION_DB)?,
            c.get::<OpdsParser>(keys::OPDS_PARSER)?,
        )))
    })?;

    container.bind_constant(
        keys::DOWNLOADER,
        Arc::new(Downloader::new(&paths.temp_root, state)),
    )?;

    container.bind_constant(keys::PUBLICATION_DB, publication_db)?;
    container.bind_constant(keys::OPDS_DB, opds_db)?;
    container.bind_constant(keys::CONFIG_DB, config_db.clone())?;
    container.bind_constant(
        keys::PUBLICATION_STORAGE,
        Arc::new(PublicationStorage::new(&paths.publication_storage_root)),
    )?;

    container.bind_constant(
        keys::DEVICE_ID_MANAGER,
        Arc::new(DeviceIdManager::new(APP_NAME, config_db.clone())),
    )?;
    container.bind_constant(
        keys::SECRET_MANAGER,
        Arc::new(SecretManager::new(config_db.clone())),
    )?;
    container.bind_constant(
        keys::BOOKMARK_MANAGER,
        Arc::new(BookmarkManager::new(config_db)),
    )?;
    container.bind_constant(keys::ACTION_SERIALIZER, Arc::new(ActionSerializer::new()))?;

    Ok(())
}
