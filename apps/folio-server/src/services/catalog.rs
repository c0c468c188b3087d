//! Publication catalog.
//!
//! Composes the publication database with the OPDS parser: listing reads the
//! database, importing a feed parses it and upserts every publication it
//! names. Constructed through the container, so both collaborators resolve
//! lazily at first use.

use std::sync::Arc;

use thiserror::Error;

use super::db::{PublicationDb, PublicationRecord};
use super::opds::{OpdsError, OpdsParser};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Feed(#[from] OpdsError),
    #[error(transparent)]
    Store(#[from] foliokit_store::StoreError),
}

pub struct CatalogService {
    publications: Arc<PublicationDb>,
    parser: Arc<OpdsParser>,
}

impl CatalogService {
    pub fn new(publications: Arc<PublicationDb>, parser: Arc<OpdsParser>) -> Self {
        Self {
            publications,
            parser,
        }
    }

    pub fn list(&self) -> Result<Vec<PublicationRecord>, CatalogError> {
        Ok(self.publications.all()?)
    }

    /// Parses an OPDS feed and upserts each publication it names. Returns the
    /// imported records.
    pub fn import_feed(&self, raw_feed: &str) -> Result<Vec<PublicationRecord>, CatalogError> {
        let feed = self.parser.parse(raw_feed)?;
        for record in &feed.publications {
            self.publications.put(record)?;
        }
        tracing::info!(
            feed = %feed.title,
            publications = feed.publications.len(),
            "imported OPDS feed"
        );
        Ok(feed.publications)
    }
}
