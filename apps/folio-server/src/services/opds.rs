//! OPDS 2.0 feed parsing.
//!
//! Accepts the JSON shape of an OPDS 2.0 feed and extracts what the catalog
//! needs: the feed title and one record per publication. Fetching feeds over
//! the network is a collaborator concern; this parser only sees bytes that
//! have already arrived.

use serde_json::Value;
use thiserror::Error;

use super::db::PublicationRecord;

#[derive(Debug, Error)]
pub enum OpdsError {
    #[error("feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feed has no metadata.title")]
    MissingTitle,
    #[error("publication #{index} has no metadata.identifier")]
    MissingIdentifier { index: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct OpdsFeed {
    pub title: String,
    pub publications: Vec<PublicationRecord>,
}

#[derive(Default)]
pub struct OpdsParser;

impl OpdsParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str) -> Result<OpdsFeed, OpdsError> {
        let value: Value = serde_json::from_str(raw)?;
        self.parse_value(&value)
    }

    pub fn parse_value(&self, feed: &Value) -> Result<OpdsFeed, OpdsError> {
        let title = feed
            .pointer("/metadata/title")
            .and_then(Value::as_str)
            .ok_or(OpdsError::MissingTitle)?
            .to_owned();

        let mut publications = Vec::new();
        if let Some(entries) = feed.get("publications").and_then(Value::as_array) {
            for (index, entry) in entries.iter().enumerate() {
                publications.push(Self::publication(entry, index)?);
            }
        }

        Ok(OpdsFeed {
            title,
            publications,
        })
    }

    fn publication(entry: &Value, index: usize) -> Result<PublicationRecord, OpdsError> {
        let metadata = entry.get("metadata").unwrap_or(&Value::Null);
        let identifier = metadata
            .get("identifier")
            .and_then(Value::as_str)
            .ok_or(OpdsError::MissingIdentifier { index })?
            .to_owned();
        let title = metadata
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&identifier)
            .to_owned();
        // "author" may be a bare string or an array of {name} objects.
        let authors = match metadata.get("author") {
            Some(Value::String(name)) => vec![name.clone()],
            Some(Value::Array(list)) => list
                .iter()
                .filter_map(|a| {
                    a.as_str()
                        .or_else(|| a.pointer("/name").and_then(Value::as_str))
                        .map(str::to_owned)
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(PublicationRecord {
            identifier,
            title,
            authors,
        })
    }
}
