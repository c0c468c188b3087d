//! Action serialization for the daemon/UI message channel.
//!
//! The UI shell and the daemon exchange redux-style actions as JSON. The
//! serializer owns the envelope shape so both directions stay symmetric.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    pub fn new(kind: &str, payload: Value) -> Self {
        Self {
            kind: kind.to_owned(),
            payload,
        }
    }
}

#[derive(Default)]
pub struct ActionSerializer;

impl ActionSerializer {
    pub fn new() -> Self {
        Self
    }

    pub fn serialize(&self, action: &Action) -> Result<String, serde_json::Error> {
        serde_json::to_string(action)
    }

    pub fn deserialize(&self, raw: &str) -> Result<Action, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
