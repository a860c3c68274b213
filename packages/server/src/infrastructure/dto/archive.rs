//! Persisted message records.
//!
//! The archive document is a JSON object: room name → ordered list of records.
//! Every field except `id` is optional on read, and `null` reads as empty, so
//! files written by older servers still load. A record that still does not fit
//! is kept verbatim and written back untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::websocket::ReactionsDto;

/// Whole archive document
pub type ArchiveDocument = BTreeMap<String, Vec<StoredRecord>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredRecord {
    Message(MessageRecord),
    Unreadable(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default)]
    pub reactions: ReactionsDto,
    /// RFC 3339
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,
    #[serde(default)]
    pub edited: bool,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
