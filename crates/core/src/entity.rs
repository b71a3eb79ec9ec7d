//! Shared behaviour of the persisted record types

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

/// A record kept in a local collection and mirrored to a remote collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Remote collection path segment, e.g. `projects`
    const COLLECTION: &'static str;

    /// Local storage key holding the whole collection
    const STORAGE_KEY: &'static str;

    /// Human-readable name used in log lines and notifications
    const LABEL: &'static str;

    /// Numeric identifier, unique within the collection
    fn id(&self) -> i64;

    /// Identifier as sent to the remote API, which always uses strings
    fn wire_id(&self) -> String {
        self.id().to_string()
    }
}

/// Accept an id encoded either as a JSON number or as a numeric string.
///
/// The backend stores ids as strings while the local cache stores numbers;
/// both load into the same `i64` so comparisons never mix representations.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id: {:?}", text))),
    }
}
