//! URL record entity, the only persisted data in the service.

use serde::{Deserialize, Serialize};

/// A shortened URL as stored by every storage backend.
///
/// Records are append-only: once written, only `is_deleted` may change
/// (false → true). Deleted records stay in storage and keep their code
/// reserved forever.
///
/// The serialized field names match the on-disk JSON layout of the file
/// backend, where `id` is written as a decimal string under `uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    #[serde(rename = "uuid", with = "id_as_string")]
    pub id: i64,
    #[serde(rename = "short_url")]
    pub short_code: String,
    pub original_url: String,
    #[serde(rename = "user_id", default)]
    pub owner_id: String,
    #[serde(default)]
    pub is_deleted: bool,
}

impl UrlRecord {
    /// Creates a new, live record.
    pub fn new(id: i64, short_code: String, original_url: String, owner_id: String) -> Self {
        Self {
            id,
            short_code,
            original_url,
            owner_id,
            is_deleted: false,
        }
    }

    /// Returns true if this record belongs to `owner_id`.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

mod id_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
