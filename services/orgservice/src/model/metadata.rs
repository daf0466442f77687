//! Organization metadata entries.
//!
//! Values are opaque bytes; on the JSON wire they travel as standard base64.
use super::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MAX_KEY_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    pub key: String,
    #[serde(with = "base64_bytes")]
    #[schema(value_type = String, format = Byte)]
    pub value: Vec<u8>,
    pub sequence: u64,
    pub creation_date: DateTime<Utc>,
    pub change_date: DateTime<Utc>,
}

/// Key/value pair supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetadataEntry {
    pub key: String,
    #[serde(with = "base64_bytes")]
    #[schema(value_type = String, format = Byte)]
    pub value: Vec<u8>,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub fn normalize_metadata_key(key: &str) -> Result<String, ValidationError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::new("metadata key must not be empty"));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(ValidationError::new(format!(
            "metadata key exceeds {MAX_KEY_LEN} characters"
        )));
    }
    Ok(key.to_string())
}

pub(crate) mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_travel_as_base64() {
        let entry = MetadataEntry::new("key1", "value1");
        let json = serde_json::to_value(&entry).expect("json");
        assert_eq!(json["value"], "dmFsdWUx");
        let back: MetadataEntry = serde_json::from_value(json).expect("decode");
        assert_eq!(back.value, b"value1");
    }

    #[test]
    fn malformed_base64_is_rejected() {
        let result: Result<MetadataEntry, _> =
            serde_json::from_value(serde_json::json!({ "key": "k", "value": "%%%" }));
        assert!(result.is_err());
    }

    #[test]
    fn keys_are_validated() {
        assert_eq!(normalize_metadata_key(" key ").expect("key"), "key");
        assert!(normalize_metadata_key("  ").is_err());
    }
}
