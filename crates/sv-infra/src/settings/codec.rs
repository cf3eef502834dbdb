//! Encoded form of a settings file: indented UTF-8 JSON.

use serde::{de::DeserializeOwned, Serialize};

/// Decode file content. A literal `null` document decodes to `None`.
pub(crate) fn decode<T: DeserializeOwned>(content: &str) -> serde_json::Result<Option<T>> {
    serde_json::from_str::<Option<T>>(content)
}

pub(crate) fn encode<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
