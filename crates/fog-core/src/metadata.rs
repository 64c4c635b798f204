//! Free-form key → JSON metadata attached to every item.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Decode the value under `key`. Missing keys are `None`; values that
    /// fail to decode are logged and also `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.0.get(key)?;
        match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("malformed metadata under {key:?}: {e}");
                None
            }
        }
    }

    /// Decode the value under `key`, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.0.insert(key.to_string(), v);
            }
            Err(e) => log::warn!("unable to encode metadata under {key:?}: {e}"),
        }
    }

    pub fn insert_raw(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_lookup_with_fallback() {
        let mut meta = Metadata::new();
        meta.insert("ns/count", &3u32);
        assert_eq!(meta.get::<u32>("ns/count"), Some(3));
        assert_eq!(meta.get_or::<u32>("ns/missing", 7), 7);
    }

    #[test]
    fn malformed_values_fall_back() {
        let mut meta = Metadata::new();
        meta.insert_raw("ns/count", json!("not a number"));
        assert!(meta.contains_key("ns/count"));
        assert_eq!(meta.get_or::<u32>("ns/count", 1), 1);
    }
}
