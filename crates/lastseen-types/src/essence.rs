use serde::Serialize;

use crate::path::FieldPath;
use crate::value::{Mapping, Value};

/// Filtered, comparison-ready snapshot of a body.
///
/// An essence is always a mapping and owns all of its content. Two
/// essences are compared by deep structural equality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Essence(Value);

impl Essence {
    pub fn new(mapping: Mapping) -> Self {
        Self(Value::Mapping(mapping))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_path(&self, path: &FieldPath) -> Option<&Value> {
        self.0.get_path(path)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Top-level keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .as_mapping()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }
}

impl Default for Essence {
    fn default() -> Self {
        Self::new(Mapping::new())
    }
}

impl From<Mapping> for Essence {
    fn from(mapping: Mapping) -> Self {
        Self::new(mapping)
    }
}
