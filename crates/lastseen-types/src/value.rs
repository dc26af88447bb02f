//! Owned value tree with path-based access.
//!
//! A [`Value`] is structurally what a JSON document is, but every subtree is
//! owned: cloning a value deep-copies it, so a snapshot taken from a body
//! can never observe later mutations of that body.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

use crate::path::FieldPath;

/// String-keyed mapping node. Keys are kept sorted, so equal mappings
/// always serialize identically.
pub type Mapping = BTreeMap<String, Value>;

/// A node of an arbitrarily nested document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// A fresh, empty mapping node.
    pub fn empty_mapping() -> Self {
        Value::Mapping(Mapping::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for a mapping or sequence with no entries.
    pub fn is_empty_container(&self) -> bool {
        match self {
            Value::Mapping(map) => map.is_empty(),
            Value::Sequence(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a direct child of a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Remove a direct child of a mapping.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.as_mapping_mut().and_then(|map| map.remove(key))
    }

    /// Resolve a path. Any missing key or non-mapping intermediate yields
    /// `None`; the root path yields `self`.
    pub fn get_path(&self, path: &FieldPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.get(segment))
    }

    /// Mutable counterpart of [`Value::get_path`].
    pub fn get_path_mut(&mut self, path: &FieldPath) -> Option<&mut Value> {
        let mut node = self;
        for segment in path.segments() {
            node = node.as_mapping_mut()?.get_mut(segment)?;
        }
        Some(node)
    }

    /// Remove the value at a path, returning it if it existed.
    pub fn remove_path(&mut self, path: &FieldPath) -> Option<Value> {
        let parent = path.parent()?;
        let last = path.last()?;
        self.get_path_mut(&parent)?.remove(last)
    }

    /// Get-or-create the mapping at a path.
    ///
    /// Missing intermediates are created as empty mappings. An intermediate
    /// (or the target) that exists but is not a mapping is replaced by one.
    pub fn mapping_at_mut(&mut self, path: &FieldPath) -> &mut Mapping {
        let mut node = self;
        for segment in path.segments() {
            node = node
                .force_mapping()
                .entry(segment.clone())
                .or_insert_with(Value::empty_mapping);
        }
        node.force_mapping()
    }

    /// Place `value` at a path, creating intermediate mappings as needed.
    /// Placing at the root replaces the whole tree.
    pub fn insert_path(&mut self, path: &FieldPath, value: Value) {
        match path.segments().split_last() {
            None => *self = value,
            Some((last, init)) => {
                let parent = self.mapping_at_mut(&FieldPath::new(init.iter().cloned()));
                parent.insert(last.clone(), value);
            }
        }
    }

    /// Copy each of `fields` from `src` into `self` at the same path.
    ///
    /// Fields absent in `src` contribute nothing. Copies are deep and share
    /// no structure with `src`.
    pub fn cherrypick<'a, I>(&mut self, src: &Value, fields: I)
    where
        I: IntoIterator<Item = &'a FieldPath>,
    {
        for field in fields {
            if let Some(picked) = src.get_path(field) {
                self.insert_path(field, picked.clone());
            }
        }
    }

    /// Remove the value at a path if it is an empty mapping.
    /// Returns `true` if something was removed.
    pub fn remove_if_empty(&mut self, path: &FieldPath) -> bool {
        let empty = matches!(self.get_path(path), Some(Value::Mapping(map)) if map.is_empty());
        empty && self.remove_path(path).is_some()
    }

    fn force_mapping(&mut self) -> &mut Mapping {
        if !matches!(self, Value::Mapping(_)) {
            *self = Value::empty_mapping();
        }
        match self {
            Value::Mapping(map) => map,
            _ => unreachable!("node was just replaced by a mapping"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => items.serialize(serializer),
            Value::Mapping(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Mapping(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}
