use crate::error::{TypeError, TypeResult};
use crate::value::{Mapping, Value};

pub const API_VERSION: &str = "apiVersion";
pub const KIND: &str = "kind";
pub const METADATA: &str = "metadata";
pub const STATUS: &str = "status";
pub const LABELS: &str = "labels";
pub const ANNOTATIONS: &str = "annotations";
pub const DELETION_TIMESTAMP: &str = "deletionTimestamp";

/// Read-only view of a full observed object.
///
/// A body is always a mapping at the top level. Nothing in this workspace
/// mutates a body; derived snapshots are deep copies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body(Value);

impl Body {
    /// Wrap a value, which must be a mapping.
    pub fn new(value: Value) -> TypeResult<Self> {
        match value {
            Value::Mapping(_) => Ok(Self(value)),
            other => Err(TypeError::InvalidBody(format!(
                "expected a mapping at the top level, got {other}"
            ))),
        }
    }

    /// Parse a body from JSON text.
    pub fn from_json(text: &str) -> TypeResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| TypeError::InvalidBody(e.to_string()))?;
        Self::new(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn metadata(&self) -> Option<&Mapping> {
        self.0.get(METADATA).and_then(Value::as_mapping)
    }

    pub fn labels(&self) -> Option<&Mapping> {
        self.metadata()
            .and_then(|meta| meta.get(LABELS))
            .and_then(Value::as_mapping)
    }

    pub fn annotations(&self) -> Option<&Mapping> {
        self.metadata()
            .and_then(|meta| meta.get(ANNOTATIONS))
            .and_then(Value::as_mapping)
    }

    pub fn annotation(&self, key: &str) -> Option<&Value> {
        self.annotations().and_then(|annotations| annotations.get(key))
    }

    /// Returns `true` once the object is marked for deletion.
    pub fn is_being_deleted(&self) -> bool {
        self.metadata()
            .and_then(|meta| meta.get(DELETION_TIMESTAMP))
            .is_some_and(|ts| !ts.is_null())
    }
}

impl TryFrom<serde_json::Value> for Body {
    type Error = TypeError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::new(value.into())
    }
}
