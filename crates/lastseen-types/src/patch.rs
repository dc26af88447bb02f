use serde::Serialize;

use crate::body::{ANNOTATIONS, METADATA};
use crate::path::FieldPath;
use crate::value::{Mapping, Value};

/// Caller-owned accumulator of pending mutations to an object.
///
/// A patch is a mapping that grows as mutations are staged. Staging code
/// only ever adds to it; submitting it to the live object is up to the
/// caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Patch(Value);

impl Patch {
    pub fn new() -> Self {
        Self(Value::empty_mapping())
    }

    /// Returns `true` if nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty_container()
    }

    /// Get-or-create the nested mapping at `path`.
    pub fn mapping_mut(&mut self, path: &FieldPath) -> &mut Mapping {
        self.0.mapping_at_mut(path)
    }

    /// Get-or-create `metadata.annotations`.
    pub fn annotations_mut(&mut self) -> &mut Mapping {
        self.mapping_mut(&FieldPath::new([METADATA, ANNOTATIONS]))
    }

    /// A staged annotation value, if any.
    pub fn annotation(&self, key: &str) -> Option<&Value> {
        self.0
            .get_path(&FieldPath::new([METADATA, ANNOTATIONS]))
            .and_then(|annotations| annotations.get(key))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new()
    }
}
