use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TypeError, TypeResult};

/// A path into a value tree, one mapping key per segment.
///
/// Textually a path is written with dots between segments, e.g.
/// `status.phase`. The root path has no segments and addresses the whole
/// tree; it can only be built programmatically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The empty path, addressing the whole tree.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from raw segments. Segments are taken verbatim.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dotted path.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastseen_types::FieldPath;
    ///
    /// let path = FieldPath::parse("status.phase").unwrap();
    /// assert_eq!(path.segments(), ["status", "phase"]);
    /// assert!(FieldPath::parse("").is_err());
    /// assert!(FieldPath::parse("spec..replicas").is_err());
    /// ```
    pub fn parse(text: &str) -> TypeResult<Self> {
        if text.is_empty() {
            return Err(TypeError::InvalidFieldPath {
                path: text.to_string(),
                reason: "field path must not be empty".into(),
            });
        }
        let segments: Vec<String> = text.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(TypeError::InvalidFieldPath {
                path: text.to_string(),
                reason: "path segments must not be empty".into(),
            });
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// A new path with one more segment appended.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// The path without its last segment, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.0.split_last().map(|(_, init)| Self(init.to_vec()))
    }

    /// The last segment, or `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The remainder of this path after `prefix`, if `prefix` leads it.
    pub fn strip_prefix(&self, prefix: &FieldPath) -> Option<Self> {
        self.0.strip_prefix(prefix.0.as_slice()).map(|rest| Self(rest.to_vec()))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
