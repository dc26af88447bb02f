use serde::{Deserialize, Serialize};

/// Annotation key base under which essences are stored.
pub const BASE_ANNOTATION: &str = "kopf.zalando.org/last-handled-configuration";

/// Annotation written by `kubectl apply`; tooling state, never user intent.
pub const LAST_APPLIED_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// Where and how the last handled essence is tracked on an object.
///
/// A single object can be tracked independently under several prefixes,
/// e.g. one per handler set or per essence view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Optional namespace prepended to the base annotation, dot-separated.
    pub prefix: Option<String>,
    /// The annotation key base.
    pub base_annotation: String,
    /// Third-party annotations that carry tooling state and are excluded
    /// from every essence.
    pub foreign_annotations: Vec<String>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            base_annotation: BASE_ANNOTATION.to_string(),
            foreign_annotations: vec![LAST_APPLIED_ANNOTATION.to_string()],
        }
    }
}

impl TrackingConfig {
    /// The default configuration under a prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Default::default()
        }
    }

    /// The tracking annotation key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastseen_store::TrackingConfig;
    ///
    /// assert_eq!(
    ///     TrackingConfig::default().annotation_key(),
    ///     "kopf.zalando.org/last-handled-configuration",
    /// );
    /// assert_eq!(
    ///     TrackingConfig::with_prefix("my-op").annotation_key(),
    ///     "my-op.kopf.zalando.org/last-handled-configuration",
    /// );
    /// ```
    pub fn annotation_key(&self) -> String {
        match self.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}.{}", self.base_annotation),
            _ => self.base_annotation.clone(),
        }
    }

    /// Returns `true` if an annotation is tracking bookkeeping rather than
    /// user intent: the tracking key itself or a foreign tooling key.
    pub fn is_bookkeeping_annotation(&self, key: &str) -> bool {
        key == self.annotation_key() || self.foreign_annotations.iter().any(|k| k == key)
    }
}
